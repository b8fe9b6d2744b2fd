pub mod availability;
pub mod employee;
pub mod service;
pub mod team;
