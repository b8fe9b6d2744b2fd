pub mod appointment;
pub mod employee;
pub mod service;
pub mod team;
