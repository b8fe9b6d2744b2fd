//! Core domain types and the availability engine for the teambook
//! booking platform.
//!
//! Everything here is pure computation over prefetched data: callers
//! supply the model views and an explicit `now`, and get back either a
//! list of bookable starts (scanner) or a per-slot decision (validator).
//! Data access and HTTP live in the `teambook-db` and `teambook-api`
//! crates.

pub mod engine;
pub mod errors;
pub mod models;
