//! Thin REST bindings, one module per backend resource.
//!
//! These only rename fields and coerce ids; every business rule (stock
//! deduction, soft delete, report aggregation) lives in the backend.

pub mod dashboard;
pub mod movements;
pub mod products;
pub mod recovery;
pub mod reports;
pub mod users;
pub mod warehouses;
