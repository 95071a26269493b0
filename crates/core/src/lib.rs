//! `stockmaster-core`: shared building blocks for the StockMaster client.
//!
//! This crate contains **pure** primitives (no IO, no HTTP).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{MovementId, ProductId, UserId, WarehouseId};
