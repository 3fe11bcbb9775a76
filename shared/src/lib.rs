//! Shared types and models for the Wholesale Business Management Platform
//!
//! This crate contains the domain model, common types, pure validation
//! helpers, and the stock-ledger decision core used by the backend.

pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
