//! Database models for the Wholesale Business Management Platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
