//! HTTP handlers for the Wholesale Business Management Platform

pub mod audit;
pub mod auth;
pub mod customer;
pub mod health;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod reporting;
pub mod search;
pub mod stock;

pub use audit::*;
pub use auth::*;
pub use customer::*;
pub use health::*;
pub use notification::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use reporting::*;
pub use search::*;
pub use stock::*;
