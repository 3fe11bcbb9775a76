//! Business logic services for the Wholesale Business Management Platform

pub mod audit;
pub mod auth;
pub mod customer;
pub mod ledger;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod reporting;
pub mod search;
pub mod stock;

pub use audit::AuditService;
pub use auth::AuthService;
pub use customer::CustomerService;
pub use ledger::StockLedger;
pub use notification::NotificationService;
pub use order::OrderService;
pub use payment::PaymentService;
pub use product::ProductService;
pub use reporting::ReportingService;
pub use search::SearchService;
pub use stock::StockService;
