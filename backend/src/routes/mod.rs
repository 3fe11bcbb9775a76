//! Route definitions for the Wholesale Business Management Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - customer management
        .nest("/customers", customer_routes())
        // Protected routes - catalogue management
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        // Protected routes - stock management
        .nest("/stock", stock_routes())
        // Protected routes - order management
        .nest("/orders", order_routes())
        // Protected routes - payment management
        .nest("/payments", payment_routes())
        // Protected routes - dashboards and reports
        .nest("/reports", report_routes())
        // Protected routes - notification feed
        .nest("/notifications", notification_routes())
        // Protected routes - search
        .nest("/search", search_routes())
}

/// Authentication routes (register/login public, profile protected)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .merge(protected_auth_routes())
}

/// Profile and staff routes (protected)
fn protected_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route("/users", get(handlers::list_users))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Search routes (protected)
fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::search_dashboard))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer management routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product management routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Category routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/:category_id", delete(handlers::delete_category))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock management routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock).post(handlers::create_stock))
        .route(
            "/:stock_id",
            get(handlers::get_stock)
                .put(handlers::update_stock)
                .delete(handlers::delete_stock),
        )
        .route("/:stock_id/availability", get(handlers::get_stock_availability))
        .route("/:stock_id/restock", post(handlers::restock))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Order management routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::save_order)
                .delete(handlers::delete_order),
        )
        .route("/:order_id/items", post(handlers::add_order_item))
        .route(
            "/:order_id/items/:item_id",
            put(handlers::update_order_item).delete(handlers::remove_order_item),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Payment routes (protected)
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_payments).post(handlers::create_payment),
        )
        .route(
            "/:payment_id",
            get(handlers::get_payment)
                .put(handlers::update_payment)
                .delete(handlers::delete_payment),
        )
        .route("/:payment_id/receipt", get(handlers::get_payment_receipt))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard and report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/admin", get(handlers::get_admin_dashboard))
        .route("/dashboard/employee", get(handlers::get_employee_dashboard))
        .route("/sales", get(handlers::get_sales_report))
        .route("/sales/export", get(handlers::export_sales_csv))
        .route("/sales/by-product", get(handlers::get_sales_by_product))
        .route("/sales/by-employee", get(handlers::get_sales_by_employee))
        .route("/customers/top", get(handlers::get_top_customers))
        .route(
            "/customers/outstanding",
            get(handlers::get_outstanding_balances),
        )
        .route("/inventory/low-stock", get(handlers::get_low_stock_report))
        .route("/inventory/dead-stock", get(handlers::get_dead_stock_report))
        .route("/inventory/valuation", get(handlers::get_stock_valuation))
        .route("/financial", get(handlers::get_financial_summary))
        .route("/orders/returned", get(handlers::get_returned_orders))
        .route("/audit", get(handlers::list_audit_trail))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Notification feed routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_notifications))
        .route("/mark-all-read", post(handlers::mark_all_notifications_read))
        .route(
            "/:notification_id/read",
            post(handlers::mark_notification_read),
        )
        .route(
            "/triggers/low-stock",
            post(handlers::trigger_low_stock_scan),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
