//! HTTP handlers for dashboards and reports

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::TimeBucket;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{
    AdminDashboard, EmployeeDashboard, EmployeeSales, FinancialSummary, OutstandingOrder,
    ProductSales, ProductStockLevel, RecentOrder, ReportFilter, ReportingService, SalesPoint,
    StockValuation, TopCustomer,
};
use crate::AppState;

/// Query parameters for the sales series
#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    #[serde(default)]
    pub bucket: TimeBucket,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

impl SalesQuery {
    fn filter(&self) -> ReportFilter {
        ReportFilter {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Admin dashboard (admin)
pub async fn get_admin_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AdminDashboard>> {
    current_user.0.require_admin()?;
    let service = ReportingService::new(state.db);
    let dashboard = service
        .admin_dashboard(state.config.reports.low_stock_threshold)
        .await?;
    Ok(Json(dashboard))
}

/// Employee dashboard
pub async fn get_employee_dashboard(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<EmployeeDashboard>> {
    let service = ReportingService::new(state.db);
    let dashboard = service.employee_dashboard().await?;
    Ok(Json(dashboard))
}

/// Time-bucketed sales series
pub async fn get_sales_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<Vec<SalesPoint>>> {
    let service = ReportingService::new(state.db);
    let points = service.sales_over_time(query.bucket, &query.filter()).await?;
    Ok(Json(points))
}

/// Sales series as a CSV download
pub async fn export_sales_csv(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SalesQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let points = service.sales_over_time(query.bucket, &query.filter()).await?;
    let csv = ReportingService::export_to_csv(&points)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sales_report.csv\"",
            ),
        ],
        csv,
    ))
}

/// Top products by revenue
pub async fn get_sales_by_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductSales>>> {
    let service = ReportingService::new(state.db);
    let sales = service.sales_by_product(10).await?;
    Ok(Json(sales))
}

/// Payments totalled per employee
pub async fn get_sales_by_employee(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<EmployeeSales>>> {
    let service = ReportingService::new(state.db);
    let sales = service.sales_by_employee().await?;
    Ok(Json(sales))
}

/// Customers ranked by lifetime payments
pub async fn get_top_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<TopCustomer>>> {
    let service = ReportingService::new(state.db);
    let customers = service.top_customers(10).await?;
    Ok(Json(customers))
}

/// Pending orders without payments
pub async fn get_outstanding_balances(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<OutstandingOrder>>> {
    let service = ReportingService::new(state.db);
    let orders = service.outstanding_balances().await?;
    Ok(Json(orders))
}

/// Products under the low-stock threshold
pub async fn get_low_stock_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductStockLevel>>> {
    let service = ReportingService::new(state.db);
    let products = service
        .low_stock_products(state.config.reports.low_stock_threshold)
        .await?;
    Ok(Json(products))
}

/// Products without sales inside the trailing window
pub async fn get_dead_stock_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductStockLevel>>> {
    let service = ReportingService::new(state.db);
    let products = service
        .dead_stock_products(state.config.reports.dead_stock_window_days)
        .await?;
    Ok(Json(products))
}

/// Inventory valuation at cost and selling price
pub async fn get_stock_valuation(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<StockValuation>> {
    let service = ReportingService::new(state.db);
    let valuation = service.stock_valuation().await?;
    Ok(Json(valuation))
}

/// Revenue, COGS and profit
pub async fn get_financial_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<FinancialSummary>> {
    let service = ReportingService::new(state.db);
    let summary = service.financial_summary().await?;
    Ok(Json(summary))
}

/// Returned orders
pub async fn get_returned_orders(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<RecentOrder>>> {
    let service = ReportingService::new(state.db);
    let orders = service.returned_orders().await?;
    Ok(Json(orders))
}
