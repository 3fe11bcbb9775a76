//! HTTP handler for the dashboard search box

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::search::{SearchResult, SearchService};
use crate::AppState;

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// Search products, customers and orders
pub async fn search_dashboard(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchResult>>> {
    let service = SearchService::new(state.db);
    let results = service.search(&query.query).await?;
    Ok(Json(results))
}
