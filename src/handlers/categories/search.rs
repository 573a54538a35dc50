use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/categories/search?q&limit - case-insensitive name/description
/// search over active categories
pub async fn category_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let term = query
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::validation_error("Search query is required", None))?;

    let api = &crate::config::config().api;
    let limit = query
        .limit
        .unwrap_or(api.search_default_limit)
        .clamp(1, api.max_page_limit);

    let categories = state.categories.search(&term, limit).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "categories": categories }
    })))
}
