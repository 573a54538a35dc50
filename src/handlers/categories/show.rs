use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::category_service::ShowOptions;

use super::{flag, parse_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowQuery {
    pub include_products: Option<String>,
    pub include_children: Option<String>,
}

/// GET /api/categories/:id - single category with attributes, counts and the
/// optional child/product sections. includeChildren defaults to true.
pub async fn category_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ShowQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category id")?;

    let options = ShowOptions {
        include_products: flag(query.include_products.as_deref()),
        include_children: query
            .include_children
            .as_deref()
            .map_or(true, |value| value == "true"),
    };

    let category = state
        .categories
        .get_by_id(id, options)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": { "category": category }
    })))
}
