use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;

use super::parse_id;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub move_products_to: Option<String>,
}

/// DELETE /api/categories/:id?moveProductsTo - delete a leaf category,
/// optionally reassigning its products first
pub async fn category_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category id")?;
    let move_products_to = query
        .move_products_to
        .as_deref()
        .map(|raw| parse_id(raw, "target category id"))
        .transpose()?;

    state.categories.delete(id, move_products_to).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category deleted successfully"
    })))
}
