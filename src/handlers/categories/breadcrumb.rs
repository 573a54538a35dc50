use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;

use super::parse_id;

/// GET /api/categories/:id/breadcrumb - root-to-leaf path
pub async fn category_breadcrumb(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category id")?;

    let breadcrumb = state.categories.breadcrumb(id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "breadcrumb": breadcrumb }
    })))
}
