use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::category_service::UpdateCategory;

use super::parse_id;

/// PUT /api/categories/:id - partial update of the supplied fields
pub async fn category_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateCategory>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category id")?;

    let category = state.categories.update(id, data).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category updated successfully",
        "data": { "category": category }
    })))
}

/// PATCH /api/categories/:id/status - isActive toggle; the flag must be an
/// actual JSON boolean
pub async fn category_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category id")?;

    let is_active = match body.get("isActive") {
        Some(Value::Bool(flag)) => *flag,
        _ => {
            return Err(ApiError::validation_error(
                "isActive must be a boolean value",
                None,
            ));
        }
    };

    let patch = UpdateCategory {
        is_active: Some(is_active),
        ..Default::default()
    };
    let category = state.categories.update(id, patch).await?;

    let message = if is_active {
        "Category activated successfully"
    } else {
        "Category deactivated successfully"
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "data": { "category": category }
    })))
}
