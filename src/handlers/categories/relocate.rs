use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AppState;

use super::parse_id;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBody {
    pub new_parent_id: Option<Uuid>,
}

/// PATCH /api/categories/:id/move - re-parent a category; omitting
/// newParentId detaches it to root
pub async fn category_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MoveBody>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category id")?;

    let category = state.categories.move_category(id, body.new_parent_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category moved successfully",
        "data": { "category": category }
    })))
}
