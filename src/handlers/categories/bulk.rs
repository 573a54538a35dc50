use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::category_service::BulkPatch;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateBody {
    pub category_ids: Option<Vec<Uuid>>,
    pub update_data: Option<BulkPatch>,
}

/// PATCH /api/categories/bulk-update - apply one status/parent patch to a
/// list of categories. No per-row hierarchy re-validation happens here.
pub async fn category_bulk_update(
    State(state): State<AppState>,
    Json(body): Json<BulkUpdateBody>,
) -> Result<Json<Value>, ApiError> {
    let ids = body.category_ids.unwrap_or_default();
    if ids.is_empty() {
        return Err(ApiError::validation_error(
            "Category IDs array is required",
            None,
        ));
    }
    let patch = body
        .update_data
        .ok_or_else(|| ApiError::validation_error("Update data is required", None))?;

    let updated = state.categories.bulk_update(&ids, &patch).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} categories updated successfully", updated),
        "data": { "updatedCount": updated }
    })))
}
