use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::category_service::CategoryOrder;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBody {
    pub category_orders: Option<Vec<CategoryOrder>>,
}

/// PATCH /api/categories/reorder - best-effort batch sortOrder update
pub async fn category_reorder(
    State(state): State<AppState>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Value>, ApiError> {
    let orders = body.category_orders.unwrap_or_default();
    if orders.is_empty() {
        return Err(ApiError::validation_error(
            "At least one category order is required",
            None,
        ));
    }

    state.categories.reorder_many(&orders).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Categories reordered successfully"
    })))
}
