use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;

/// GET /api/categories/stats - aggregate catalog counters
pub async fn category_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stats = state.categories.statistics().await?;

    Ok(Json(json!({
        "success": true,
        "data": { "stats": stats }
    })))
}
