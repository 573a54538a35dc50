use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::category_service::CreateCategory;

/// POST /api/categories - create a category (201)
pub async fn category_create(
    State(state): State<AppState>,
    Json(data): Json<CreateCategory>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.categories.create(data).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Category created successfully",
            "data": { "category": category }
        })),
    ))
}
