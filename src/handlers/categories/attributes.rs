use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::attribute_service::{CreateAttribute, UpdateAttribute};

use super::parse_id;

/// GET /api/categories/:id/attributes - attributes ordered by sortOrder
pub async fn attribute_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "category id")?;

    let attributes = state.attributes.list(id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "attributes": attributes }
    })))
}

/// POST /api/categories/:id/attributes - create an attribute (201)
pub async fn attribute_create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<CreateAttribute>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "category id")?;

    let attribute = state.attributes.create(id, data).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Category attribute created successfully",
            "data": { "attribute": attribute }
        })),
    ))
}

/// PUT /api/categories/:id/attributes/:attributeId
pub async fn attribute_update(
    State(state): State<AppState>,
    Path((_id, attribute_id)): Path<(String, String)>,
    Json(data): Json<UpdateAttribute>,
) -> Result<Json<Value>, ApiError> {
    let attribute_id = parse_id(&attribute_id, "attribute id")?;

    let attribute = state.attributes.update(attribute_id, data).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category attribute updated successfully",
        "data": { "attribute": attribute }
    })))
}

/// DELETE /api/categories/:id/attributes/:attributeId
pub async fn attribute_delete(
    State(state): State<AppState>,
    Path((_id, attribute_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let attribute_id = parse_id(&attribute_id, "attribute id")?;

    state.attributes.delete(attribute_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category attribute deleted successfully"
    })))
}
