use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub format: Option<String>,
    pub include_hierarchy: Option<String>,
}

/// GET /api/categories/export/csv?format&includeHierarchy - download the
/// catalog as a flat record list
pub async fn category_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = query.format.as_deref().unwrap_or("csv");
    let include_hierarchy = query
        .include_hierarchy
        .as_deref()
        .map_or(true, |value| value == "true");

    let export = state.categories.export(format, include_hierarchy).await?;

    let headers = [
        (header::CONTENT_TYPE, export.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ),
    ];

    Ok((headers, export.body).into_response())
}
