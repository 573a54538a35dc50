use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::category_service::{FlatOptions, HierarchyOptions};
use crate::types::{PageMeta, Pagination};

use super::{flag, tri_flag};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub flat: Option<String>,
    pub include_products: Option<String>,
    pub is_active: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/categories - nested hierarchy by default, flat page with
/// pagination metadata when ?flat=true
pub async fn category_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let include_products = flag(query.include_products.as_deref());
    let is_active = tri_flag(query.is_active.as_deref());

    if flag(query.flat.as_deref()) {
        let pagination = Pagination::clamped(query.page, query.limit);
        let (categories, total) = state
            .categories
            .get_flat(FlatOptions {
                is_active,
                include_products,
                pagination,
            })
            .await?;
        let pagination_meta = PageMeta::new(total, pagination.page, pagination.limit);

        return Ok(Json(json!({
            "success": true,
            "data": {
                "categories": categories,
                "pagination": pagination_meta
            }
        })));
    }

    let categories = state
        .categories
        .get_hierarchy(HierarchyOptions {
            is_active,
            include_products,
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": { "categories": categories }
    })))
}
