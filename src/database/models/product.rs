use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Active-product projection attached to category payloads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub base_price: Decimal,
    pub images: Vec<String>,
}

/// Same projection plus the owning category, for grouping a bulk fetch.
#[derive(Debug, Clone, FromRow)]
pub struct ProductSummaryRow {
    pub category_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub base_price: Decimal,
    pub images: Vec<String>,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        ProductSummary {
            id: row.id,
            name: row.name,
            slug: row.slug,
            base_price: row.base_price,
            images: row.images,
        }
    }
}
