use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::attribute::CategoryAttribute;
use super::product::ProductSummary;

/// Full category row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact projection used for parent references and breadcrumbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Relation counts rendered under `_count`, matching the wire format the
/// admin frontend already consumes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RelationCounts {
    pub products: i64,
    pub children: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProductCount {
    pub products: i64,
}

/// Flat row from the category + parent + counts join.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryMetaRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub parent_name: Option<String>,
    pub parent_slug: Option<String>,
    pub product_count: i64,
    pub child_count: i64,
}

impl CategoryMetaRow {
    fn parent_summary(&self) -> Option<CategorySummary> {
        match (self.parent_id, &self.parent_name, &self.parent_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategorySummary {
                id,
                name: name.clone(),
                slug: slug.clone(),
            }),
            _ => None,
        }
    }
}

/// Category payload joined with parent summary and relation counts; the
/// optional sections are filled per endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub parent: Option<CategorySummary>,
    #[serde(rename = "_count")]
    pub counts: RelationCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<CategoryAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryChild>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSummary>>,
}

impl From<CategoryMetaRow> for CategoryRecord {
    fn from(row: CategoryMetaRow) -> Self {
        let parent = row.parent_summary();
        CategoryRecord {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image: row.image,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            is_active: row.is_active,
            sort_order: row.sort_order,
            parent_id: row.parent_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            parent,
            counts: RelationCounts {
                products: row.product_count,
                children: row.child_count,
            },
            attributes: None,
            children: None,
            products: None,
        }
    }
}

/// One level of children on the single-category endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryChild {
    #[serde(flatten)]
    pub category: CategoryRow,
    #[serde(rename = "_count")]
    pub counts: ProductCount,
}

/// Node of the nested hierarchy view.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTreeNode {
    #[serde(flatten)]
    pub category: CategoryRow,
    #[serde(rename = "_count")]
    pub counts: RelationCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSummary>>,
    pub children: Vec<CategoryTreeNode>,
}

/// Move result: the updated row plus its parent summary, no counts.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithParent {
    #[serde(flatten)]
    pub category: CategoryRow,
    pub parent: Option<CategorySummary>,
}

/// Search projection.
#[derive(Debug, Clone, FromRow)]
pub struct SearchRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParentName {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent: Option<ParentName>,
}

impl From<SearchRow> for SearchHit {
    fn from(row: SearchRow) -> Self {
        SearchHit {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image: row.image,
            parent: row.parent_name.map(|name| ParentName { name }),
        }
    }
}

/// Flat export record (one per category, ordered by sortOrder then name).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent_category: String,
    pub product_count: i64,
    pub subcategory_count: i64,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Rendered export: body bytes plus download metadata.
#[derive(Debug, Clone)]
pub struct CategoryExportPage {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub count: usize,
}

/// Aggregate counters for the stats endpoint.
#[derive(Debug, Clone, FromRow)]
pub struct StatisticsRow {
    pub total_categories: i64,
    pub active_categories: i64,
    pub categories_with_products: i64,
    pub root_categories: i64,
    pub product_assignments: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub total_categories: i64,
    pub active_categories: i64,
    pub categories_with_products: i64,
    pub root_categories: i64,
    pub inactive_categories: i64,
    pub average_products_per_category: i64,
}

impl From<StatisticsRow> for StatisticsReport {
    fn from(row: StatisticsRow) -> Self {
        let average = if row.total_categories > 0 {
            (row.product_assignments as f64 / row.total_categories as f64).round() as i64
        } else {
            0
        };
        StatisticsReport {
            total_categories: row.total_categories,
            active_categories: row.active_categories,
            categories_with_products: row.categories_with_products,
            root_categories: row.root_categories,
            inactive_categories: row.total_categories - row.active_categories,
            average_products_per_category: average,
        }
    }
}
