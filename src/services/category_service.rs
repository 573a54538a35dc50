use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::models::category::{
    CategoryChild, CategoryExportPage, CategoryMetaRow, CategoryRecord, CategoryRow,
    CategorySummary, CategoryTreeNode, CategoryWithParent, ExportRecord, ProductCount,
    RelationCounts, SearchHit, SearchRow, StatisticsReport, StatisticsRow,
};
use crate::database::models::product::{ProductSummary, ProductSummaryRow};
use crate::slug::generate_slug;
use crate::types::{double_option, Pagination};

use super::hierarchy;
use super::CatalogError;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, image, seo_title, seo_description, \
     is_active, sort_order, parent_id, created_at, updated_at";

const META_SELECT: &str = "SELECT c.id, c.name, c.slug, c.description, c.image, c.seo_title, \
     c.seo_description, c.is_active, c.sort_order, c.parent_id, c.created_at, c.updated_at, \
     p.name AS parent_name, p.slug AS parent_slug, \
     (SELECT COUNT(*) FROM products pr WHERE pr.category_id = c.id) AS product_count, \
     (SELECT COUNT(*) FROM categories ch WHERE ch.parent_id = c.id) AS child_count \
     FROM categories c LEFT JOIN categories p ON p.id = c.parent_id";

/// Category creation payload. `name` is the only required field; slug and
/// sortOrder are derived when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Partial category patch. `parent_id` is tri-state: absent leaves the parent
/// alone, explicit null detaches to root, a uuid re-parents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOrder {
    pub id: Uuid,
    pub sort_order: i32,
}

/// Patch applied by bulk-update; restricted to status and parent pointer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPatch {
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyOptions {
    pub is_active: Option<bool>,
    pub include_products: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct FlatOptions {
    pub is_active: Option<bool>,
    pub include_products: bool,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShowOptions {
    pub include_children: bool,
    pub include_products: bool,
}

/// Category store: CRUD, tree assembly and reporting over the catalog
/// database.
///
/// Hierarchy mutations (create, update, move, delete) serialize on an
/// in-process mutex so two concurrent moves cannot interleave their cycle
/// checks. Mutations issued by other processes against the same database are
/// not covered by this guard.
#[derive(Clone)]
pub struct CategoryService {
    pool: PgPool,
    tree_guard: Arc<Mutex<()>>,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tree_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Nested hierarchy view: roots (optionally filtered by isActive) with
    /// children recursively attached down to the depth cap, siblings ordered
    /// by sortOrder at every level.
    pub async fn get_hierarchy(
        &self,
        options: HierarchyOptions,
    ) -> Result<Vec<CategoryTreeNode>, CatalogError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY sort_order ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let counts: HashMap<Uuid, i64> =
            sqlx::query_as::<_, (Uuid, i64)>(
                "SELECT category_id, COUNT(*) FROM products GROUP BY category_id",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .collect();

        let mut products_by_category: HashMap<Uuid, Vec<ProductSummary>> = HashMap::new();
        if options.include_products {
            let product_rows: Vec<ProductSummaryRow> = sqlx::query_as(
                "SELECT category_id, id, name, slug, base_price, images FROM products \
                 WHERE is_active = TRUE ORDER BY name ASC",
            )
            .fetch_all(&self.pool)
            .await?;
            for row in product_rows {
                products_by_category
                    .entry(row.category_id)
                    .or_default()
                    .push(row.into());
            }
        }

        // arena+index assembly: group rows by parent, then attach level by
        // level; fetch order keeps siblings sorted
        let mut children_of: HashMap<Option<Uuid>, Vec<CategoryRow>> = HashMap::new();
        for row in rows {
            children_of.entry(row.parent_id).or_default().push(row);
        }

        let roots = children_of.remove(&None).unwrap_or_default();
        let mut nodes = Vec::with_capacity(roots.len());
        for root in roots {
            if let Some(active) = options.is_active {
                if root.is_active != active {
                    continue;
                }
            }
            nodes.push(Self::assemble_node(
                root,
                &mut children_of,
                &counts,
                &mut products_by_category,
                options.include_products,
                0,
            ));
        }
        Ok(nodes)
    }

    fn assemble_node(
        category: CategoryRow,
        children_of: &mut HashMap<Option<Uuid>, Vec<CategoryRow>>,
        product_counts: &HashMap<Uuid, i64>,
        products_by_category: &mut HashMap<Uuid, Vec<ProductSummary>>,
        include_products: bool,
        depth: i32,
    ) -> CategoryTreeNode {
        let child_count = children_of
            .get(&Some(category.id))
            .map_or(0, |rows| rows.len() as i64);
        let child_rows = if depth < hierarchy::MAX_DEPTH {
            children_of.remove(&Some(category.id)).unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut children = Vec::with_capacity(child_rows.len());
        for child in child_rows {
            children.push(Self::assemble_node(
                child,
                children_of,
                product_counts,
                products_by_category,
                include_products,
                depth + 1,
            ));
        }

        let product_count = product_counts.get(&category.id).copied().unwrap_or(0);
        let products = include_products
            .then(|| products_by_category.remove(&category.id).unwrap_or_default());

        CategoryTreeNode {
            counts: RelationCounts {
                products: product_count,
                children: child_count,
            },
            products,
            category,
            children,
        }
    }

    /// Flat paginated listing ordered by sortOrder, then name.
    pub async fn get_flat(
        &self,
        options: FlatOptions,
    ) -> Result<(Vec<CategoryRecord>, i64), CatalogError> {
        let limit = options.pagination.limit;
        let offset = options.pagination.offset();

        let (rows, total): (Vec<CategoryMetaRow>, i64) = match options.is_active {
            Some(active) => {
                let rows = sqlx::query_as(&format!(
                    "{META_SELECT} WHERE c.is_active = $1 \
                     ORDER BY c.sort_order ASC, c.name ASC LIMIT $2 OFFSET $3"
                ))
                .bind(active)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                let total =
                    sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE is_active = $1")
                        .bind(active)
                        .fetch_one(&self.pool)
                        .await?;
                (rows, total)
            }
            None => {
                let rows = sqlx::query_as(&format!(
                    "{META_SELECT} ORDER BY c.sort_order ASC, c.name ASC LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                let total = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
                    .fetch_one(&self.pool)
                    .await?;
                (rows, total)
            }
        };

        let mut records: Vec<CategoryRecord> = rows.into_iter().map(Into::into).collect();

        if options.include_products && !records.is_empty() {
            let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
            let mut by_category = self.active_products_for(&ids).await?;
            for record in &mut records {
                record.products = Some(by_category.remove(&record.id).unwrap_or_default());
            }
        }

        Ok((records, total))
    }

    /// Single category with parent summary, attributes, counts, and the
    /// optional child/product sections. `Ok(None)` when the id is unknown.
    pub async fn get_by_id(
        &self,
        id: Uuid,
        options: ShowOptions,
    ) -> Result<Option<CategoryRecord>, CatalogError> {
        let Some(mut record) = self.find_with_meta(id).await? else {
            return Ok(None);
        };

        let attributes = sqlx::query_as(
            "SELECT id, category_id, name, attribute_type, required, options, sort_order, \
             created_at, updated_at FROM category_attributes \
             WHERE category_id = $1 ORDER BY sort_order ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        record.attributes = Some(attributes);

        if options.include_children {
            #[derive(FromRow)]
            struct ChildRow {
                #[sqlx(flatten)]
                category: CategoryRow,
                product_count: i64,
            }

            let child_rows: Vec<ChildRow> = sqlx::query_as(&format!(
                "SELECT {CATEGORY_COLUMNS}, \
                 (SELECT COUNT(*) FROM products pr WHERE pr.category_id = categories.id) AS product_count \
                 FROM categories WHERE parent_id = $1 ORDER BY sort_order ASC"
            ))
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

            record.children = Some(
                child_rows
                    .into_iter()
                    .map(|row| CategoryChild {
                        counts: ProductCount {
                            products: row.product_count,
                        },
                        category: row.category,
                    })
                    .collect(),
            );
        }

        if options.include_products {
            let mut by_category = self.active_products_for(&[id]).await?;
            record.products = Some(by_category.remove(&id).unwrap_or_default());
        }

        Ok(Some(record))
    }

    /// Create a category. Derives the slug from the name when absent and
    /// resolves collisions optimistically with a timestamp suffix; validates
    /// the parent before writing; defaults sortOrder to max(sibling) + 1.
    pub async fn create(&self, data: CreateCategory) -> Result<CategoryRecord, CatalogError> {
        let _guard = self.tree_guard.lock().await;

        Self::validate_create(&data)?;
        let name = data
            .name
            .ok_or_else(|| CatalogError::validation("Category name is required"))?;

        let mut slug = match data.slug.filter(|given| !given.is_empty()) {
            Some(given) => given,
            None => generate_slug(&name),
        };
        if slug.is_empty() {
            slug = format!("category-{}", Utc::now().timestamp_millis());
        }
        if self.slug_exists(&slug, None).await? {
            slug = format!("{}-{}", slug, Utc::now().timestamp_millis());
        }

        hierarchy::validate_reparent(&self.pool, None, data.parent_id).await?;

        let sort_order = match data.sort_order {
            Some(given) => given,
            None => self.next_sibling_sort_order(data.parent_id).await?,
        };

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO categories \
             (name, slug, description, image, seo_title, seo_description, is_active, sort_order, parent_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(&name)
        .bind(&slug)
        .bind(&data.description)
        .bind(&data.image)
        .bind(&data.seo_title)
        .bind(&data.seo_description)
        .bind(data.is_active.unwrap_or(true))
        .bind(sort_order)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await?;

        self.find_with_meta(id)
            .await?
            .ok_or(CatalogError::NotFound("Category"))
    }

    /// Patch a category. Regenerates the slug when the name changes without
    /// an explicit slug; a parentId in the patch (including explicit null)
    /// goes through the full reparent validation.
    pub async fn update(&self, id: Uuid, data: UpdateCategory) -> Result<CategoryRecord, CatalogError> {
        let _guard = self.tree_guard.lock().await;

        Self::validate_update(&data)?;

        let existing: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let existing = existing.ok_or(CatalogError::NotFound("Category"))?;

        let mut slug = data.slug.clone();
        if slug.is_none() {
            if let Some(name) = &data.name {
                if *name != existing.name {
                    let mut derived = generate_slug(name);
                    if derived.is_empty() {
                        derived = format!("category-{}", Utc::now().timestamp_millis());
                    }
                    if self.slug_exists(&derived, Some(id)).await? {
                        derived = format!("{}-{}", derived, Utc::now().timestamp_millis());
                    }
                    slug = Some(derived);
                }
            }
        }

        if let Some(parent_patch) = data.parent_id {
            hierarchy::validate_reparent(&self.pool, Some(id), parent_patch).await?;
        }

        let mut builder =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE categories SET updated_at = now()");
        if let Some(name) = &data.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(slug) = &slug {
            builder.push(", slug = ").push_bind(slug);
        }
        if let Some(description) = &data.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(image) = &data.image {
            builder.push(", image = ").push_bind(image);
        }
        if let Some(seo_title) = &data.seo_title {
            builder.push(", seo_title = ").push_bind(seo_title);
        }
        if let Some(seo_description) = &data.seo_description {
            builder.push(", seo_description = ").push_bind(seo_description);
        }
        if let Some(is_active) = data.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }
        if let Some(sort_order) = data.sort_order {
            builder.push(", sort_order = ").push_bind(sort_order);
        }
        if let Some(parent_patch) = data.parent_id {
            builder.push(", parent_id = ").push_bind(parent_patch);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.build().execute(&self.pool).await?;

        self.find_with_meta(id)
            .await?
            .ok_or(CatalogError::NotFound("Category"))
    }

    /// Delete a category. Children block the delete; products block it unless
    /// `move_products_to` names an existing target. Product reassignment,
    /// attribute rows, promotion links and the category row go in one
    /// transaction.
    pub async fn delete(
        &self,
        id: Uuid,
        move_products_to: Option<Uuid>,
    ) -> Result<(), CatalogError> {
        let _guard = self.tree_guard.lock().await;

        if !self.category_exists(id).await? {
            return Err(CatalogError::NotFound("Category"));
        }

        let child_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if child_count > 0 {
            return Err(CatalogError::conflict(
                "Cannot delete category with subcategories. Move or delete them first.",
            ));
        }

        let product_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if product_count > 0 {
            match move_products_to {
                Some(target) => {
                    if !self.category_exists(target).await? {
                        return Err(CatalogError::validation("Target category not found"));
                    }
                }
                None => {
                    return Err(CatalogError::conflict(
                        "Category has products. Specify a target category to move them or delete products first.",
                    ));
                }
            }
        }

        let mut tx = self.pool.begin().await?;
        if product_count > 0 {
            sqlx::query("UPDATE products SET category_id = $1, updated_at = now() WHERE category_id = $2")
                .bind(move_products_to)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM category_attributes WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM promotion_categories WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    /// Re-parent a category; `None` detaches it to root. Same validation path
    /// as update-with-parentId.
    pub async fn move_category(
        &self,
        id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> Result<CategoryWithParent, CatalogError> {
        let _guard = self.tree_guard.lock().await;

        if !self.category_exists(id).await? {
            return Err(CatalogError::NotFound("Category"));
        }

        hierarchy::validate_reparent(&self.pool, Some(id), new_parent_id).await?;

        let category: CategoryRow = sqlx::query_as(&format!(
            "UPDATE categories SET parent_id = $1, updated_at = now() WHERE id = $2 \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(new_parent_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let parent = match category.parent_id {
            Some(parent_id) => self.find_summary(parent_id).await?,
            None => None,
        };

        Ok(CategoryWithParent { category, parent })
    }

    /// Best-effort batch reorder: every update is attempted concurrently and
    /// independently; the first failure (if any) is reported after the batch
    /// completes. Not atomic across rows.
    pub async fn reorder_many(&self, orders: &[CategoryOrder]) -> Result<(), CatalogError> {
        for order in orders {
            if order.sort_order < 0 {
                return Err(CatalogError::validation("Sort order cannot be negative"));
            }
        }

        let results = join_all(orders.iter().map(|order| {
            let pool = self.pool.clone();
            async move {
                sqlx::query("UPDATE categories SET sort_order = $1, updated_at = now() WHERE id = $2")
                    .bind(order.sort_order)
                    .bind(order.id)
                    .execute(&pool)
                    .await
            }
        }))
        .await;

        for result in results {
            result?;
        }
        Ok(())
    }

    /// Case-insensitive substring search over name and description, active
    /// categories only, ordered by name.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<SearchHit>, CatalogError> {
        let pattern = format!("%{}%", query);
        let rows: Vec<SearchRow> = sqlx::query_as(
            "SELECT c.id, c.name, c.slug, c.description, c.image, p.name AS parent_name \
             FROM categories c LEFT JOIN categories p ON p.id = c.parent_id \
             WHERE c.is_active = TRUE AND (c.name ILIKE $1 OR c.description ILIKE $1) \
             ORDER BY c.name ASC LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Root-to-leaf path for the given category. Unknown ids produce an empty
    /// path.
    pub async fn breadcrumb(&self, category_id: Uuid) -> Result<Vec<CategorySummary>, CatalogError> {
        #[derive(FromRow)]
        struct CrumbRow {
            id: Uuid,
            name: String,
            slug: String,
            parent_id: Option<Uuid>,
        }

        let mut crumbs: Vec<CategorySummary> = Vec::new();
        let mut next_id = Some(category_id);
        let mut hops = 0usize;

        while let Some(id) = next_id {
            hops += 1;
            if hops > hierarchy::MAX_PARENT_HOPS {
                return Err(CatalogError::CorruptHierarchy(hierarchy::MAX_PARENT_HOPS));
            }

            let row: Option<CrumbRow> =
                sqlx::query_as("SELECT id, name, slug, parent_id FROM categories WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            let Some(row) = row else { break };

            crumbs.push(CategorySummary {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
            next_id = row.parent_id;
        }

        crumbs.reverse();
        Ok(crumbs)
    }

    /// Aggregate catalog counters.
    pub async fn statistics(&self) -> Result<StatisticsReport, CatalogError> {
        let row: StatisticsRow = sqlx::query_as(
            "SELECT \
             (SELECT COUNT(*) FROM categories) AS total_categories, \
             (SELECT COUNT(*) FROM categories WHERE is_active = TRUE) AS active_categories, \
             (SELECT COUNT(DISTINCT category_id) FROM products) AS categories_with_products, \
             (SELECT COUNT(*) FROM categories WHERE parent_id IS NULL) AS root_categories, \
             (SELECT COUNT(*) FROM products) AS product_assignments",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply one patch to every listed category. The hierarchy invariants are
    /// NOT re-validated per row on this path; use `move_category` when they
    /// matter.
    pub async fn bulk_update(&self, ids: &[Uuid], patch: &BulkPatch) -> Result<u64, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::validation("Category IDs array is required"));
        }
        if patch.is_active.is_none() && patch.parent_id.is_none() {
            return Err(CatalogError::validation(
                "At least one field to update is required",
            ));
        }

        let mut builder =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE categories SET updated_at = now()");
        if let Some(is_active) = patch.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }
        if let Some(parent_patch) = patch.parent_id {
            builder.push(", parent_id = ").push_bind(parent_patch);
        }
        builder.push(" WHERE id = ANY(").push_bind(ids).push(")");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Serialize every category (sortOrder, then name) into a downloadable
    /// flat record list. Supported formats: csv, json.
    pub async fn export(
        &self,
        format: &str,
        include_hierarchy: bool,
    ) -> Result<CategoryExportPage, CatalogError> {
        match format {
            "csv" | "json" => {}
            other => {
                return Err(CatalogError::Validation(format!(
                    "Unsupported export format: {}",
                    other
                )));
            }
        }

        #[derive(FromRow)]
        struct ExportRow {
            id: Uuid,
            name: String,
            slug: String,
            description: Option<String>,
            parent_name: Option<String>,
            product_count: i64,
            child_count: i64,
            is_active: bool,
            sort_order: i32,
            created_at: chrono::DateTime<Utc>,
        }

        let rows: Vec<ExportRow> = sqlx::query_as(
            "SELECT c.id, c.name, c.slug, c.description, p.name AS parent_name, \
             (SELECT COUNT(*) FROM products pr WHERE pr.category_id = c.id) AS product_count, \
             (SELECT COUNT(*) FROM categories ch WHERE ch.parent_id = c.id) AS child_count, \
             c.is_active, c.sort_order, c.created_at \
             FROM categories c LEFT JOIN categories p ON p.id = c.parent_id \
             ORDER BY c.sort_order ASC, c.name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let records: Vec<ExportRecord> = rows
            .into_iter()
            .map(|row| ExportRecord {
                id: row.id,
                name: row.name,
                slug: row.slug,
                description: row.description.unwrap_or_default(),
                parent_category: if include_hierarchy {
                    row.parent_name.unwrap_or_default()
                } else {
                    String::new()
                },
                product_count: row.product_count,
                subcategory_count: row.child_count,
                is_active: row.is_active,
                sort_order: row.sort_order,
                created_at: row.created_at,
            })
            .collect();

        let count = records.len();
        let (body, content_type) = match format {
            "csv" => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for record in &records {
                    writer
                        .serialize(record)
                        .map_err(|e| CatalogError::Serialize(e.to_string()))?;
                }
                let body = writer
                    .into_inner()
                    .map_err(|e| CatalogError::Serialize(e.to_string()))?;
                (body, "text/csv")
            }
            _ => {
                let body = serde_json::to_vec_pretty(&records)
                    .map_err(|e| CatalogError::Serialize(e.to_string()))?;
                (body, "application/json")
            }
        };

        Ok(CategoryExportPage {
            filename: format!(
                "categories-export-{}.{}",
                Utc::now().timestamp_millis(),
                format
            ),
            content_type,
            body,
            count,
        })
    }

    // ---- shared lookups -------------------------------------------------

    async fn find_with_meta(&self, id: Uuid) -> Result<Option<CategoryRecord>, CatalogError> {
        let row: Option<CategoryMetaRow> =
            sqlx::query_as(&format!("{META_SELECT} WHERE c.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<CategorySummary>, CatalogError> {
        let summary = sqlx::query_as("SELECT id, name, slug FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(summary)
    }

    async fn category_exists(&self, id: Uuid) -> Result<bool, CatalogError> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, CatalogError> {
        let exists = match exclude {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1 AND id <> $2)",
                )
                .bind(slug)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)")
                    .bind(slug)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(exists)
    }

    async fn next_sibling_sort_order(&self, parent_id: Option<Uuid>) -> Result<i32, CatalogError> {
        let max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(sort_order) FROM categories WHERE parent_id IS NOT DISTINCT FROM $1",
        )
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(max.unwrap_or(0) + 1)
    }

    async fn active_products_for(
        &self,
        category_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ProductSummary>>, CatalogError> {
        let rows: Vec<ProductSummaryRow> = sqlx::query_as(
            "SELECT category_id, id, name, slug, base_price, images FROM products \
             WHERE is_active = TRUE AND category_id = ANY($1) ORDER BY name ASC",
        )
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_category: HashMap<Uuid, Vec<ProductSummary>> = HashMap::new();
        for row in rows {
            by_category
                .entry(row.category_id)
                .or_default()
                .push(row.into());
        }
        Ok(by_category)
    }

    // ---- payload validation ---------------------------------------------

    fn validate_create(data: &CreateCategory) -> Result<(), CatalogError> {
        match &data.name {
            None => return Err(CatalogError::validation("Category name is required")),
            Some(name) => Self::check_name(name)?,
        }
        if let Some(slug) = &data.slug {
            Self::check_slug(slug)?;
        }
        Self::check_common_fields(
            data.description.as_deref(),
            data.image.as_deref(),
            data.seo_title.as_deref(),
            data.seo_description.as_deref(),
            data.sort_order,
        )
    }

    fn validate_update(data: &UpdateCategory) -> Result<(), CatalogError> {
        if let Some(name) = &data.name {
            Self::check_name(name)?;
        }
        if let Some(slug) = &data.slug {
            Self::check_slug(slug)?;
        }
        Self::check_common_fields(
            data.description.as_deref(),
            data.image.as_deref(),
            data.seo_title.as_deref(),
            data.seo_description.as_deref(),
            data.sort_order,
        )
    }

    fn check_name(name: &str) -> Result<(), CatalogError> {
        let length = name.chars().count();
        if length < 2 {
            return Err(CatalogError::validation(
                "Category name must be at least 2 characters",
            ));
        }
        if length > 100 {
            return Err(CatalogError::validation(
                "Category name cannot exceed 100 characters",
            ));
        }
        Ok(())
    }

    fn check_slug(slug: &str) -> Result<(), CatalogError> {
        if slug.is_empty() {
            return Ok(());
        }
        let valid = slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(CatalogError::validation(
                "Slug may only contain lowercase letters, numbers, and hyphens",
            ));
        }
        Ok(())
    }

    fn check_common_fields(
        description: Option<&str>,
        image: Option<&str>,
        seo_title: Option<&str>,
        seo_description: Option<&str>,
        sort_order: Option<i32>,
    ) -> Result<(), CatalogError> {
        if let Some(description) = description {
            if description.chars().count() > 1000 {
                return Err(CatalogError::validation(
                    "Description cannot exceed 1000 characters",
                ));
            }
        }
        if let Some(image) = image {
            if !image.is_empty() && url::Url::parse(image).is_err() {
                return Err(CatalogError::validation("Image must be a valid URL"));
            }
        }
        if let Some(seo_title) = seo_title {
            if seo_title.chars().count() > 60 {
                return Err(CatalogError::validation(
                    "SEO title cannot exceed 60 characters",
                ));
            }
        }
        if let Some(seo_description) = seo_description {
            if seo_description.chars().count() > 160 {
                return Err(CatalogError::validation(
                    "SEO description cannot exceed 160 characters",
                ));
            }
        }
        if let Some(sort_order) = sort_order {
            if sort_order < 0 {
                return Err(CatalogError::validation("Sort order cannot be negative"));
            }
        }
        Ok(())
    }
}
