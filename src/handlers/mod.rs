pub mod categories;

use sqlx::PgPool;

use crate::services::{AttributeService, CategoryService};

/// Shared handler state. Built once in `main` from the connected pool and
/// injected into every route via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub categories: CategoryService,
    pub attributes: AttributeService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: CategoryService::new(pool.clone()),
            attributes: AttributeService::new(pool.clone()),
            pool,
        }
    }
}
