pub mod attribute_service;
pub mod category_service;
pub mod hierarchy;

pub use attribute_service::AttributeService;
pub use category_service::CategoryService;

use thiserror::Error;

/// Error taxonomy shared by the catalog services.
///
/// `Validation` and `Conflict` carry client-facing messages; `NotFound` names
/// the missing resource. Store-level failures pass through as `Database` and
/// are classified at the HTTP boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Category hierarchy is corrupted: parent chain exceeds {0} hops")]
    CorruptHierarchy(usize),

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CatalogError::Conflict(message.into())
    }
}
