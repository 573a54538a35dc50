/// Shared types used across the codebase
use serde::{Deserialize, Deserializer, Serialize};

/// Offset pagination input, already clamped to the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Clamp raw query values: page >= 1, 1 <= limit <= max.
    pub fn clamped(page: Option<i64>, limit: Option<i64>) -> Self {
        let api = &crate::config::config().api;
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(api.default_page_limit)
            .clamp(1, api.max_page_limit);
        Pagination { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Page metadata returned alongside flat listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub next_page: Option<i64>,
    pub previous_page: Option<i64>,
}

impl PageMeta {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = (total + limit - 1) / limit;
        PageMeta {
            current_page: page,
            total_pages,
            total_items: total,
            items_per_page: limit,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
            next_page: (page < total_pages).then(|| page + 1),
            previous_page: (page > 1).then(|| page - 1),
        }
    }
}

/// Distinguishes an absent JSON field from an explicit null. Used for patch
/// fields like `parentId` where null means "make this a root category".
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn pagination_clamps_inputs() {
        let p = Pagination::clamped(None, None);
        assert_eq!(p, Pagination { page: 1, limit: 50 });

        let p = Pagination::clamped(Some(0), Some(500));
        assert_eq!(p, Pagination { page: 1, limit: 100 });

        let p = Pagination::clamped(Some(3), Some(20));
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn page_meta_boundaries() {
        let meta = PageMeta::new(101, 1, 50);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_previous_page);
        assert_eq!(meta.next_page, Some(2));
        assert_eq!(meta.previous_page, None);

        let meta = PageMeta::new(101, 3, 50);
        assert!(!meta.has_next_page);
        assert_eq!(meta.previous_page, Some(2));

        let meta = PageMeta::new(0, 1, 50);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<Uuid>>,
    }

    #[test]
    fn double_option_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.parent_id, None);

        let null: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(null.parent_id, Some(None));

        let id = Uuid::new_v4();
        let set: Patch = serde_json::from_str(&format!(r#"{{"parent_id": "{}"}}"#, id)).unwrap();
        assert_eq!(set.parent_id, Some(Some(id)));
    }
}
