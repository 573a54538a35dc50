mod attributes;
mod breadcrumb;
mod bulk;
mod create;
mod delete;
mod export;
mod list;
mod relocate;
mod reorder;
mod search;
mod show;
mod stats;
mod update;

pub use attributes::{attribute_create, attribute_delete, attribute_list, attribute_update};
pub use breadcrumb::category_breadcrumb;
pub use bulk::category_bulk_update;
pub use create::category_create;
pub use delete::category_delete;
pub use export::category_export;
pub use list::category_list;
pub use relocate::category_move;
pub use reorder::category_reorder;
pub use search::category_search;
pub use show::category_show;
pub use stats::category_stats;
pub use update::{category_status, category_update};

use uuid::Uuid;

use crate::error::ApiError;

/// Query-string booleans arrive as literal strings; only "true" is truthy.
pub(crate) fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("true"))
}

/// "true"/"false" filter a listing; anything else leaves it unfiltered.
pub(crate) fn tri_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_wire_convention() {
        assert!(flag(Some("true")));
        assert!(!flag(Some("TRUE")));
        assert!(!flag(Some("1")));
        assert!(!flag(None));

        assert_eq!(tri_flag(Some("true")), Some(true));
        assert_eq!(tri_flag(Some("false")), Some(false));
        assert_eq!(tri_flag(Some("maybe")), None);
        assert_eq!(tri_flag(None), None);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("definitely-not-a-uuid", "category id").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "category id").unwrap(), id);
    }
}
