use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of a per-category custom field. Stored as the `attribute_type`
/// Postgres enum; SELECT and MULTI_SELECT carry an options list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attribute_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    Text,
    Number,
    Select,
    MultiSelect,
    Color,
    Boolean,
    Date,
}

impl AttributeType {
    /// SELECT-like types are meaningless without a choice list.
    pub fn requires_options(&self) -> bool {
        matches!(self, AttributeType::Select | AttributeType::MultiSelect)
    }
}

/// Custom field definition owned by one category. (category_id, name) is
/// unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAttribute {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub required: bool,
    pub options: Vec<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_types_require_options() {
        assert!(AttributeType::Select.requires_options());
        assert!(AttributeType::MultiSelect.requires_options());
        assert!(!AttributeType::Text.requires_options());
        assert!(!AttributeType::Color.requires_options());
    }

    #[test]
    fn serializes_screaming_snake_case() {
        let json = serde_json::to_string(&AttributeType::MultiSelect).unwrap();
        assert_eq!(json, "\"MULTI_SELECT\"");
        let back: AttributeType = serde_json::from_str("\"COLOR\"").unwrap();
        assert_eq!(back, AttributeType::Color);
    }
}
