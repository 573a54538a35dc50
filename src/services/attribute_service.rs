use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::attribute::{AttributeType, CategoryAttribute};

use super::CatalogError;

/// Attribute creation payload; name and type are required, options become
/// mandatory for SELECT-like types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttribute {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub attribute_type: Option<AttributeType>,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttribute {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub attribute_type: Option<AttributeType>,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
    pub sort_order: Option<i32>,
}

/// Per-category custom field store. (categoryId, name) uniqueness is checked
/// eagerly before every insert/rename; the unique index backs it up.
#[derive(Clone)]
pub struct AttributeService {
    pool: PgPool,
}

impl AttributeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attributes of one category, ordered by sortOrder.
    pub async fn list(&self, category_id: Uuid) -> Result<Vec<CategoryAttribute>, CatalogError> {
        let attributes = sqlx::query_as(
            "SELECT id, category_id, name, attribute_type, required, options, sort_order, \
             created_at, updated_at FROM category_attributes \
             WHERE category_id = $1 ORDER BY sort_order ASC",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attributes)
    }

    pub async fn create(
        &self,
        category_id: Uuid,
        data: CreateAttribute,
    ) -> Result<CategoryAttribute, CatalogError> {
        let (name, attribute_type) = Self::validate_create(&data)?;

        let category_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
        if !category_exists {
            return Err(CatalogError::NotFound("Category"));
        }

        if self.name_exists(category_id, &name, None).await? {
            return Err(CatalogError::conflict(
                "Attribute with this name already exists for this category",
            ));
        }

        let sort_order = match data.sort_order {
            Some(given) => given,
            None => {
                let max: Option<i32> = sqlx::query_scalar(
                    "SELECT MAX(sort_order) FROM category_attributes WHERE category_id = $1",
                )
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
                max.unwrap_or(0) + 1
            }
        };

        let attribute = sqlx::query_as(
            "INSERT INTO category_attributes \
             (category_id, name, attribute_type, required, options, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, category_id, name, attribute_type, required, options, sort_order, \
             created_at, updated_at",
        )
        .bind(category_id)
        .bind(&name)
        .bind(attribute_type)
        .bind(data.required.unwrap_or(false))
        .bind(data.options.unwrap_or_default())
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(attribute)
    }

    pub async fn update(
        &self,
        attribute_id: Uuid,
        data: UpdateAttribute,
    ) -> Result<CategoryAttribute, CatalogError> {
        Self::validate_update(&data)?;

        let existing: Option<CategoryAttribute> = sqlx::query_as(
            "SELECT id, category_id, name, attribute_type, required, options, sort_order, \
             created_at, updated_at FROM category_attributes WHERE id = $1",
        )
        .bind(attribute_id)
        .fetch_optional(&self.pool)
        .await?;
        let existing = existing.ok_or(CatalogError::NotFound("Category attribute"))?;

        if let Some(name) = &data.name {
            if *name != existing.name
                && self
                    .name_exists(existing.category_id, name, Some(attribute_id))
                    .await?
            {
                return Err(CatalogError::conflict(
                    "Attribute with this name already exists for this category",
                ));
            }
        }

        let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "UPDATE category_attributes SET updated_at = now()",
        );
        if let Some(name) = &data.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(attribute_type) = data.attribute_type {
            builder.push(", attribute_type = ").push_bind(attribute_type);
        }
        if let Some(required) = data.required {
            builder.push(", required = ").push_bind(required);
        }
        if let Some(options) = &data.options {
            builder.push(", options = ").push_bind(options);
        }
        if let Some(sort_order) = data.sort_order {
            builder.push(", sort_order = ").push_bind(sort_order);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(attribute_id)
            .push(" RETURNING id, category_id, name, attribute_type, required, options, sort_order, created_at, updated_at");

        let attribute = builder
            .build_query_as::<CategoryAttribute>()
            .fetch_one(&self.pool)
            .await?;
        Ok(attribute)
    }

    pub async fn delete(&self, attribute_id: Uuid) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM category_attributes WHERE id = $1")
            .bind(attribute_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound("Category attribute"));
        }
        Ok(())
    }

    async fn name_exists(
        &self,
        category_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, CatalogError> {
        let exists = match exclude {
            Some(id) => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM category_attributes \
                 WHERE category_id = $1 AND name = $2 AND id <> $3)",
            )
            .bind(category_id)
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await?,
            None => sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM category_attributes \
                 WHERE category_id = $1 AND name = $2)",
            )
            .bind(category_id)
            .bind(name)
            .fetch_one(&self.pool)
            .await?,
        };
        Ok(exists)
    }

    fn validate_create(data: &CreateAttribute) -> Result<(String, AttributeType), CatalogError> {
        let name = match &data.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => return Err(CatalogError::validation("Attribute name is required")),
        };
        Self::check_name(&name)?;

        let attribute_type = data
            .attribute_type
            .ok_or_else(|| CatalogError::validation("Attribute type is required"))?;

        if attribute_type.requires_options()
            && data.options.as_ref().map_or(true, |options| options.is_empty())
        {
            return Err(CatalogError::validation(
                "Options are required for SELECT and MULTI_SELECT types",
            ));
        }
        Self::check_options(data.options.as_deref())?;
        Self::check_sort_order(data.sort_order)?;

        Ok((name, attribute_type))
    }

    fn validate_update(data: &UpdateAttribute) -> Result<(), CatalogError> {
        if let Some(name) = &data.name {
            if name.is_empty() {
                return Err(CatalogError::validation("Attribute name is required"));
            }
            Self::check_name(name)?;
        }
        Self::check_options(data.options.as_deref())?;
        Self::check_sort_order(data.sort_order)
    }

    fn check_name(name: &str) -> Result<(), CatalogError> {
        if name.chars().count() > 50 {
            return Err(CatalogError::validation(
                "Attribute name cannot exceed 50 characters",
            ));
        }
        Ok(())
    }

    fn check_options(options: Option<&[String]>) -> Result<(), CatalogError> {
        if let Some(options) = options {
            if options.iter().any(|option| option.chars().count() > 50) {
                return Err(CatalogError::validation(
                    "Attribute options cannot exceed 50 characters",
                ));
            }
        }
        Ok(())
    }

    fn check_sort_order(sort_order: Option<i32>) -> Result<(), CatalogError> {
        if let Some(sort_order) = sort_order {
            if sort_order < 0 {
                return Err(CatalogError::validation("Sort order cannot be negative"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_and_type() {
        let err = AttributeService::validate_create(&CreateAttribute::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(msg) if msg.contains("name is required")));

        let missing_type = CreateAttribute {
            name: Some("Size".to_string()),
            ..Default::default()
        };
        let err = AttributeService::validate_create(&missing_type).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(msg) if msg.contains("type is required")));
    }

    #[test]
    fn select_types_need_nonempty_options() {
        let no_options = CreateAttribute {
            name: Some("Size".to_string()),
            attribute_type: Some(AttributeType::Select),
            ..Default::default()
        };
        let err = AttributeService::validate_create(&no_options).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(msg) if msg.contains("Options are required")));

        let empty_options = CreateAttribute {
            name: Some("Size".to_string()),
            attribute_type: Some(AttributeType::MultiSelect),
            options: Some(vec![]),
            ..Default::default()
        };
        assert!(AttributeService::validate_create(&empty_options).is_err());

        let ok = CreateAttribute {
            name: Some("Size".to_string()),
            attribute_type: Some(AttributeType::Select),
            options: Some(vec!["S".to_string(), "M".to_string(), "L".to_string()]),
            ..Default::default()
        };
        assert!(AttributeService::validate_create(&ok).is_ok());
    }

    #[test]
    fn text_type_needs_no_options() {
        let data = CreateAttribute {
            name: Some("Material".to_string()),
            attribute_type: Some(AttributeType::Text),
            ..Default::default()
        };
        let (name, attribute_type) = AttributeService::validate_create(&data).unwrap();
        assert_eq!(name, "Material");
        assert_eq!(attribute_type, AttributeType::Text);
    }

    #[test]
    fn payload_accepts_wire_type_field() {
        let data: CreateAttribute = serde_json::from_str(
            r#"{"name": "Couleur", "type": "COLOR", "required": true}"#,
        )
        .unwrap();
        assert_eq!(data.attribute_type, Some(AttributeType::Color));
        assert_eq!(data.required, Some(true));
    }
}
