use serde::{Deserialize, Serialize};

use crate::json_utils::{double_option, Numeric};
use crate::validation::{
    check_hex_color, optional_ref, optional_text, parse_ref, required_text, Validate,
    ValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color_hex: String,
    pub icon: Option<String>,
    /// `None` for the system defaults every user sees.
    pub user_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    pub user_id: Option<String>,
    pub include_defaults: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "colorHex")]
    pub color_hex: Option<String>,
    pub icon: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<Numeric>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color_hex: String,
    pub icon: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPatchRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", alias = "colorHex")]
    pub color_hex: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", alias = "userId")]
    pub user_id: Option<Option<Numeric>>,
}

/// Outer `Option` is "leave unchanged"; inner `None` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color_hex: Option<String>,
    pub icon: Option<Option<String>>,
    pub user_id: Option<Option<i64>>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color_hex.is_none()
            && self.icon.is_none()
            && self.user_id.is_none()
    }
}

impl Validate for NewCategoryRequest {
    type Valid = NewCategory;

    fn validate(self) -> Result<NewCategory, ValidationError> {
        let name = required_text(self.name, "name")?;
        let color_hex = required_text(self.color_hex, "color_hex")?;
        check_hex_color(&color_hex)?;
        let user_id = optional_ref(self.user_id, "user_id")?;

        Ok(NewCategory {
            name,
            description: optional_text(self.description),
            color_hex,
            icon: optional_text(self.icon),
            user_id,
        })
    }
}

impl Validate for CategoryPatchRequest {
    type Valid = CategoryChanges;

    fn validate(self) -> Result<CategoryChanges, ValidationError> {
        let mut changes = CategoryChanges::default();

        if let Some(name) = self.name {
            match name.map(|n| n.trim().to_string()) {
                Some(n) if !n.is_empty() => changes.name = Some(n),
                _ => return Err(ValidationError::invalid("name", "Name cannot be empty")),
            }
        }

        if let Some(description) = self.description {
            changes.description = Some(optional_text(description));
        }

        if let Some(color) = self.color_hex {
            let color = color.map(|c| c.trim().to_string()).unwrap_or_default();
            check_hex_color(&color)?;
            changes.color_hex = Some(color);
        }

        if let Some(icon) = self.icon {
            changes.icon = Some(optional_text(icon));
        }

        if let Some(user_id) = self.user_id {
            changes.user_id = Some(user_id.map(|u| parse_ref(&u, "user_id")).transpose()?);
        }

        if changes.is_empty() {
            return Err(ValidationError::NoUpdates);
        }
        Ok(changes)
    }
}
