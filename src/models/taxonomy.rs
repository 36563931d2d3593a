use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::validation::{Validate, ValidationError};

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Groceries",
    "Dining",
    "Fuel",
    "Shopping",
    "Bills",
    "Entertainment",
    "Transport",
    "Healthcare",
    "Other",
];

/// The ordered list of category names shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub categories: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TaxonomyRequest {
    pub categories: Option<Vec<String>>,
}

impl Validate for TaxonomyRequest {
    type Valid = Taxonomy;

    fn validate(self) -> Result<Taxonomy, ValidationError> {
        let categories: Vec<String> = self
            .categories
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect();

        if categories.is_empty() {
            return Err(ValidationError::invalid(
                "categories",
                "Categories must be a non-empty array",
            ));
        }
        if categories.iter().any(|c| c.is_empty()) {
            return Err(ValidationError::invalid(
                "categories",
                "Category names cannot be empty",
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = categories.iter().find(|c| !seen.insert(c.to_lowercase())) {
            return Err(ValidationError::Duplicate {
                field: "name",
                message: format!("Category '{}' appears more than once", dup),
            });
        }

        Ok(Taxonomy { categories })
    }
}
