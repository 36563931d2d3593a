use rusqlite::{params, Connection, Row};

use crate::date_utils::now_iso;
use crate::db::repository::{Assignments, Conditions, Resource, Write};
use crate::error::{AppError, AppResult, Constraint};
use crate::models::category::{CategoryPatchRequest, NewCategoryRequest};
use crate::models::{Category, CategoryChanges, CategoryFilter, NewCategory};
use crate::validation::{query_ref, ValidationError};

impl Resource for Category {
    const NAME: &'static str = "Category";
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str = "id, name, description, color_hex, icon, user_id, created_at";
    const DEFAULT_LIMIT: i64 = 100;

    type Filter = CategoryFilter;
    type CreateRequest = NewCategoryRequest;
    type PatchRequest = CategoryPatchRequest;
    type New = NewCategory;
    type Changes = CategoryChanges;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            color_hex: row.get(3)?,
            icon: row.get(4)?,
            user_id: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    /// Without `user_id` every category is listed. With it, only that user's
    /// categories, plus the shared defaults when `include_defaults=true`.
    fn filter(filter: &CategoryFilter, conditions: &mut Conditions) -> Result<(), ValidationError> {
        let Some(user_id) = query_ref(filter.user_id.as_deref(), "user_id")? else {
            return Ok(());
        };

        if filter.include_defaults.as_deref() == Some("true") {
            conditions.and("(user_id = ? OR user_id IS NULL)", user_id);
        } else {
            conditions.and("user_id = ?", user_id);
        }
        Ok(())
    }

    fn insert(conn: &Connection, category: &NewCategory) -> AppResult<i64> {
        conn.execute(
            "INSERT INTO categories (name, description, color_hex, icon, user_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                category.name,
                category.description,
                category.color_hex,
                category.icon,
                category.user_id,
                now_iso()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn assign(changes: &CategoryChanges, set: &mut Assignments) -> AppResult<()> {
        set.set_opt("name", &changes.name);
        set.set_opt("description", &changes.description);
        set.set_opt("color_hex", &changes.color_hex);
        set.set_opt("icon", &changes.icon);
        set.set_opt("user_id", &changes.user_id);
        Ok(())
    }

    fn constraint_error(constraint: Constraint, write: Write) -> AppError {
        match (constraint, write) {
            (Constraint::Unique, _) => AppError::Constraint {
                code: "DUPLICATE_NAME",
                message: "Category name already exists".into(),
            },
            (Constraint::ForeignKey, Write::Delete) => AppError::foreign_key(
                "Cannot delete category. It is referenced by other records (predictions or feedback)",
            ),
            (Constraint::ForeignKey, _) => AppError::foreign_key("User does not exist"),
        }
    }
}
