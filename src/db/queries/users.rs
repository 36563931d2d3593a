use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use rusqlite::{params, Connection, Row};

use crate::date_utils::now_iso;
use crate::db::repository::{Assignments, Conditions, Resource, Write};
use crate::error::{AppError, AppResult, Constraint};
use crate::models::user::{NewUserRequest, UserPatchRequest};
use crate::models::{NewUser, User, UserChanges, UserFilter};
use crate::validation::ValidationError;

/// Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

impl Resource for User {
    const NAME: &'static str = "User";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, name, email, password_hash, created_at, updated_at";
    const DEFAULT_LIMIT: i64 = 10;
    const NOT_FOUND_CODE: &'static str = "USER_NOT_FOUND";

    type Filter = UserFilter;
    type CreateRequest = NewUserRequest;
    type PatchRequest = UserPatchRequest;
    type New = NewUser;
    type Changes = UserChanges;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn filter(filter: &UserFilter, conditions: &mut Conditions) -> Result<(), ValidationError> {
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            conditions.and_search(&["name", "email"], search);
        }
        Ok(())
    }

    fn insert(conn: &Connection, user: &NewUser) -> AppResult<i64> {
        let password_hash = hash_password(&user.password)?;
        let now = now_iso();
        conn.execute(
            "INSERT INTO users (name, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            params![user.name, user.email, password_hash, now, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn assign(changes: &UserChanges, set: &mut Assignments) -> AppResult<()> {
        set.set_opt("name", &changes.name);
        set.set_opt("email", &changes.email);
        if let Some(password) = &changes.password {
            set.set("password_hash", hash_password(password)?);
        }
        set.set("updated_at", now_iso());
        Ok(())
    }

    fn constraint_error(constraint: Constraint, write: Write) -> AppError {
        match (constraint, write) {
            (Constraint::Unique, _) => AppError::Constraint {
                code: "DUPLICATE_EMAIL",
                message: "Email already exists".into(),
            },
            (Constraint::ForeignKey, _) => AppError::foreign_key(
                "Cannot delete user. It is referenced by transactions or feedback",
            ),
        }
    }
}
