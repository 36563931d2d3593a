use serde::{Deserialize, Serialize};

use crate::json_utils::double_option;
use crate::validation::{required_text, Validate, ValidationError};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A validated signup. The password is still plain text here; it is hashed
/// right before the insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserPatchRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub password: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn check_email(email: String) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::Missing { field: "email" });
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::invalid("email", "Valid email is required")),
    }
}

fn check_password(password: String) -> Result<String, ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::Missing { field: "password" });
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::invalid(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    Ok(password)
}

impl Validate for NewUserRequest {
    type Valid = NewUser;

    fn validate(self) -> Result<NewUser, ValidationError> {
        let email = check_email(self.email.unwrap_or_default())?;
        let name = required_text(self.name, "name")?;
        let password = check_password(self.password.unwrap_or_default())?;
        Ok(NewUser {
            name,
            email,
            password,
        })
    }
}

impl Validate for UserPatchRequest {
    type Valid = UserChanges;

    fn validate(self) -> Result<UserChanges, ValidationError> {
        let mut changes = UserChanges::default();

        if let Some(email) = self.email {
            let email = email
                .ok_or_else(|| ValidationError::invalid("email", "Valid email is required"))?;
            changes.email = Some(check_email(email).map_err(|_| {
                ValidationError::invalid("email", "Valid email is required")
            })?);
        }

        if let Some(name) = self.name {
            match name.map(|n| n.trim().to_string()) {
                Some(n) if !n.is_empty() => changes.name = Some(n),
                _ => return Err(ValidationError::invalid("name", "Valid name is required")),
            }
        }

        if let Some(password) = self.password {
            let password = password.unwrap_or_default();
            changes.password = Some(check_password(password).map_err(|_| {
                ValidationError::invalid(
                    "password",
                    format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
                )
            })?);
        }

        if changes.name.is_none() && changes.email.is_none() && changes.password.is_none() {
            return Err(ValidationError::NoUpdates);
        }
        Ok(changes)
    }
}
