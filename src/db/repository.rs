//! Generic list/get/create/update/delete over one table per entity.
//!
//! Each entity implements [`Resource`] once; the functions here and the
//! handlers in `handlers::crud` are then instantiated per entity.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult, Constraint};
use crate::validation::{Validate, ValidationError};

pub const MAX_LIMIT: i64 = 100;

/// The write a constraint violation happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Create,
    Update,
    Delete,
}

pub trait Resource: Serialize + Sized + Send + 'static {
    /// Capitalised singular name, used in messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Column list matching [`Resource::from_row`].
    const COLUMNS: &'static str;
    const DEFAULT_LIMIT: i64;
    const NOT_FOUND_CODE: &'static str = "NOT_FOUND";

    type Filter: DeserializeOwned + Default + Send + 'static;
    type CreateRequest: DeserializeOwned + Validate<Valid = Self::New> + Send + 'static;
    type PatchRequest: DeserializeOwned + Validate<Valid = Self::Changes> + Send + 'static;
    type New;
    type Changes;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn filter(_filter: &Self::Filter, _conditions: &mut Conditions) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Insert a row and return its id.
    fn insert(conn: &Connection, new: &Self::New) -> AppResult<i64>;

    fn assign(changes: &Self::Changes, set: &mut Assignments) -> AppResult<()>;

    fn constraint_error(constraint: Constraint, write: Write) -> AppError {
        match (constraint, write) {
            (_, Write::Delete) => AppError::foreign_key(format!(
                "Cannot delete {}. It is referenced by other records",
                Self::NAME.to_lowercase()
            )),
            (Constraint::ForeignKey, _) => {
                AppError::foreign_key("Referenced record does not exist")
            }
            (Constraint::Unique, _) => AppError::Constraint {
                code: "DUPLICATE",
                message: format!("{} already exists", Self::NAME),
            },
        }
    }
}

/// `AND`-joined filter clauses with their positional parameters.
#[derive(Default)]
pub struct Conditions {
    sql: String,
    params: Vec<Box<dyn ToSql>>,
}

impl Conditions {
    pub fn and(&mut self, clause: &str, value: impl ToSql + 'static) {
        self.sql.push_str(" AND ");
        self.sql.push_str(clause);
        self.params.push(Box::new(value));
    }

    /// Case-insensitive substring match on any of `columns`.
    pub fn and_search(&mut self, columns: &[&str], term: &str) {
        let pattern = format!("%{}%", term);
        let clauses: Vec<String> = columns.iter().map(|c| format!("{c} LIKE ?")).collect();
        self.sql.push_str(&format!(" AND ({})", clauses.join(" OR ")));
        for _ in columns {
            self.params.push(Box::new(pattern.clone()));
        }
    }
}

/// `SET` list of a partial update.
#[derive(Default)]
pub struct Assignments {
    columns: Vec<&'static str>,
    params: Vec<Box<dyn ToSql>>,
}

impl Assignments {
    pub fn set(&mut self, column: &'static str, value: impl ToSql + 'static) {
        self.columns.push(column);
        self.params.push(Box::new(value));
    }

    /// Only assigns when the change is present. `Some(None)` writes NULL.
    pub fn set_opt<T: ToSql + Clone + 'static>(&mut self, column: &'static str, value: &Option<T>) {
        if let Some(value) = value {
            self.set(column, value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

fn parse_non_negative(value: Option<&str>, field: &'static str) -> Result<Option<i64>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => match v.parse::<i64>() {
            Ok(n) if n >= 0 => Ok(Some(n)),
            _ => Err(ValidationError::invalid(
                field,
                format!("{field} must be a non-negative integer"),
            )),
        },
    }
}

impl PageQuery {
    /// Resolve against an entity's default limit. Limits above
    /// [`MAX_LIMIT`] are clamped.
    pub fn page(&self, default_limit: i64) -> Result<Page, ValidationError> {
        let limit = parse_non_negative(self.limit.as_deref(), "limit")?.unwrap_or(default_limit);
        let offset = parse_non_negative(self.offset.as_deref(), "offset")?.unwrap_or(0);
        Ok(Page {
            limit: limit.min(MAX_LIMIT),
            offset,
        })
    }
}

fn classify<R: Resource>(err: AppError, write: Write) -> AppError {
    match err.constraint() {
        Some(constraint) => R::constraint_error(constraint, write),
        None => err,
    }
}

pub fn list<R: Resource>(conn: &Connection, filter: &R::Filter, page: Page) -> AppResult<Vec<R>> {
    let mut conditions = Conditions::default();
    R::filter(filter, &mut conditions)?;

    let sql = format!(
        "SELECT {} FROM {} WHERE 1=1{} ORDER BY id LIMIT ? OFFSET ?",
        R::COLUMNS,
        R::TABLE,
        conditions.sql
    );
    conditions.params.push(Box::new(page.limit));
    conditions.params.push(Box::new(page.offset));

    let params_refs: Vec<&dyn ToSql> = conditions.params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_refs.as_slice(), R::from_row)?
        .collect::<rusqlite::Result<Vec<R>>>()?;

    Ok(rows)
}

pub fn get<R: Resource>(conn: &Connection, id: i64) -> AppResult<Option<R>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", R::COLUMNS, R::TABLE);
    Ok(conn.query_row(&sql, [id], R::from_row).optional()?)
}

/// Like [`get`], but a missing row is a not-found error.
pub fn require<R: Resource>(conn: &Connection, id: i64) -> AppResult<R> {
    get::<R>(conn, id)?
        .ok_or_else(|| AppError::not_found(R::NOT_FOUND_CODE, format!("{} not found", R::NAME)))
}

pub fn count<R: Resource>(conn: &Connection) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

pub fn create<R: Resource>(conn: &Connection, new: &R::New) -> AppResult<R> {
    let id = R::insert(conn, new).map_err(|e| classify::<R>(e, Write::Create))?;
    debug!(table = R::TABLE, id, "Created row");
    require::<R>(conn, id)
}

pub fn update<R: Resource>(conn: &Connection, id: i64, changes: &R::Changes) -> AppResult<R> {
    require::<R>(conn, id)?;

    let mut set = Assignments::default();
    R::assign(changes, &mut set)?;
    if set.is_empty() {
        return Err(ValidationError::NoUpdates.into());
    }

    let assignments: Vec<String> = set.columns.iter().map(|c| format!("{c} = ?")).collect();
    let sql = format!("UPDATE {} SET {} WHERE id = ?", R::TABLE, assignments.join(", "));
    set.params.push(Box::new(id));

    let params_refs: Vec<&dyn ToSql> = set.params.iter().map(|p| p.as_ref()).collect();
    conn.execute(&sql, params_refs.as_slice())
        .map_err(|e| classify::<R>(e.into(), Write::Update))?;
    debug!(table = R::TABLE, id, fields = ?set.columns, "Updated row");

    require::<R>(conn, id)
}

/// Delete a row, returning it as it was.
pub fn delete<R: Resource>(conn: &Connection, id: i64) -> AppResult<R> {
    let existing = require::<R>(conn, id)?;

    let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
    conn.execute(&sql, [id])
        .map_err(|e| classify::<R>(e.into(), Write::Delete))?;
    debug!(table = R::TABLE, id, "Deleted row");

    Ok(existing)
}
