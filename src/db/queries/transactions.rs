use rusqlite::{params, Connection, Row};

use crate::date_utils::{now_iso, range_end, range_start};
use crate::db::repository::{self, Assignments, Conditions, Resource, Write};
use crate::error::{AppError, AppResult, Constraint};
use crate::models::transaction::{NewTransactionRequest, TransactionPatchRequest};
use crate::models::{NewTransaction, Transaction, TransactionChanges, TransactionFilter};
use crate::validation::{query_ref, ValidationError};

fn invalid_date(field: &'static str) -> ValidationError {
    ValidationError::invalid(field, format!("{field} must be an ISO date (YYYY-MM-DD)"))
}

impl Resource for Transaction {
    const NAME: &'static str = "Transaction";
    const TABLE: &'static str = "transactions";
    const COLUMNS: &'static str =
        "id, user_id, description, amount, merchant_name, transaction_date, created_at, updated_at";
    const DEFAULT_LIMIT: i64 = 50;

    type Filter = TransactionFilter;
    type CreateRequest = NewTransactionRequest;
    type PatchRequest = TransactionPatchRequest;
    type New = NewTransaction;
    type Changes = TransactionChanges;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            description: row.get(2)?,
            amount: row.get(3)?,
            merchant_name: row.get(4)?,
            transaction_date: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn filter(filter: &TransactionFilter, conditions: &mut Conditions) -> Result<(), ValidationError> {
        if let Some(user_id) = query_ref(filter.user_id.as_deref(), "user_id")? {
            conditions.and("user_id = ?", user_id);
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            conditions.and_search(&["description", "merchant_name"], search);
        }
        if let Some(start) = filter.start_date.as_deref().filter(|d| !d.trim().is_empty()) {
            let start = range_start(start).ok_or_else(|| invalid_date("start_date"))?;
            conditions.and("transaction_date >= ?", start);
        }
        if let Some(end) = filter.end_date.as_deref().filter(|d| !d.trim().is_empty()) {
            let end = range_end(end).ok_or_else(|| invalid_date("end_date"))?;
            conditions.and("transaction_date <= ?", end);
        }
        Ok(())
    }

    fn insert(conn: &Connection, tx: &NewTransaction) -> AppResult<i64> {
        let now = now_iso();
        conn.execute(
            "INSERT INTO transactions
                (user_id, description, amount, merchant_name, transaction_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                tx.user_id,
                tx.description,
                tx.amount,
                tx.merchant_name,
                tx.transaction_date,
                now,
                now
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn assign(changes: &TransactionChanges, set: &mut Assignments) -> AppResult<()> {
        set.set_opt("user_id", &changes.user_id);
        set.set_opt("description", &changes.description);
        set.set_opt("amount", &changes.amount);
        set.set_opt("merchant_name", &changes.merchant_name);
        set.set_opt("transaction_date", &changes.transaction_date);
        set.set("updated_at", now_iso());
        Ok(())
    }

    fn constraint_error(constraint: Constraint, write: Write) -> AppError {
        match (constraint, write) {
            (_, Write::Delete) => AppError::foreign_key(
                "Cannot delete transaction. It is referenced by other records",
            ),
            _ => AppError::foreign_key("User does not exist"),
        }
    }
}

/// Insert every row or none. Returns the stored rows in input order.
pub fn insert_many(conn: &mut Connection, rows: &[NewTransaction]) -> AppResult<Vec<Transaction>> {
    let tx = conn.transaction()?;

    let mut created = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let id = Transaction::insert(&tx, row).map_err(|e| match e.constraint() {
            Some(_) => AppError::foreign_key(format!(
                "Transaction at index {}: user {} does not exist",
                index, row.user_id
            )),
            None => e,
        })?;
        created.push(repository::require::<Transaction>(&tx, id)?);
    }

    tx.commit()?;
    tracing::debug!(count = created.len(), "Bulk inserted transactions");
    Ok(created)
}
