use serde::{Deserialize, Serialize};

use crate::date_utils::{now_iso, parse_timestamp, to_iso};
use crate::json_utils::{double_option, Numeric};
use crate::validation::{optional_text, parse_ref, required_ref, Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub amount: Option<f64>,
    pub merchant_name: Option<String>,
    pub transaction_date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    pub user_id: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewTransactionRequest {
    #[serde(alias = "userId")]
    pub user_id: Option<Numeric>,
    pub description: Option<String>,
    pub amount: Option<Numeric>,
    #[serde(alias = "merchantName")]
    pub merchant_name: Option<String>,
    #[serde(alias = "transactionDate")]
    pub transaction_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub description: String,
    pub amount: Option<f64>,
    pub merchant_name: Option<String>,
    pub transaction_date: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionPatchRequest {
    #[serde(default, deserialize_with = "double_option", alias = "userId")]
    pub user_id: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub amount: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option", alias = "merchantName")]
    pub merchant_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", alias = "transactionDate")]
    pub transaction_date: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub user_id: Option<i64>,
    pub description: Option<String>,
    pub amount: Option<Option<f64>>,
    pub merchant_name: Option<Option<String>>,
    pub transaction_date: Option<String>,
}

impl TransactionChanges {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.merchant_name.is_none()
            && self.transaction_date.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkTransactionsRequest {
    pub transactions: Option<Vec<NewTransactionRequest>>,
}

fn parse_amount(amount: &Numeric) -> Result<f64, ValidationError> {
    amount
        .as_f64()
        .ok_or_else(|| ValidationError::invalid("amount", "amount must be a valid number"))
}

fn parse_date(date: &str) -> Result<String, ValidationError> {
    parse_timestamp(date).map(to_iso).ok_or_else(|| {
        ValidationError::invalid(
            "transaction_date",
            "Invalid transaction_date format. Use ISO date format (YYYY-MM-DD)",
        )
    })
}

impl Validate for NewTransactionRequest {
    type Valid = NewTransaction;

    fn validate(self) -> Result<NewTransaction, ValidationError> {
        let user_id = required_ref(self.user_id, "user_id")?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or(ValidationError::Missing {
                field: "description",
            })?;
        let amount = self.amount.as_ref().map(parse_amount).transpose()?;
        let transaction_date = match self.transaction_date.as_deref().map(str::trim) {
            Some(date) if !date.is_empty() => parse_date(date)?,
            _ => now_iso(),
        };

        Ok(NewTransaction {
            user_id,
            description,
            amount,
            merchant_name: optional_text(self.merchant_name),
            transaction_date,
        })
    }
}

impl Validate for TransactionPatchRequest {
    type Valid = TransactionChanges;

    fn validate(self) -> Result<TransactionChanges, ValidationError> {
        let mut changes = TransactionChanges::default();

        if let Some(user_id) = self.user_id {
            let user_id = user_id.ok_or_else(|| {
                ValidationError::invalid("user_id", "user_id must be a valid positive integer")
            })?;
            changes.user_id = Some(parse_ref(&user_id, "user_id")?);
        }

        if let Some(description) = self.description {
            match description.map(|d| d.trim().to_string()) {
                Some(d) if !d.is_empty() => changes.description = Some(d),
                _ => {
                    return Err(ValidationError::invalid(
                        "description",
                        "Description must be a non-empty string",
                    ))
                }
            }
        }

        if let Some(amount) = self.amount {
            changes.amount = Some(amount.as_ref().map(parse_amount).transpose()?);
        }

        if let Some(merchant) = self.merchant_name {
            changes.merchant_name = Some(optional_text(merchant));
        }

        if let Some(date) = self.transaction_date {
            let date = date.ok_or_else(|| {
                ValidationError::invalid("transaction_date", "transaction_date cannot be null")
            })?;
            changes.transaction_date = Some(parse_date(&date)?);
        }

        if changes.is_empty() {
            return Err(ValidationError::NoUpdates);
        }
        Ok(changes)
    }
}

impl Validate for BulkTransactionsRequest {
    type Valid = Vec<NewTransaction>;

    /// All rows are checked before anything is written.
    fn validate(self) -> Result<Vec<NewTransaction>, ValidationError> {
        let rows = self.transactions.ok_or(ValidationError::Missing {
            field: "transactions",
        })?;
        if rows.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                row.validate().map_err(|e| ValidationError::BatchItem {
                    index,
                    inner: Box::new(e),
                })
            })
            .collect()
    }
}
