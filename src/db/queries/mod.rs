//! Per-entity SQL. Each module implements [`Resource`](crate::db::repository::Resource)
//! for one table; entity-specific queries live beside it.

pub mod categories;
pub mod feedback;
pub mod predictions;
pub mod settings;
pub mod transactions;
pub mod users;
