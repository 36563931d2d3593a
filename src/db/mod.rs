pub mod migrations;
pub mod pool;
pub mod queries;
pub mod repository;
pub mod seed;

pub use pool::{create_in_memory_pool, create_pool, DbPool};
