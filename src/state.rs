use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;
use crate::services::classifier::Classifier;
use crate::services::taxonomy::{SqliteTaxonomyStore, TaxonomyStore};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub classifier: Classifier,
    pub taxonomy: Arc<dyn TaxonomyStore>,
}

impl AppState {
    /// State backed by `db`, with the taxonomy persisted in the same database.
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            classifier: config.jitter.classifier(),
            taxonomy: Arc::new(SqliteTaxonomyStore::new(db.clone())),
            config: Arc::new(config),
            db,
        }
    }
}
