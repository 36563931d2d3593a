//! Where the user-editable category list lives.

use crate::db::queries::settings;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::Taxonomy;

const TAXONOMY_KEY: &str = "taxonomy";

pub trait TaxonomyStore: Send + Sync {
    /// The stored taxonomy, or the defaults when nothing has been saved.
    fn load(&self) -> AppResult<Taxonomy>;

    fn save(&self, taxonomy: &Taxonomy) -> AppResult<()>;
}

/// Keeps the taxonomy as a JSON array in the `settings` table.
#[derive(Clone)]
pub struct SqliteTaxonomyStore {
    db: DbPool,
}

impl SqliteTaxonomyStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl TaxonomyStore for SqliteTaxonomyStore {
    fn load(&self) -> AppResult<Taxonomy> {
        let conn = self.db.get()?;
        let Some(raw) = settings::get_setting(&conn, TAXONOMY_KEY)? else {
            return Ok(Taxonomy::default());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(categories) if !categories.is_empty() => Ok(Taxonomy { categories }),
            Ok(_) => Ok(Taxonomy::default()),
            Err(e) => {
                tracing::warn!("Stored taxonomy is unreadable, using defaults: {}", e);
                Ok(Taxonomy::default())
            }
        }
    }

    fn save(&self, taxonomy: &Taxonomy) -> AppResult<()> {
        let value = serde_json::to_string(&taxonomy.categories)
            .map_err(|e| AppError::Internal(format!("Failed to encode taxonomy: {}", e)))?;
        let conn = self.db.get()?;
        settings::set_setting(&conn, TAXONOMY_KEY, &value)?;
        tracing::info!(count = taxonomy.categories.len(), "Taxonomy updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, migrations};
    use std::path::Path;
    use std::sync::Mutex;

    /// Process-local store for checking the trait contract without SQLite.
    #[derive(Default)]
    struct InMemoryTaxonomyStore {
        taxonomy: Mutex<Option<Taxonomy>>,
    }

    impl TaxonomyStore for InMemoryTaxonomyStore {
        fn load(&self) -> AppResult<Taxonomy> {
            Ok(self.taxonomy.lock().unwrap().clone().unwrap_or_default())
        }

        fn save(&self, taxonomy: &Taxonomy) -> AppResult<()> {
            *self.taxonomy.lock().unwrap() = Some(taxonomy.clone());
            Ok(())
        }
    }

    fn sqlite_store() -> SqliteTaxonomyStore {
        let pool = create_in_memory_pool().unwrap();
        migrations::run_migrations(&pool.get().unwrap(), Path::new("migrations")).unwrap();
        SqliteTaxonomyStore::new(pool)
    }

    fn taxonomy(names: &[&str]) -> Taxonomy {
        Taxonomy {
            categories: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn test_sqlite_store_defaults_then_persists() {
        let store = sqlite_store();
        assert_eq!(store.load().unwrap(), Taxonomy::default());

        store.save(&taxonomy(&["Rent", "Food"])).unwrap();
        assert_eq!(store.load().unwrap(), taxonomy(&["Rent", "Food"]));
    }

    #[test]
    fn test_sqlite_store_ignores_garbage() {
        let store = sqlite_store();
        settings::set_setting(&store.db.get().unwrap(), TAXONOMY_KEY, "not json").unwrap();
        assert_eq!(store.load().unwrap(), Taxonomy::default());
    }

    fn check_store(store: &dyn TaxonomyStore) {
        assert_eq!(store.load().unwrap(), Taxonomy::default());
        store.save(&taxonomy(&["A"])).unwrap();
        store.save(&taxonomy(&["B", "C"])).unwrap();
        assert_eq!(store.load().unwrap(), taxonomy(&["B", "C"]));
    }

    #[test]
    fn test_stores_agree_on_load_and_save() {
        check_store(&InMemoryTaxonomyStore::default());
        check_store(&sqlite_store());
    }
}
