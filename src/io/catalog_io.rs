use std::fs;
use std::path::{Path, PathBuf};

use crate::io::lock::CatalogLock;
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry, atomic_write};
use crate::io::repository::{ItemRepository, RepoError, build_item};
use crate::model::draft::ListingPayload;
use crate::model::item::Item;
use crate::model::market::Market;

/// Read a catalog file. A missing file is an empty catalog.
pub fn load_catalog(path: &Path) -> Result<Vec<Item>, RepoError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(RepoError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let items: Vec<Item> = serde_json::from_str(&content).map_err(|e| RepoError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), count = items.len(), "catalog loaded");
    Ok(items)
}

/// Atomically replace a catalog file. On failure the serialized catalog is
/// kept in the recovery log.
pub fn save_catalog(market_dir: &Path, path: &Path, items: &[Item]) -> Result<(), RepoError> {
    let content = serde_json::to_string_pretty(items)?;
    if let Err(e) = atomic_write(path, content.as_bytes()) {
        recovery::log_recovery(
            market_dir,
            RecoveryEntry {
                timestamp: chrono::Utc::now(),
                category: RecoveryCategory::Write,
                description: "catalog write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), path.display().to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(RepoError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }
    tracing::debug!(path = %path.display(), count = items.len(), "catalog saved");
    Ok(())
}

/// The catalog file of a market, used as an item repository
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    market_dir: PathBuf,
    path: PathBuf,
    currency: String,
}

impl JsonCatalog {
    pub fn open(market: &Market) -> Self {
        JsonCatalog {
            market_dir: market.market_dir.clone(),
            path: market.catalog_path(),
            currency: market.config.market.currency.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-modify-write the catalog under the market lock
    pub fn update<T>(
        &self,
        f: impl FnOnce(&mut Vec<Item>) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let _lock = CatalogLock::acquire_default(&self.market_dir)?;
        let mut items = load_catalog(&self.path)?;
        let out = f(&mut items)?;
        save_catalog(&self.market_dir, &self.path, &items)?;
        Ok(out)
    }

    pub fn save_all(&self, items: &[Item]) -> Result<(), RepoError> {
        let _lock = CatalogLock::acquire_default(&self.market_dir)?;
        save_catalog(&self.market_dir, &self.path, items)
    }
}

impl ItemRepository for JsonCatalog {
    fn fetch_items(&self) -> Result<Vec<Item>, RepoError> {
        load_catalog(&self.path)
    }

    fn create_item(&mut self, payload: &ListingPayload) -> Result<Item, RepoError> {
        let currency = self.currency.clone();
        self.update(|items| {
            let item = build_item(payload, items, &currency)?;
            items.push(item.clone());
            Ok(item)
        })
    }
}
