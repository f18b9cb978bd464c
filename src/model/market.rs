use std::path::PathBuf;

use super::config::MarketConfig;

/// A discovered marketplace directory and its configuration
#[derive(Debug)]
pub struct Market {
    /// Root directory (parent of `market/`)
    pub root: PathBuf,
    /// Path to the `market/` directory
    pub market_dir: PathBuf,
    /// Parsed market.toml
    pub config: MarketConfig,
}

impl Market {
    /// Absolute path of the catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.market_dir.join(&self.config.catalog.file)
    }
}
