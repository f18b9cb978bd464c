use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::MarketConfig;
use crate::model::market::Market;

/// Name of the marketplace directory
pub const MARKET_DIR: &str = "market";
/// Name of the config file inside it
pub const CONFIG_FILE: &str = "market.toml";

/// Error type for market discovery and config I/O
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("not a market: no market/ directory found")]
    NotAMarket,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse market.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit market.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for a `market/` directory with a config file.
/// Returns the directory containing `market/`.
pub fn discover_market(start: &Path) -> Result<PathBuf, MarketError> {
    let mut current = start.to_path_buf();
    loop {
        let market_dir = current.join(MARKET_DIR);
        if market_dir.is_dir() && market_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(MarketError::NotAMarket);
        }
    }
}

/// Load the market rooted at `root`
pub fn load_market(root: &Path) -> Result<Market, MarketError> {
    let market_dir = root.join(MARKET_DIR);
    if !market_dir.is_dir() {
        return Err(MarketError::NotAMarket);
    }

    let config_path = market_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| MarketError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: MarketConfig = toml::from_str(&config_text)?;
    tracing::debug!(root = %root.display(), name = %config.market.name, "market loaded");

    Ok(Market {
        root: root.to_path_buf(),
        market_dir,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_market(root: &Path) {
        let dir = root.join(MARKET_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "[market]\nname = \"Test\"\n").unwrap();
    }

    #[test]
    fn test_discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        write_market(tmp.path());
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        let root = discover_market(&nested).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_discover_fails_without_config() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(MARKET_DIR)).unwrap();
        assert!(matches!(
            discover_market(tmp.path()),
            Err(MarketError::NotAMarket)
        ));
    }

    #[test]
    fn test_load_reads_config() {
        let tmp = TempDir::new().unwrap();
        write_market(tmp.path());
        let market = load_market(tmp.path()).unwrap();
        assert_eq!(market.config.market.name, "Test");
        assert_eq!(
            market.catalog_path(),
            tmp.path().join("market").join("catalog.json")
        );
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(MARKET_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "[market\n").unwrap();
        let err = load_market(tmp.path()).unwrap_err();
        assert!(err.to_string().starts_with("could not parse market.toml"));
    }
}
