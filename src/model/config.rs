use serde::{Deserialize, Serialize};

use super::filter::SortBy;
use super::locale::Language;

/// Configuration from market.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub market: MarketInfo,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInfo {
    pub name: String,
    /// Default: see DEFAULT_CURRENCY
    #[serde(default = "default_currency")]
    pub currency: String,
}

pub const DEFAULT_CURRENCY: &str = "NZD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file, relative to market/
    #[serde(default = "default_catalog_file")]
    pub file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            file: default_catalog_file(),
        }
    }
}

fn default_catalog_file() -> String {
    "catalog.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_sort: SortBy,
    /// Max rows printed by `search`, `latest` and `popular` (0 = unlimited)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            default_sort: SortBy::Newest,
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    20
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Language used until the user picks one with `mkt lang`
    #[serde(default)]
    pub default_language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: MarketConfig = toml::from_str("[market]\nname = \"Test\"\n").unwrap();
        assert_eq!(config.market.currency, "NZD");
        assert_eq!(config.catalog.file, "catalog.json");
        assert_eq!(config.search.default_sort, SortBy::Newest);
        assert_eq!(config.search.page_size, 20);
        assert_eq!(config.ui.default_language, Language::En);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
[market]
name = "Aussie Market"
currency = "AUD"

[catalog]
file = "items.json"

[search]
default_sort = "price_low"
page_size = 5

[ui]
default_language = "zh"
"#;
        let config: MarketConfig = toml::from_str(text).unwrap();
        assert_eq!(config.market.currency, "AUD");
        assert_eq!(config.catalog.file, "items.json");
        assert_eq!(config.search.default_sort, SortBy::PriceLow);
        assert_eq!(config.search.page_size, 5);
        assert_eq!(config.ui.default_language, Language::Zh);
    }
}
