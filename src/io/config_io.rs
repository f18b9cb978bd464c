use std::fs;
use std::path::Path;

use crate::io::market_io::{CONFIG_FILE, MarketError};
use crate::model::config::MarketConfig;
use crate::model::filter::SortBy;
use crate::model::locale::Language;

/// Read the market config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(market_dir: &Path) -> Result<(MarketConfig, toml_edit::DocumentMut), MarketError> {
    let config_path = market_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| MarketError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: MarketConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(market_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), MarketError> {
    let config_path = market_dir.join(CONFIG_FILE);
    fs::write(&config_path, doc.to_string()).map_err(|e| MarketError::ReadError {
        path: config_path,
        source: e,
    })?;
    Ok(())
}

/// Set a `section.key` value in the config document after checking it.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), String> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| format!("expected <section>.<key>, got \"{}\"", key))?;

    let item = match (section, field) {
        ("market", "name") | ("catalog", "file") => {
            if value.trim().is_empty() {
                return Err(format!("{} cannot be empty", key));
            }
            toml_edit::value(value)
        }
        ("market", "currency") => {
            if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(format!(
                    "invalid currency \"{}\": use a 3-letter code like NZD",
                    value
                ));
            }
            toml_edit::value(value)
        }
        ("search", "default_sort") => {
            if SortBy::parse(value) == SortBy::InputOrder {
                return Err(format!(
                    "unknown sort \"{}\" (expected: newest, oldest, price_low, price_high, popular)",
                    value
                ));
            }
            toml_edit::value(value)
        }
        ("search", "page_size") => {
            let n: i64 = value
                .parse()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| format!("page_size must be a non-negative integer, got \"{}\"", value))?;
            toml_edit::value(n)
        }
        ("ui", "default_language") => {
            let lang = Language::parse(value)
                .ok_or_else(|| format!("unknown language \"{}\" (expected: en, zh)", value))?;
            toml_edit::value(lang.code())
        }
        _ => return Err(format!("unknown config key \"{}\"", key)),
    };

    if !doc.contains_key(section) {
        doc[section] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[section][field] = item;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# Marketplace settings
[market]
name = "test"
currency = "NZD"

[search]
# shown when no --sort is given
default_sort = "newest"
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let market_dir = tmp.path().join("market");
        fs::create_dir_all(&market_dir).unwrap();
        let config_path = market_dir.join(CONFIG_FILE);

        let original = sample_config();
        fs::write(&config_path, original).unwrap();

        let (_config, doc) = read_config(&market_dir).unwrap();
        write_config(&market_dir, &doc).unwrap();

        let written = fs::read_to_string(&config_path).unwrap();
        assert_eq!(written, original);
    }

    #[test]
    fn test_set_value_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_value(&mut doc, "search.default_sort", "price_low").unwrap();
        let result = doc.to_string();
        assert!(result.contains("# shown when no --sort is given"));
        assert!(result.contains("default_sort = \"price_low\""));
        let config: MarketConfig = toml::from_str(&result).unwrap();
        assert_eq!(config.search.default_sort, SortBy::PriceLow);
    }

    #[test]
    fn test_set_value_creates_section() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_value(&mut doc, "ui.default_language", "ZH").unwrap();
        set_value(&mut doc, "search.page_size", "5").unwrap();
        let config: MarketConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.ui.default_language, Language::Zh);
        assert_eq!(config.search.page_size, 5);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        assert!(set_value(&mut doc, "search.default_sort", "cheapest").is_err());
        assert!(set_value(&mut doc, "market.currency", "dollars").is_err());
        assert!(set_value(&mut doc, "search.page_size", "-1").is_err());
        assert!(set_value(&mut doc, "nosection", "x").is_err());
        assert!(set_value(&mut doc, "market.owner", "x").is_err());
        assert_eq!(doc.to_string(), sample_config());
    }
}
