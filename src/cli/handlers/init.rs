use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::catalog_io::save_catalog;
use crate::io::market_io::{self, CONFIG_FILE, MARKET_DIR};
use crate::model::item::Item;

const MARKET_TOML_TEMPLATE: &str = r##"[market]
name = "{name}"
# ISO code shown next to prices and stamped on new listings
currency = "NZD"

[catalog]
# Relative to market/
file = "catalog.json"

[search]
# newest, oldest, price_low, price_high or popular
default_sort = "newest"
# Rows printed by search, latest and popular (0 = unlimited)
page_size = 20

[ui]
# en or zh; `mkt lang` overrides this per market
default_language = "en"
"##;

const SAMPLE_CATALOG: &str = include_str!("sample_catalog.json");

/// Listings seeded by `mkt init --sample`
pub fn sample_items() -> Result<Vec<Item>, serde_json::Error> {
    serde_json::from_str(SAMPLE_CATALOG)
}

/// Infer a market name from a directory name: hyphens and underscores become spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_market_toml(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    MARKET_TOML_TEMPLATE.replace("{name}", &escaped)
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let market_dir = dir.join(MARKET_DIR);

    if market_dir.join(CONFIG_FILE).exists() && !args.force {
        return Err("market already exists in ./market/ (use --force to reinitialize)".into());
    }

    // Nested markets are allowed, but worth a note
    if let Some(parent) = dir.parent()
        && let Ok(parent_root) = market_io::discover_market(parent)
    {
        eprintln!(
            "Note: parent market found at {}/",
            parent_root.join(MARKET_DIR).display()
        );
    }

    let name = args.name.unwrap_or_else(|| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Untitled Market".to_string())
    });

    fs::create_dir_all(&market_dir)?;
    fs::write(market_dir.join(CONFIG_FILE), render_market_toml(&name))?;

    let items = if args.sample { sample_items()? } else { Vec::new() };
    let market = market_io::load_market(dir)?;
    save_catalog(&market_dir, &market.catalog_path(), &items)?;

    tracing::info!(name = %name, items = items.len(), "market initialized");
    println!("Initialized market: {}", name);
    if args.sample {
        println!("  seeded {} sample listings", items.len());
    }
    Ok(())
}
