mod init;
mod sell;
pub use init::{cmd_init, sample_items};
pub use sell::{SellOutcome, run_sell};

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global override for the market directory (set by -C flag)
static MARKET_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::catalog_io::JsonCatalog;
use crate::io::config_io;
use crate::io::market_io::{self, MarketError};
use crate::io::prefs::PreferenceStore;
use crate::io::recovery;
use crate::io::repository::ItemRepository;
use crate::model::filter::{FilterConfig, SortBy};
use crate::model::item::{CATEGORIES, Condition, Item};
use crate::model::locale::{Language, category_label};
use crate::model::market::Market;
use crate::ops::catalog_ops::{find_item, latest, most_viewed, record_view};
use crate::ops::catalog_query::query_catalog;
use crate::ops::query_url::{SearchRequest, from_query_string, to_query_string};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for start_dir()
    if let Some(ref dir) = cli.market_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        let _ = MARKET_DIR_OVERRIDE.set(abs);
    }

    match cli.command {
        // Init runs before any market exists
        Commands::Init(args) => cmd_init(args, &start_dir()?),

        // Read commands
        Commands::Search(args) => cmd_search(args, json),
        Commands::Show(args) => cmd_show(args, json),
        Commands::Latest(args) => cmd_top(args, TopKind::Latest, json),
        Commands::Popular(args) => cmd_top(args, TopKind::Popular, json),
        Commands::Categories => cmd_categories(json),
        Commands::Favs => cmd_favs(json),

        // Preferences
        Commands::Fav(args) => cmd_fav(args, json),
        Commands::Lang(args) => cmd_lang(args),

        // Listing
        Commands::Sell => cmd_sell(json),

        // Maintenance
        Commands::Config(args) => cmd_config(args, json),
        Commands::Recovery(args) => cmd_recovery(args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start_dir() -> Result<PathBuf, MarketError> {
    match MARKET_DIR_OVERRIDE.get() {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(MarketError::IoError),
    }
}

fn load_market_cwd() -> Result<Market, MarketError> {
    let root = market_io::discover_market(&start_dir()?)?;
    market_io::load_market(&root)
}

/// Everything a read or write command needs: the market, its catalog and
/// the user's preferences.
struct Session {
    market: Market,
    catalog: JsonCatalog,
    prefs: PreferenceStore,
}

impl Session {
    fn open() -> Result<Session, MarketError> {
        let market = load_market_cwd()?;
        let catalog = JsonCatalog::open(&market);
        let prefs = PreferenceStore::load(&market.market_dir);
        Ok(Session {
            market,
            catalog,
            prefs,
        })
    }

    fn language(&self) -> Language {
        self.prefs.language_or(self.market.config.ui.default_language)
    }

    fn print_items(&self, items: &[&Item]) {
        let lang = self.language();
        for item in items {
            println!(
                "{}",
                format_item_line(item, lang, self.prefs.is_favorite(&item.id))
            );
        }
    }

    fn items_json<'a>(&self, items: &[&'a Item]) -> Vec<ItemJson<'a>> {
        items
            .iter()
            .map(|item| ItemJson {
                item,
                favorite: self.prefs.is_favorite(&item.id),
            })
            .collect()
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

/// Build the search request: `--url` first, then explicit flags on top.
fn build_search_request(
    args: &SearchArgs,
    default_sort: SortBy,
) -> Result<SearchRequest, Box<dyn std::error::Error>> {
    let mut req = match &args.url {
        Some(qs) => from_query_string(qs),
        None => SearchRequest {
            query: String::new(),
            filters: FilterConfig {
                sort_by: default_sort,
                ..Default::default()
            },
        },
    };
    if let Some(q) = &args.query {
        req.query = q.clone();
    }
    if let Some(c) = &args.category {
        req.filters.category = c.clone();
    }
    if let Some(c) = &args.condition {
        let condition = Condition::parse(c).ok_or_else(|| {
            format!(
                "unknown condition \"{}\" (expected: new, like_new, good, fair)",
                c
            )
        })?;
        req.filters.condition = Some(condition);
    }
    if let Some(min) = args.min_price {
        req.filters.min_price = min;
    }
    if let Some(max) = args.max_price {
        req.filters.max_price = max;
    }
    if let Some(loc) = &args.location {
        req.filters.location = loc.clone();
    }
    if let Some(s) = &args.sort {
        req.filters.sort_by = SortBy::parse(s);
    }
    Ok(req)
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let req = build_search_request(&args, session.market.config.search.default_sort)?;

    if args.share {
        let qs = to_query_string(&req);
        if json {
            print_json(&serde_json::json!({ "query_string": qs }))?;
        } else {
            println!("{}", qs);
        }
        return Ok(());
    }

    let items = session.catalog.fetch_items()?;
    let mut results = query_catalog(&items, &req.query, &req.filters);
    let total = results.len();
    let page_size = session.market.config.search.page_size;
    if !args.all && page_size > 0 {
        results.truncate(page_size);
    }

    if json {
        return print_json(&SearchJson {
            query_string: to_query_string(&req),
            total,
            items: session.items_json(&results),
        });
    }

    if results.is_empty() {
        if req.filters.has_active_filters() {
            println!("no matching items (try fewer filters)");
        } else {
            println!("no matching items");
        }
        return Ok(());
    }
    session.print_items(&results);
    if total > results.len() {
        println!(
            "... {} more (use --all to show every match)",
            total - results.len()
        );
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let items = session.catalog.fetch_items()?;
    if find_item(&items, &args.id).is_none() {
        return Err(format!("item not found: {}", args.id).into());
    }

    let item = session
        .catalog
        .update(|items| {
            record_view(items, &args.id);
            Ok(find_item(items, &args.id).cloned())
        })?
        .ok_or_else(|| format!("item not found: {}", args.id))?;

    let favorite = session.prefs.is_favorite(&item.id);
    if json {
        return print_json(&ItemJson {
            item: &item,
            favorite,
        });
    }
    for line in format_item_detail(&item, session.language(), favorite) {
        println!("{}", line);
    }
    Ok(())
}

enum TopKind {
    Latest,
    Popular,
}

fn cmd_top(args: TopArgs, kind: TopKind, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let items = session.catalog.fetch_items()?;
    let top = match kind {
        TopKind::Latest => latest(&items, args.count),
        TopKind::Popular => most_viewed(&items, args.count),
    };
    if json {
        return print_json(&session.items_json(&top));
    }
    if top.is_empty() {
        println!("catalog is empty");
        return Ok(());
    }
    session.print_items(&top);
    Ok(())
}

fn cmd_categories(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let lang = session.language();
    if json {
        let list: Vec<_> = CATEGORIES
            .iter()
            .map(|c| serde_json::json!({ "name": c, "label": category_label(c, lang) }))
            .collect();
        return print_json(&list);
    }
    for c in CATEGORIES {
        let label = category_label(c, lang);
        if label == *c {
            println!("{}", c);
        } else {
            println!("{} ({})", label, c);
        }
    }
    Ok(())
}

fn cmd_favs(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let items = session.catalog.fetch_items()?;
    // Favorites whose item has left the catalog are skipped
    let favs: Vec<&Item> = session
        .prefs
        .prefs()
        .favorites
        .iter()
        .filter_map(|id| find_item(&items, id))
        .collect();
    if json {
        return print_json(&session.items_json(&favs));
    }
    if favs.is_empty() {
        println!("no favorites yet (add one with `mkt fav <ID>`)");
        return Ok(());
    }
    session.print_items(&favs);
    Ok(())
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

fn cmd_fav(args: FavArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    let items = session.catalog.fetch_items()?;
    let item = find_item(&items, &args.id)
        .ok_or_else(|| format!("item not found: {}", args.id))?;
    let favorite = session.prefs.toggle_favorite(&item.id)?;
    if json {
        return print_json(&serde_json::json!({ "id": item.id, "favorite": favorite }));
    }
    if favorite {
        println!("added to favorites: [{}] {}", item.id, item.title);
    } else {
        println!("removed from favorites: [{}] {}", item.id, item.title);
    }
    Ok(())
}

fn cmd_lang(args: LangArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    let lang = Language::parse(&args.code)
        .ok_or_else(|| format!("unknown language \"{}\" (expected: en, zh)", args.code))?;
    session.prefs.set_language(lang)?;
    println!("language set to {}", lang.code());
    Ok(())
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

fn cmd_sell(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    let lang = session.language();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let outcome = run_sell(
        stdin.lock(),
        &mut stdout,
        &mut session.catalog,
        lang,
        &session.market.market_dir,
    )?;
    if json && let SellOutcome::Submitted(item) = &outcome {
        print_json(item)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let market = load_market_cwd()?;
    match args.action {
        ConfigAction::Set { key, value } => {
            let (_, mut doc) = config_io::read_config(&market.market_dir)?;
            config_io::set_value(&mut doc, &key, &value)?;
            config_io::write_config(&market.market_dir, &doc)?;
            tracing::info!(key = %key, value = %value, "config updated");
            println!("{} = {}", key, value);
        }
        ConfigAction::Show => {
            if json {
                print_json(&market.config)?;
            } else {
                print!("{}", toml::to_string_pretty(&market.config)?);
            }
        }
    }
    Ok(())
}

fn cmd_recovery(args: RecoveryArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let market = load_market_cwd()?;
    if args.clear {
        let n = recovery::clear_recovery(&market.market_dir)?;
        println!("cleared {} recovery entries", n);
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&market.market_dir, args.limit);
    if json {
        let list: Vec<RecoveryEntryJson> = entries
            .into_iter()
            .map(|e| RecoveryEntryJson {
                timestamp: e.timestamp.to_rfc3339(),
                category: e.category.to_string(),
                description: e.description,
                fields: e.fields,
                body: e.body,
            })
            .collect();
        return print_json(&list);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in &entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}
