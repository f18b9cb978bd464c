use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mkt", about = concat!("mkt v", env!("CARGO_PKG_VERSION"), " - a second-hand marketplace in your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different market directory
    #[arg(short = 'C', long = "market-dir", global = true)]
    pub market_dir: Option<String>,

    /// Debug logging on stderr (overridden by MKT_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new market in the current directory
    Init(InitArgs),
    /// Search and filter the catalog
    Search(SearchArgs),
    /// Show item details
    Show(ShowArgs),
    /// Show the newest listings
    Latest(TopArgs),
    /// Show the most viewed listings
    Popular(TopArgs),
    /// List known categories
    Categories,
    /// Toggle an item as favorite
    Fav(FavArgs),
    /// List favorite items
    Favs,
    /// Set the display language
    Lang(LangArgs),
    /// Create a listing step by step (reads commands from stdin)
    Sell,
    /// Edit market.toml
    Config(ConfigCmd),
    /// View or clear the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Market name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Seed the catalog with sample listings
    #[arg(long)]
    pub sample: bool,
    /// Reinitialize even if market/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Free text matched against title, description and tags
    pub query: Option<String>,
    /// Category (exact name, e.g. "Home & Garden")
    #[arg(long)]
    pub category: Option<String>,
    /// Condition (new, like_new, good, fair)
    #[arg(long)]
    pub condition: Option<String>,
    /// Minimum price (0 = no bound)
    #[arg(long)]
    pub min_price: Option<f64>,
    /// Maximum price (0 = no bound)
    #[arg(long)]
    pub max_price: Option<f64>,
    /// Location substring
    #[arg(long)]
    pub location: Option<String>,
    /// Sort order (newest, oldest, price_low, price_high, popular)
    #[arg(long)]
    pub sort: Option<String>,
    /// Start from a shared query string (e.g. "q=bike&sort=price_low")
    #[arg(long)]
    pub url: Option<String>,
    /// Print the shareable query string instead of results
    #[arg(long)]
    pub share: bool,
    /// Show every match, ignoring search.page_size
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Item ID
    pub id: String,
}

#[derive(Args)]
pub struct TopArgs {
    /// How many items to show
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,
}

#[derive(Args)]
pub struct FavArgs {
    /// Item ID
    pub id: String,
}

#[derive(Args)]
pub struct LangArgs {
    /// Language code (en, zh)
    pub code: String,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set a value, e.g. `mkt config set search.default_sort price_low`
    Set {
        /// Key as <section>.<key>
        key: String,
        value: String,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show at most this many entries
    #[arg(long)]
    pub limit: Option<usize>,
    /// Delete the recovery log
    #[arg(long)]
    pub clear: bool,
}
