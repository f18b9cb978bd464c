use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter (e.g. `MKT_LOG=nzmarket=debug`)
pub const LOG_ENV: &str = "MKT_LOG";
/// Set to `1` or `true` for JSON log lines
pub const LOG_JSON_ENV: &str = "MKT_LOG_JSON";

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. `verbose` raises the default level from warn to debug.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let json = std::env::var(LOG_JSON_ENV)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    // try_init: a second call (e.g. from tests) is a no-op
    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    let _ = result;
}
