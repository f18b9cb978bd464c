use clap::Parser;
use nzmarket::cli::commands::Cli;
use nzmarket::cli::handlers;
use nzmarket::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        tracing::debug!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
