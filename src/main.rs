//! inbox-digest - Per-sender triage digest for an exported mailbox

use clap::Parser;
use inbox_digest::app::{App, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays clean
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting inbox-digest");

    if let Err(e) = App::run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
