//! services/storefront/src/bin/robokit.rs

use clap::Parser;
use storefront_lib::{cli, config::Config, context::AppContext, error::CliError};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // --- 1. Parse Arguments & Load Configuration ---
    let args = cli::Cli::parse();
    let config = Config::from_env()?;

    // --- 2. Set Up Logging (stderr, so command output stays pipeable) ---
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!(
        api = %config.api_base_url,
        session = %config.session_path.display(),
        "Configuration loaded"
    );

    // --- 3. Wire Adapters & Run ---
    let ctx = AppContext::from_config(config)?;
    cli::run(&ctx, args).await
}
