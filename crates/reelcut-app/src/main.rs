//! Reelcut - command line video clip editor

use anyhow::Result;
use reelcut_app::cli::{self, Args};
use reelcut_app::EditorConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = EditorConfig::load(args.config.as_deref())?;
    debug!(?config, "Loaded configuration");

    let stdout = std::io::stdout();
    cli::run(args.command, &config, &mut stdout.lock()).await
}
