use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedpipe::cli::{commands, Cli};
use feedpipe::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let config = cli.run_config(settings.fetch, Utc::now());

    // RUST_LOG wins over the verbosity picked on the command line
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_directive())),
        )
        .init();

    if cli.init {
        commands::init_manifest(&config.source_path)?;
        return Ok(());
    }

    commands::run_pipeline(&config).await?;

    Ok(())
}
