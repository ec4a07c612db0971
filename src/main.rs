use clap::Parser;
use dotenvy::dotenv;

use thera_watch::cli::Cli;
use thera_watch::config::Config;
use thera_watch::error::AppError;
use thera_watch::logging::init_logging;
use thera_watch::pipeline;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let config = Config::from_env()
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(err.exit_code());
        })
        .apply_cli(&cli);

    tracing::info!(
        "Watching {} against configs in {}",
        config.eve_scout_url,
        config.config_dir.display()
    );

    if let Err(err) = pipeline::run(&config).await {
        tracing::error!("{}", err);
        std::process::exit(err.exit_code());
    }
}
