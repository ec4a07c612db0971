use std::path::PathBuf;

use clap::Parser;

/// Thera Watch CLI arguments.
///
/// Every flag is optional and overrides the corresponding
/// environment-sourced config value.
#[derive(Debug, Parser)]
#[command(
    name = "thera-watch",
    version,
    about = "Watchlist alerts for live Thera wormhole connections"
)]
pub struct Cli {
    /// EVE-Scout wormholes API URL
    #[arg(long)]
    pub eve_scout_url: Option<String>,

    /// Directory of watchlist YAML documents
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Minimum known-connection count before the feed is trusted
    #[arg(long)]
    pub min_connections: Option<usize>,
}
