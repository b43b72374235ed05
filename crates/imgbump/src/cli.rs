//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// imgbump - Pin container image digests in deployment config files
#[derive(Parser, Debug)]
#[command(name = "imgbump")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logs and human-readable summaries
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to imgbump.yaml config file
    #[arg(short, long, global = true, env = "IMGBUMP_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the latest digests and patch every target
    Update(UpdateArgs),

    /// Check the configuration without contacting any registry
    Validate(ValidateArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Show what would be updated without modifying any file
    #[arg(long)]
    pub dry_run: bool,

    /// Update only these components (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub components: Vec<String>,

    /// Skip these components (comma-separated); ignored with --components
    #[arg(long, value_delimiter = ',')]
    pub exclude_components: Vec<String>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub http_timeout: Option<u64>,

    /// Maximum tag listing pages fetched per repository
    #[arg(long, value_name = "PAGES")]
    pub max_pages: Option<u32>,

    /// Print the outcome as JSON
    #[arg(long, conflicts_with = "pr")]
    pub json: bool,

    /// Print a pull request title and body for the changes
    #[arg(long)]
    pub pr: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
