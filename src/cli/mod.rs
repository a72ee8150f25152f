//! CLI argument definitions for the ideaforge application.

mod app;

pub use app::App;

use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    version = "0.1.0",
    about = "Ask a generation backend for structured ideas, then browse, filter and favorite them"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Path to the favorites directory
    #[clap(long, value_parser)]
    pub favorites_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the ideaforge application
    #[clap(subcommand)]
    pub command: Commands,
}
