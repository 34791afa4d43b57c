//! Command line interface definition.

use clap::Parser;
use std::path::PathBuf;

/// Browse Czech first-name frequency statistics (1900–2023) in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Data root: a directory containing data/, or an http(s) base URL
    #[arg(default_value = ".")]
    pub data_root: PathBuf,

    /// How many selected-name badges to show before the overflow badge
    #[arg(long)]
    pub max_badges: Option<usize>,

    /// Report the rendered height as JSON lines to this file (host embedding)
    #[arg(long, value_name = "FILE")]
    pub embed_height_file: Option<PathBuf>,

    /// Identifier used in height-report messages
    #[arg(long, default_value = "jmena")]
    pub embed_id: String,

    /// Write the default config file and exit (--force to overwrite)
    #[arg(long)]
    pub init_config: bool,

    /// Overwrite an existing config file with --init-config
    #[arg(long)]
    pub force: bool,

    /// Clear cached data (search history) and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}
