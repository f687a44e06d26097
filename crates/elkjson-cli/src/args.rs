//! Command-line argument definitions for the elkjson CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input document, the configuration
//! file, parser behaviour and logging verbosity.

use clap::Parser;

/// Command-line arguments for the ELK JSON graph checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input ELK JSON file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Stop at the first lexical or syntax error instead of recovering
    #[arg(long)]
    pub no_recovery: bool,

    /// Give every element without an identifier a generated one
    #[arg(long)]
    pub generate_ids: bool,
}
