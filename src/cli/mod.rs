// CLI module for en2ja
// Author: kelexine (https://github.com/kelexine)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// en2ja - English/Japanese translation with a local translation memory
#[derive(Parser, Debug)]
#[command(name = "en2ja", version, about, long_about = None)]
pub struct Args {
    /// Configuration file (defaults to ~/.en2ja/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Translate one or more texts, reusing the translation memory
    Translate {
        /// Source language (defaults to translation.default_source_language)
        #[arg(long)]
        from: Option<String>,

        /// Target language (defaults to translation.default_target_language)
        #[arg(long)]
        to: Option<String>,

        /// Texts to translate; several texts are sent as one batch
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Translate with automatic source language detection
    Auto {
        /// Target language
        #[arg(long)]
        to: String,

        /// Text to translate
        text: String,
    },

    /// Show translation memory statistics
    Stats,

    /// Delete every stored translation
    Clear,

    /// Remove expired translations
    Evict,

    /// Print the effective configuration (API key redacted)
    Config,

    /// Start the HTTP API
    Serve,
}
