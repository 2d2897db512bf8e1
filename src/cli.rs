//! CLI definitions for StyleScope.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stylescope_protocols::ColorFormat;

/// StyleScope CLI.
#[derive(Parser)]
#[command(name = "stylescope")]
#[command(about = "Inspect page colors and fonts, pick elements, export Tailwind themes")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Classify a URL against the page policy
    Classify {
        /// Address to classify
        url: String,
    },

    /// Analyze the colors and fonts of a page snapshot
    Analyze {
        /// Path to a page snapshot (JSON)
        snapshot: PathBuf,

        /// Color display format (hex, rgb, hsl)
        #[arg(long, default_value = "hex")]
        format: ColorFormat,

        /// Print the raw analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a Tailwind theme extension for a page snapshot
    Export {
        /// Path to a page snapshot (JSON)
        snapshot: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pick one element of a page snapshot with the element picker
    Pick {
        /// Path to a page snapshot (JSON)
        snapshot: PathBuf,

        /// `id` attribute of the element to click
        #[arg(long)]
        target: String,

        /// Color display format (hex, rgb, hsl)
        #[arg(long, default_value = "hex")]
        format: ColorFormat,
    },
}
