//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::i18n::Language;
use crate::selection::WidthPolicy;

/// Convert images to Minecraft block art through a conversion service
#[derive(Parser, Debug)]
#[command(name = "minecraftimg")]
#[command(version, about = "Minecraft block-art conversion client", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Interactive session
    minecraftimg

    # One-shot conversion, 128 blocks wide, saved to ./out/minecraft.png
    minecraftimg convert cat.png --width 128 --output out

ENVIRONMENT:
    MINECRAFTIMG_API_URL    Conversion service base URL (default: http://localhost:5000)
    RUST_LOG                Log filter (default: warn)")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Conversion service base URL (overrides config and MINECRAFTIMG_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Initial number of horizontal blocks
    #[arg(long, short, global = true, allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Policy for widths outside 1-512
    #[arg(long, global = true)]
    pub width_policy: Option<WidthPolicy>,

    /// Display language
    #[arg(long, short, global = true)]
    pub language: Option<Language>,

    /// Directory minecraft.png is saved to
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a single image and save the result
    Convert {
        /// PNG or JPEG image to convert
        image: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
