use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::book::Mode;
use crate::pipeline::Bitrate;

#[derive(Parser)]
#[command(name = "m4bpack")]
#[command(about = "CLI tool for assembling chaptered m4b audiobooks from audio tracks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the JSON configuration file
    #[arg(long, global = true, default_value = "m4bpack.json")]
    pub config: PathBuf,

    /// Track derivation mode
    #[arg(long, value_enum, global = true, default_value_t = Mode::Structured)]
    pub mode: Mode,

    /// Output audio bitrate
    #[arg(long, value_enum, global = true, default_value_t = Bitrate::Kbps64)]
    pub bitrate: Bitrate,

    /// Path to the log file
    #[arg(long, global = true, default_value = "m4bpack.log")]
    pub log_path: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and display the audiobook data as JSON without converting
    Show,

    /// Convert the audiobook to chaptered m4b track(s)
    Convert,
}
