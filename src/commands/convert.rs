use colored::Colorize;
use std::path::Path;

use crate::book::{Book, Mode};
use crate::error::Result;
use crate::pipeline::Bitrate;
use crate::{config, pipeline};

/// Resolve the book, prepare its artifacts, then run the two-stage encode
/// for every track.
pub fn run(config_path: &Path, mode: Mode, bitrate: Bitrate) -> Result<()> {
    let config = config::load(config_path)?;
    let mut book = Book::from_config(&config, mode)?;
    pipeline::prepare(&mut book)?;

    println!(
        "{} {} track(s) at {}",
        "Converting".green(),
        book.tracks.len(),
        bitrate.as_arg()
    );
    pipeline::convert(&mut book, bitrate)?;

    println!(
        "{} Get your new audiobook from: {}",
        "All done!".green().bold(),
        book.output_path.display()
    );
    Ok(())
}
