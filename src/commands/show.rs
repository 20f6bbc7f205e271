use std::path::Path;

use crate::book::{Book, Mode};
use crate::error::{Error, Result};
use crate::{config, pipeline};

/// Resolve the book, prepare its artifacts (so durations and temp-file paths
/// are populated), and print it as pretty JSON. No conversion happens.
pub fn run(config_path: &Path, mode: Mode) -> Result<()> {
    let config = config::load(config_path)?;
    let mut book = Book::from_config(&config, mode)?;
    pipeline::prepare(&mut book)?;

    let rendered = serde_json::to_string_pretty(&book)
        .map_err(|e| Error::value(format!("could not render book data: {e}")))?;
    println!("{rendered}");
    Ok(())
}
