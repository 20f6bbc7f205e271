use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::BookConfig;
use crate::error::Result;

/// Characters never allowed in paths or generated filenames
pub const ILLEGAL_CHARS: &str = r#"<>"|?*'"#;

/// Accepted source container extensions, in codec-strategy order: files
/// matching the first entry are stream-copied whole, files matching the
/// second get their audio re-encoded
pub const INPUT_TYPES: &[&str] = &[".mp3", ".m4a"];

/// Extension of the produced container
pub const OUTPUT_TYPE: &str = ".m4b";

/// Accepted cover image extensions
pub const COVER_TYPES: &[&str] = &[".jpg", ".jpeg", ".png"];

/// How tracks and chapters are derived from the source material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Tracks and chapters come from the JSON configuration
    Structured,
    /// All source files become chapters of a single track
    SingleFile,
    /// Every source file becomes its own single-chapter track
    ChapterPerFile,
}

/// One chapter: a title and the ordered source files it is joined from.
#[derive(Debug, Clone, Serialize)]
pub struct Chapter {
    pub title: String,
    pub files: Vec<PathBuf>,
}

/// Per-track generated files, owned by the track and removed by
/// [`Book::remove_temp_files`] whichever way a run ends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TempArtifacts {
    /// Concat demuxer manifest listing the chapter files in order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_list: Option<PathBuf>,
    /// ffmetadata document with tags and chapter offsets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_data: Option<PathBuf>,
    /// Intermediate concatenated file between the two encode stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<PathBuf>,
}

impl TempArtifacts {
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        [
            self.input_list.as_ref(),
            self.chapter_data.as_ref(),
            self.intermediate.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Track {
    /// Final output path, inside the book's output directory
    pub file: PathBuf,
    pub title: String,
    /// 1-based "N/total"
    pub track_no: String,
    /// Total playing time as HH:MM:SS; populated during preparation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub chapters: Vec<Chapter>,
    pub temp_files: TempArtifacts,
}

/// A fully resolved audiobook: validated metadata plus the derived track
/// list. Constructed once from configuration, never persisted.
#[derive(Debug, Serialize)]
pub struct Book {
    pub path: PathBuf,
    pub output_path: PathBuf,
    pub title: String,
    pub author: String,
    pub narrator: String,
    pub genre: String,
    pub year: String,
    pub disc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<PathBuf>,
    /// The single source extension shared by every chapter file
    pub input_format: String,
    pub tracks: Vec<Track>,
}

impl Book {
    /// Validate the configuration and derive the track list for `mode`.
    pub fn from_config(config: &BookConfig, mode: Mode) -> Result<Book> {
        super::validate::build(config, mode)
    }

    /// Remove every temporary artifact of every track. Missing files are
    /// silently ignored, so calling this twice is a no-op the second time.
    pub fn remove_temp_files(&self) {
        debug!("removing temporary files");
        for track in &self.tracks {
            for path in track.temp_files.paths() {
                match std::fs::remove_file(path) {
                    Ok(()) => debug!("temporary file removed: {}", path.display()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => warn!("could not remove {}: {e}", path.display()),
                }
            }
        }
    }
}

/// Lower-cased extension of `path` with a leading dot, or "" when absent.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Format a fractional second count as HH:MM:SS (hours unbounded).
pub fn format_duration(total_seconds: f64) -> String {
    let secs = total_seconds as u64;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
