use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::BookConfig;
use crate::error::{Error, Result};

use super::model::{extension_of, Book, Chapter, Mode, TempArtifacts, Track, INPUT_TYPES, OUTPUT_TYPE};
use super::validate::sanitize;

/// Populate the track list using the strategy selected for this run.
pub(super) fn derive_tracks(book: &Book, config: &BookConfig, mode: Mode) -> Result<Vec<Track>> {
    match mode {
        Mode::Structured => structured_tracks(book, config),
        Mode::SingleFile => single_file_track(book),
        Mode::ChapterPerFile => chapter_per_file_tracks(book),
    }
}

/// Tracks and chapters exactly as listed in the configuration, with defaults
/// filled in and every file resolved and checked.
fn structured_tracks(book: &Book, config: &BookConfig) -> Result<Vec<Track>> {
    debug!("preparing tracks in structured mode");
    let total = config.tracks.len();
    let mut tracks = Vec::with_capacity(total);

    for (tr, track_config) in config.tracks.iter().enumerate() {
        let default_title = format!("{} {}", book.title, tr + 1);
        let file_name = if track_config.file.is_empty() {
            format!("{default_title}{OUTPUT_TYPE}")
        } else {
            track_config.file.clone()
        };
        if !file_name.ends_with(OUTPUT_TYPE) {
            return Err(Error::value(format!("invalid track format: {file_name}")));
        }

        let mut chapters = Vec::with_capacity(track_config.chapters.len());
        for (ch, chapter_config) in track_config.chapters.iter().enumerate() {
            let mut files = Vec::with_capacity(chapter_config.files.len());
            for file in &chapter_config.files {
                let file_path = std::fs::canonicalize(book.path.join(file))
                    .map_err(|_| Error::file(format!("input file not found: {file}")))?;
                if !file_path.is_file() {
                    return Err(Error::file(format!(
                        "input file not found: {}",
                        file_path.display()
                    )));
                }
                if !INPUT_TYPES.contains(&extension_of(&file_path).as_str()) {
                    return Err(Error::file(format!(
                        "invalid input file format: {}",
                        file_path.display()
                    )));
                }
                files.push(file_path);
            }
            let title = if chapter_config.title.is_empty() {
                format!("Chapter {}", ch + 1)
            } else {
                chapter_config.title.clone()
            };
            chapters.push(Chapter { title, files });
        }

        let title = if track_config.title.is_empty() {
            default_title
        } else {
            track_config.title.clone()
        };
        tracks.push(Track {
            file: book.output_path.join(sanitize(&file_name)?),
            title,
            track_no: format!("{}/{}", tr + 1, total),
            duration: None,
            chapters,
            temp_files: TempArtifacts::default(),
        });
    }

    Ok(tracks)
}

/// All source files combined into one track, one chapter per file.
fn single_file_track(book: &Book) -> Result<Vec<Track>> {
    debug!("preparing tracks in single-file mode, ignoring track data in JSON");
    let chapters = scan_source_files(book)?
        .into_iter()
        .enumerate()
        .map(|(i, file)| Chapter {
            title: format!("Chapter {}", i + 1),
            files: vec![file],
        })
        .collect();

    Ok(vec![Track {
        file: book
            .output_path
            .join(format!("{}{OUTPUT_TYPE}", sanitize(&book.title)?)),
        title: book.title.clone(),
        track_no: "1/1".to_string(),
        duration: None,
        chapters,
        temp_files: TempArtifacts::default(),
    }])
}

/// Every source file becomes its own single-chapter track.
fn chapter_per_file_tracks(book: &Book) -> Result<Vec<Track>> {
    debug!("preparing tracks in chapter-per-file mode, ignoring track data in JSON");
    let files = scan_source_files(book)?;
    let total = files.len();

    files
        .into_iter()
        .enumerate()
        .map(|(i, file)| {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            Ok(Track {
                file: book
                    .output_path
                    .join(format!("{}{OUTPUT_TYPE}", sanitize(&stem)?)),
                title: stem.clone(),
                track_no: format!("{}/{}", i + 1, total),
                duration: None,
                chapters: vec![Chapter {
                    title: stem,
                    files: vec![file],
                }],
                temp_files: TempArtifacts::default(),
            })
        })
        .collect()
}

/// Non-recursive scan of the source directory for accepted input files,
/// lexicographically sorted. This sort fixes the chapter and track order of
/// the final audio, so it must stay deterministic.
fn scan_source_files(book: &Book) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(&book.path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && INPUT_TYPES.contains(&extension_of(p).as_str()))
        .collect();
    files.sort();
    Ok(files)
}
