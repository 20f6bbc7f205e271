use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::BookConfig;
use crate::error::{Error, Result};

use super::model::{extension_of, Book, Mode, Track, COVER_TYPES, ILLEGAL_CHARS};

/// Validate the raw configuration and assemble a complete [`Book`], deriving
/// tracks for `mode` and checking the result. No external tool is invoked.
pub(super) fn build(config: &BookConfig, mode: Mode) -> Result<Book> {
    let path = validate_book_path(&config.path)?;
    let cover = validate_cover(&path, &config.cover)?;

    debug!("validating book metadata");
    let title = non_blank(&config.title)
        .unwrap_or_else(|| path.file_name().unwrap_or_default().to_string_lossy().to_string());
    let disc = combine_disc(&config.disc, &config.total_discs);

    let mut book = Book {
        output_path: path.join("output"),
        path,
        title,
        author: config.author.trim().to_string(),
        narrator: config.narrator.trim().to_string(),
        genre: config.genre.trim().to_string(),
        year: config.year.trim().to_string(),
        disc,
        cover,
        input_format: String::new(),
        tracks: Vec::new(),
    };

    book.tracks = super::derive::derive_tracks(&book, config, mode)?;
    book.input_format = validate_tracks(&book.tracks)?;

    Ok(book)
}

fn validate_book_path(raw: &str) -> Result<PathBuf> {
    debug!("validating book path");
    if raw.chars().any(|c| ILLEGAL_CHARS.contains(c)) {
        return Err(Error::value(format!("book path has illegal characters: {raw}")));
    }
    let path = std::fs::canonicalize(raw)
        .map_err(|_| Error::file(format!("book path not found: {raw}")))?;
    if !path.is_dir() {
        return Err(Error::file(format!("book path is not a directory: {raw}")));
    }
    Ok(path)
}

fn validate_cover(book_path: &Path, raw: &str) -> Result<Option<PathBuf>> {
    debug!("validating book cover");
    if raw.is_empty() {
        debug!("no cover image provided");
        return Ok(None);
    }
    let cover = std::fs::canonicalize(book_path.join(raw))
        .map_err(|_| Error::file(format!("book cover not found: {raw}")))?;
    if !cover.is_file() {
        return Err(Error::file(format!("book cover not found: {}", cover.display())));
    }
    let ext = extension_of(&cover);
    if !COVER_TYPES.contains(&ext.as_str()) {
        return Err(Error::file(format!("bad book cover type: {ext}")));
    }
    Ok(Some(cover))
}

fn combine_disc(disc: &str, total_discs: &str) -> String {
    let disc = disc.trim();
    let total = total_discs.trim();
    if !disc.is_empty() && !disc.contains('/') && !total.is_empty() {
        format!("{disc}/{total}")
    } else {
        disc.to_string()
    }
}

/// Check structural non-emptiness and that every chapter file across the
/// whole book shares one extension; that extension becomes the input format.
fn validate_tracks(tracks: &[Track]) -> Result<String> {
    debug!("validating tracks");
    if tracks.is_empty() {
        return Err(Error::file("book has no tracks"));
    }

    let mut input_formats = BTreeSet::new();
    for track in tracks {
        if track.chapters.is_empty() {
            return Err(Error::file(format!("track has no chapters: {}", track.title)));
        }
        for chapter in &track.chapters {
            if chapter.files.is_empty() {
                return Err(Error::file(format!("chapter has no files: {}", chapter.title)));
            }
            for file in &chapter.files {
                input_formats.insert(extension_of(file));
            }
        }
    }

    if input_formats.len() > 1 {
        return Err(Error::file(format!(
            "multiple input file formats found: {}",
            input_formats.into_iter().collect::<Vec<_>>().join(", ")
        )));
    }
    debug!("will create {} track(s)", tracks.len());
    Ok(input_formats.into_iter().next().unwrap_or_default())
}

/// Strip illegal filename characters. Fails when nothing is left, so a
/// generated filename can never silently collapse to an unusable path.
pub fn sanitize(name: &str) -> Result<String> {
    let cleaned: String = name.chars().filter(|c| !ILLEGAL_CHARS.contains(*c)).collect();
    if cleaned.is_empty() {
        return Err(Error::value(format!("string is empty after cleaning: {name}")));
    }
    Ok(cleaned)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn minimal_config(path: &Path) -> BookConfig {
        serde_json::from_str(&format!(r#"{{"path": {:?}}}"#, path.to_str().unwrap())).unwrap()
    }

    #[test]
    fn test_sanitize_strips_illegal_characters() {
        assert_eq!(sanitize(r#"a<b>c"d|e?f*g'h"#).unwrap(), "abcdefgh");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize("My Book? Part *1*").unwrap();
        assert_eq!(sanitize(&once).unwrap(), once);
    }

    #[test]
    fn test_sanitize_empty_result_is_value_error() {
        let err = sanitize("<>?*").unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        assert!(err.to_string().contains("empty after cleaning"));
    }

    #[test]
    fn test_book_path_with_illegal_characters_rejected() {
        let err = validate_book_path("/books/what?").unwrap_err();
        assert!(matches!(err, Error::Value(_)));
    }

    #[test]
    fn test_missing_book_path_is_file_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = validate_book_path(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::File(_)));
    }

    #[test]
    fn test_combine_disc() {
        assert_eq!(combine_disc("1", "2"), "1/2");
        assert_eq!(combine_disc("1/2", "3"), "1/2");
        assert_eq!(combine_disc("1", ""), "1");
        assert_eq!(combine_disc("", "2"), "");
        assert_eq!(combine_disc(" 1 ", " 2 "), "1/2");
    }

    #[test]
    fn test_title_defaults_to_directory_name() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("My Great Book");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("a.mp3"), "x").unwrap();

        let config = minimal_config(&dir);
        let book = Book::from_config(&config, Mode::SingleFile).unwrap();
        assert_eq!(book.title, "My Great Book");
        assert_eq!(book.output_path, book.path.join("output"));
    }

    #[test]
    fn test_missing_cover_is_file_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.mp3"), "x").unwrap();
        let mut config = minimal_config(temp.path());
        config.cover = "cover.jpg".to_string();

        let err = Book::from_config(&config, Mode::SingleFile).unwrap_err();
        assert!(matches!(err, Error::File(_)));
        assert!(err.to_string().contains("cover not found"));
    }

    #[test]
    fn test_bad_cover_extension_is_file_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.mp3"), "x").unwrap();
        std::fs::write(temp.path().join("cover.gif"), "x").unwrap();
        let mut config = minimal_config(temp.path());
        config.cover = "cover.gif".to_string();

        let err = Book::from_config(&config, Mode::SingleFile).unwrap_err();
        assert!(err.to_string().contains("bad book cover type"));
    }

    #[test]
    fn test_valid_cover_is_resolved() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.mp3"), "x").unwrap();
        std::fs::write(temp.path().join("cover.jpg"), "x").unwrap();
        let mut config = minimal_config(temp.path());
        config.cover = "cover.jpg".to_string();

        let book = Book::from_config(&config, Mode::SingleFile).unwrap();
        let cover = book.cover.unwrap();
        assert!(cover.is_absolute());
        assert!(cover.ends_with("cover.jpg"));
    }

    #[test]
    fn test_no_source_files_fails_validation() {
        let temp = TempDir::new().unwrap();
        let config = minimal_config(temp.path());

        // Single mode produces one track with zero chapters
        let err = Book::from_config(&config, Mode::SingleFile).unwrap_err();
        assert!(err.to_string().contains("no chapters"));

        // Chapter mode produces zero tracks
        let err = Book::from_config(&config, Mode::ChapterPerFile).unwrap_err();
        assert!(err.to_string().contains("no tracks"));
    }

    #[test]
    fn test_mixed_input_formats_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.mp3"), "x").unwrap();
        std::fs::write(temp.path().join("b.m4a"), "x").unwrap();

        let config = minimal_config(temp.path());
        let err = Book::from_config(&config, Mode::SingleFile).unwrap_err();
        assert!(matches!(err, Error::File(_)));
        assert!(err.to_string().contains("multiple input file formats"));
    }

    #[test]
    fn test_single_format_becomes_input_format() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.M4A"), "x").unwrap();
        std::fs::write(temp.path().join("b.m4a"), "x").unwrap();

        let config = minimal_config(temp.path());
        let book = Book::from_config(&config, Mode::SingleFile).unwrap();
        assert_eq!(book.input_format, ".m4a");
    }
}
