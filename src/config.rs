use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Raw JSON configuration for one audiobook. Parsed once and never mutated;
/// derivation produces a separate `Book` structure.
#[derive(Debug, Clone, Deserialize)]
pub struct BookConfig {
    /// Source directory containing the audio files
    pub path: String,

    /// Cover image path relative to `path`; empty means no cover
    #[serde(default)]
    pub cover: String,

    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub narrator: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub disc: String,
    #[serde(default)]
    pub total_discs: String,

    /// Explicit track structure; only consulted in structured mode
    #[serde(default)]
    pub tracks: Vec<TrackConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    /// Output filename; defaults to "<book title> <n>.m4b"
    #[serde(default)]
    pub file: String,

    /// Track title; defaults to "<book title> <n>"
    #[serde(default)]
    pub title: String,

    pub chapters: Vec<ChapterConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterConfig {
    /// Chapter title; defaults to "Chapter <n>"
    #[serde(default)]
    pub title: String,

    /// Source files relative to the book path, in playback order
    pub files: Vec<String>,
}

/// Load and parse the JSON configuration file.
pub fn load(path: &Path) -> Result<BookConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| Error::file(format!("JSON file not found: {}", path.display())))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::value(format!("invalid JSON file {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("m4bpack.json");
        std::fs::write(
            &path,
            r#"{
                "path": "/books/foo",
                "cover": "cover.jpg",
                "title": "Foo",
                "author": "A. Writer",
                "narrator": "A. Reader",
                "genre": "Audiobook",
                "year": "2001",
                "disc": "1",
                "total_discs": "2",
                "tracks": [
                    {
                        "file": "part1.m4b",
                        "title": "Part 1",
                        "chapters": [
                            {"title": "One", "files": ["01.mp3", "02.mp3"]}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.path, "/books/foo");
        assert_eq!(config.cover, "cover.jpg");
        assert_eq!(config.disc, "1");
        assert_eq!(config.total_discs, "2");
        assert_eq!(config.tracks.len(), 1);
        assert_eq!(config.tracks[0].chapters[0].files.len(), 2);
    }

    #[test]
    fn test_load_minimal_config_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("m4bpack.json");
        std::fs::write(&path, r#"{"path": "/books/foo"}"#).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.title, "");
        assert_eq!(config.cover, "");
        assert!(config.tracks.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_file_error() {
        let temp = TempDir::new().unwrap();
        let err = load(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::File(_)));
        assert!(err.to_string().contains("JSON file not found"));
    }

    #[test]
    fn test_load_invalid_json_is_value_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("m4bpack.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        assert!(err.to_string().contains("invalid JSON file"));
    }
}
