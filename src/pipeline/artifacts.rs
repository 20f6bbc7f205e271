use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

use crate::book::{format_duration, Book, Track};
use crate::error::{Error, Result};

use super::{fftool, probe};

/// Write the per-track temporary artifacts: the concat manifest and the
/// chapter-metadata document, probing every source file's duration along the
/// way. Populates each track's temp-file paths and display duration. Runs for
/// both introspection and conversion. Any failure removes all temp artifacts
/// already written before propagating.
pub fn prepare(book: &mut Book) -> Result<()> {
    let result = prepare_inner(book);
    if result.is_err() {
        book.remove_temp_files();
    }
    result
}

fn prepare_inner(book: &mut Book) -> Result<()> {
    fftool::check_available()?;

    debug!("preparing temporary files");
    std::fs::create_dir_all(&book.output_path).map_err(|e| {
        Error::file(format!(
            "could not create output directory {}: {e}",
            book.output_path.display()
        ))
    })?;

    write_concat_manifests(book)?;
    write_chapter_metadata(book)?;

    debug!(
        "{} text files created in {}",
        book.tracks.len() * 2,
        book.output_path.display()
    );
    Ok(())
}

fn write_concat_manifests(book: &mut Book) -> Result<()> {
    let output_path = book.output_path.clone();
    for (tr, track) in book.tracks.iter_mut().enumerate() {
        let manifest_path = output_path.join(format!("track_{}_files.txt", tr + 1));
        let mut manifest = String::new();
        for chapter in &track.chapters {
            for file in &chapter.files {
                manifest.push_str(&concat_line(file));
            }
        }
        std::fs::write(&manifest_path, manifest)
            .map_err(|e| Error::file(format!("could not write {}: {e}", manifest_path.display())))?;
        track.temp_files.input_list = Some(manifest_path);
    }
    Ok(())
}

/// One concat-demuxer directive. Literal single quotes in the path are closed
/// out, escaped, and reopened, which is the quoting the demuxer expects.
fn concat_line(file: &Path) -> String {
    let escaped = file.to_string_lossy().replace('\'', r"'\''");
    format!("file '{escaped}'\n")
}

fn write_chapter_metadata(book: &mut Book) -> Result<()> {
    debug!("preparing chapter data files");
    let Book {
        output_path,
        title,
        author,
        narrator,
        genre,
        year,
        disc,
        tracks,
        ..
    } = book;

    for (tr, track) in tracks.iter_mut().enumerate() {
        let durations = chapter_durations(track)?;
        let document = render_chapter_metadata(
            track, title, author, narrator, genre, year, disc, &durations,
        );

        let chapter_data_path = output_path.join(format!("track_{}_chapters.txt", tr + 1));
        std::fs::write(&chapter_data_path, document).map_err(|e| {
            Error::file(format!("could not write {}: {e}", chapter_data_path.display()))
        })?;

        track.temp_files.chapter_data = Some(chapter_data_path);
        track.duration = Some(format_duration(durations.iter().sum()));
    }
    Ok(())
}

/// Probed duration of each chapter, in track order.
fn chapter_durations(track: &Track) -> Result<Vec<f64>> {
    track
        .chapters
        .iter()
        .map(|chapter| {
            chapter
                .files
                .iter()
                .try_fold(0.0, |sum, file| Ok(sum + probe::duration(file)?))
        })
        .collect()
}

/// Render the ffmetadata document for one track: version header, book-level
/// tags, then one block per chapter. Offsets accumulate in floating point and
/// are truncated only at emission; END is the truncated start plus the
/// truncated chapter duration. Long books drift differently under any other
/// truncation order, so this must not change.
#[allow(clippy::too_many_arguments)]
fn render_chapter_metadata(
    track: &Track,
    title: &str,
    author: &str,
    narrator: &str,
    genre: &str,
    year: &str,
    disc: &str,
    durations: &[f64],
) -> String {
    let mut doc = String::from(";FFMETADATA1\n");
    let _ = writeln!(doc, "title={}", track.title);
    let _ = writeln!(doc, "artist={author}");
    let _ = writeln!(doc, "album_artist={author}");
    let _ = writeln!(doc, "composer={narrator}");
    let _ = writeln!(doc, "album={title}");
    let _ = writeln!(doc, "genre={genre}");
    let _ = writeln!(doc, "track={}", track.track_no);
    let _ = writeln!(doc, "disc={disc}");
    let _ = writeln!(doc, "date={year}");

    let mut start_time = 0.0f64;
    for (chapter, duration) in track.chapters.iter().zip(durations) {
        let start = start_time.trunc() as i64;
        let _ = writeln!(doc, "[CHAPTER]");
        let _ = writeln!(doc, "TIMEBASE=1/1");
        let _ = writeln!(doc, "START={start}");
        let _ = writeln!(doc, "END={}", start + duration.trunc() as i64);
        let _ = writeln!(doc, "title={}", chapter.title);
        start_time += duration;
    }

    doc
}
