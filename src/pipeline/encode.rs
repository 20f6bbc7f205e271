use clap::ValueEnum;
use std::ffi::OsString;
use tracing::{debug, info};

use crate::book::{Book, INPUT_TYPES};
use crate::error::{Error, Result};

use super::fftool;

/// Final audio bitrate; the only two values the tool accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Bitrate {
    #[value(name = "64k")]
    Kbps64,
    #[value(name = "128k")]
    Kbps128,
}

impl Bitrate {
    pub fn as_arg(self) -> &'static str {
        match self {
            Bitrate::Kbps64 => "64k",
            Bitrate::Kbps128 => "128k",
        }
    }
}

const COMMON_ARGS: &[&str] = &["-loglevel", "info", "-hide_banner", "-y", "-stats"];

/// Convert every track, in order, through the two-stage pipeline. Whatever
/// the outcome, every temporary artifact of every track is removed before
/// returning; a failure leaves no partial debris behind.
pub fn convert(book: &mut Book, bitrate: Bitrate) -> Result<()> {
    debug!("started converting files");
    let result = convert_tracks(book, bitrate);
    book.remove_temp_files();
    if result.is_ok() {
        info!("all done, audiobook written to: {}", book.output_path.display());
    }
    result
}

fn convert_tracks(book: &mut Book, bitrate: Bitrate) -> Result<()> {
    let Book {
        cover,
        input_format,
        tracks,
        ..
    } = book;

    for track in tracks.iter_mut() {
        info!("processing {}: {}", track.track_no, track.title);

        let stem = track
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| Error::value(format!("bad track filename: {}", track.file.display())))?;
        let intermediate = track.file.with_file_name(format!("{stem}_t.mp3"));
        track.temp_files.intermediate = Some(intermediate.clone());

        let manifest = track
            .temp_files
            .input_list
            .as_ref()
            .ok_or_else(|| Error::value(format!("track not prepared: {}", track.title)))?;
        let chapter_data = track
            .temp_files
            .chapter_data
            .as_ref()
            .ok_or_else(|| Error::value(format!("track not prepared: {}", track.title)))?;

        // Stage 1: concatenate the source files and mux in the cover image
        let mut stage1: Vec<OsString> = vec![
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            manifest.into(),
        ];
        if let Some(cover) = cover.as_ref() {
            stage1.extend([
                "-i".into(),
                cover.into(),
                "-metadata:s:v".into(),
                "title=Cover".into(),
                "-metadata:s:v".into(),
                "comment=Cover (front)".into(),
                "-map".into(),
                "1".into(),
            ]);
        }
        stage1.extend(["-map".into(), "0:a".into()]);
        // mp3 input can be stream-copied whole; m4a needs its audio
        // re-encoded, so only the (cover) video stream is copied
        if input_format.as_str() == INPUT_TYPES[0] {
            stage1.extend(["-c".into(), "copy".into()]);
        } else {
            stage1.extend(["-c:v".into(), "copy".into()]);
        }
        stage1.extend(COMMON_ARGS.iter().map(OsString::from));
        stage1.push(intermediate.clone().into());

        // Stage 2: remux with chapter metadata and the final audio codec
        let mut stage2: Vec<OsString> = vec![
            "-i".into(),
            intermediate.into(),
            "-i".into(),
            chapter_data.into(),
            "-map_metadata".into(),
            "1".into(),
            "-c".into(),
            "copy".into(),
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            bitrate.as_arg().into(),
        ];
        stage2.extend(COMMON_ARGS.iter().map(OsString::from));
        stage2.push(track.file.clone().into());

        debug!("stage 1: concatenating input files into {stem}_t.mp3");
        fftool::run("ffmpeg", &stage1)?;
        debug!("stage 2: converting to m4b: {}", track.file.display());
        fftool::run("ffmpeg", &stage2)?;

        info!("track {} converted successfully", track.track_no);
    }

    Ok(())
}
