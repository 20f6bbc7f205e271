use std::ffi::OsString;
use std::path::Path;

use crate::error::{Error, Result};

use super::fftool;

/// Probe one media file for its duration in fractional seconds.
pub fn duration(file: &Path) -> Result<f64> {
    let args: Vec<OsString> = vec![
        "-i".into(),
        file.into(),
        "-loglevel".into(),
        "quiet".into(),
        "-hide_banner".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "csv=p=0".into(),
    ];
    let printed = fftool::run("ffprobe", &args)?;

    printed.trim().parse::<f64>().map_err(|_| {
        Error::file(format!(
            "ffprobe returned no duration for {}: {printed:?}",
            file.display()
        ))
    })
}
