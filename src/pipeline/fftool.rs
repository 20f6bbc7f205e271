use std::ffi::OsString;
use std::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Verify that the external tools are invokable before anything is probed or
/// encoded.
pub fn check_available() -> Result<()> {
    for tool in ["ffmpeg", "ffprobe"] {
        let found = Command::new(tool)
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .is_ok();
        if !found {
            return Err(Error::file("ffmpeg/ffprobe not found"));
        }
    }
    Ok(())
}

/// Run an external tool to completion, capturing both streams. Blocking; no
/// timeout and no cancellation. A non-zero exit raises a file error naming
/// the tool and carrying the captured error stream.
pub fn run(tool: &str, args: &[OsString]) -> Result<String> {
    info!("running {tool} command: {}", printable(tool, args));

    let output = Command::new(tool)
        .args(args)
        .output()
        .map_err(|e| Error::file(format!("failed to run {tool}: {e}")))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        debug!("{tool} stdout: {}", stdout.trim());
    }
    if !stderr.trim().is_empty() {
        debug!("{tool} stderr: {}", stderr.trim());
    }

    if !output.status.success() {
        return Err(Error::file(format!(
            "{tool} command failed (exit status {}): {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    Ok(stdout.trim().to_string())
}

fn printable(tool: &str, args: &[OsString]) -> String {
    std::iter::once(tool.to_string())
        .chain(args.iter().map(|a| a.to_string_lossy().to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_command_error_names_the_tool() {
        // `false` exits non-zero on any unix; the error must carry the tool
        // name so the caller can report which stage broke.
        let err = run("false", &[]).unwrap_err();
        assert!(matches!(err, Error::File(_)));
        assert!(err.to_string().contains("false command failed"));
    }

    #[test]
    fn test_missing_tool_is_file_error() {
        let err = run("definitely-not-a-real-tool", &[]).unwrap_err();
        assert!(matches!(err, Error::File(_)));
    }

    #[test]
    fn test_stdout_is_captured_and_trimmed() {
        let out = run("echo", &[OsString::from("12.5")]).unwrap();
        assert_eq!(out, "12.5");
    }
}
