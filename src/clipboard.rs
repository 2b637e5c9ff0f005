//! System clipboard access by piping into the platform's clipboard utility.
//! - macOS: pbcopy
//! - Linux: xclip, falling back to xsel
//! - Windows: clip
//!
//! Failures stay typed so callers can degrade to a notification instead of
//! tearing down the UI.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors raised while handing text to the clipboard utility.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to spawn {utility}: {source}")]
    Spawn {
        utility: &'static str,
        source: std::io::Error,
    },
    #[error("failed to write to {utility}: {source}")]
    Write {
        utility: &'static str,
        source: std::io::Error,
    },
    #[error("{utility} exited with an error")]
    Exit { utility: &'static str },
    #[error("clipboard is not supported on this platform")]
    Unsupported,
}

/// Copy `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    #[cfg(target_os = "macos")]
    {
        pipe_to("pbcopy", &[], text)
    }

    #[cfg(target_os = "linux")]
    {
        // xclip first, xsel as the fallback.
        match pipe_to("xclip", &["-selection", "clipboard"], text) {
            Err(ClipboardError::Spawn { .. }) => {
                pipe_to("xsel", &["--clipboard", "--input"], text)
            }
            other => other,
        }
    }

    #[cfg(target_os = "windows")]
    {
        pipe_to("clip", &[], text)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = text;
        Err(ClipboardError::Unsupported)
    }
}

/// Spawn `utility`, feed it `text` on stdin and wait for it to finish. The
/// utility's own output is discarded; stray output would scribble over the
/// alternate screen.
#[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
fn pipe_to(utility: &'static str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(utility)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ClipboardError::Spawn { utility, source })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|source| ClipboardError::Write { utility, source })?;
    }

    let status = child
        .wait()
        .map_err(|source| ClipboardError::Write { utility, source })?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::Exit { utility })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn pipe_to_feeds_a_well_behaved_utility() {
        assert!(pipe_to("cat", &[], "hello clipboard").is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn pipe_to_reports_missing_utilities_as_spawn_errors() {
        match pipe_to("definitely-not-a-clipboard-tool", &[], "x") {
            Err(ClipboardError::Spawn { utility, .. }) => {
                assert_eq!(utility, "definitely-not-a-clipboard-tool");
            }
            other => panic!("expected a spawn error, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn pipe_to_reports_failing_utilities_as_exit_errors() {
        // The command drains stdin before failing so the write cannot race
        // the exit.
        match pipe_to("sh", &["-c", "cat >/dev/null; exit 1"], "x") {
            Err(ClipboardError::Exit { utility }) => assert_eq!(utility, "sh"),
            other => panic!("expected an exit error, got {other:?}"),
        }
    }
}
