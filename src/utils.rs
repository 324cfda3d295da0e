//! Small helpers for logging and the file system.

use crate::error::ScrapeError;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Scratch file written to test that an output directory accepts files.
const WRITE_CHECK_FILE: &str = ".mathraining_harvest_write_check";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, on a character boundary, with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(idx, _)| idx)
        .take_while(|idx| *idx <= max)
        .last()
        .unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
///
/// # Arguments
///
/// * `path` - Directory that will receive output files
///
/// # Returns
///
/// `Ok(())` when a file could be created there, or [`ScrapeError::Io`] if the
/// directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), ScrapeError> {
    fs::create_dir_all(path).await?;
    let check_path = Path::new(path).join(WRITE_CHECK_FILE);
    fs::write(&check_path, b"").await?;
    if let Err(e) = fs::remove_file(&check_path).await {
        warn!(path = %check_path.display(), error = %e, "Could not remove write-check file");
    }
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // 'è' is two bytes; byte 6 falls inside it.
        let result = truncate_for_log("Problème #3", 6);
        assert_eq!(result, "Probl…(+7 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = std::env::temp_dir().join(format!("mathraining_out_{}", std::process::id()));
        let path = dir.to_str().unwrap().to_string();

        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        assert!(!dir.join(WRITE_CHECK_FILE).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_rejects_file_path() {
        let file = std::env::temp_dir().join(format!("mathraining_file_{}", std::process::id()));
        std::fs::write(&file, "not a directory").unwrap();

        let err = ensure_writable_dir(file.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));

        std::fs::remove_file(&file).unwrap();
    }
}
