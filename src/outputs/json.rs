//! JSON dump of an [`AggregateMatrix`].
//!
//! Categories are keyed by their platform label and point values by their
//! decimal string, e.g. `{"counts":{"Algèbre":{"5":2}},"unclassified":0}`.

use crate::error::ScrapeError;
use crate::models::AggregateMatrix;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `matrix` as pretty-printed JSON.
///
/// # Arguments
///
/// * `matrix` - Tallied resolutions to serialize
/// * `path` - Destination file; missing parent directories are created
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation or
/// the write fails.
#[instrument(level = "info", skip(matrix), fields(path = %path.display()))]
pub async fn write_matrix_json(matrix: &AggregateMatrix, path: &Path) -> Result<(), ScrapeError> {
    let json = serde_json::to_string_pretty(matrix)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await?;
    info!("Wrote matrix JSON");
    Ok(())
}
