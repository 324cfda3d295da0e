//! CSV snapshot of scraped profiles.
//!
//! One file per run, named `<dataset>_snapshot_<MM_DD_YYYY>.csv`, with the
//! columns `Name, Link, Score, Exercises Completed, Problems Solved, Sign Up Date`.
//! An absent sign-up date is written as an empty cell.

use crate::error::ScrapeError;
use crate::models::ProfileRecord;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Snapshot file name for `dataset` taken on `date`.
pub fn snapshot_filename(dataset: &str, date: NaiveDate) -> String {
    format!("{}_snapshot_{}.csv", dataset, date.format("%m_%d_%Y"))
}

/// Write records with a header row to any writer.
pub fn write_records<W: Write>(writer: W, records: &[ProfileRecord]) -> Result<(), ScrapeError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the snapshot for `date` into `dir`.
///
/// # Arguments
///
/// * `dir` - Existing output directory
/// * `dataset` - Dataset name used as the file name prefix
/// * `date` - Snapshot date, formatted `MM_DD_YYYY` in the file name
/// * `records` - Rows to write after the header
///
/// # Returns
///
/// The path of the written file, or an I/O or CSV error.
#[instrument(level = "info", skip(records), fields(count = records.len()))]
pub fn write_snapshot(
    dir: &Path,
    dataset: &str,
    date: NaiveDate,
    records: &[ProfileRecord],
) -> Result<PathBuf, ScrapeError> {
    let path = dir.join(snapshot_filename(dataset, date));
    let file = File::create(&path)?;
    write_records(file, records)?;
    info!(path = %path.display(), "Wrote CSV snapshot");
    Ok(path)
}
