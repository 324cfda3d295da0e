//! Output sinks for harvested data.
//!
//! # Submodules
//!
//! - [`csv`]: dated CSV snapshot of [`ProfileRecord`](crate::models::ProfileRecord)s
//! - [`chart`]: text bar panels of an [`AggregateMatrix`](crate::models::AggregateMatrix)
//! - [`json`]: the same matrix as JSON for external plotting
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── ivory_coast_mathtraining_snapshot_03_15_2024.csv
//! ```

pub mod chart;
pub mod csv;
pub mod json;
