//! Text bar charts of an [`AggregateMatrix`].
//!
//! One panel per category that has data, laid out in category order, each
//! showing a bar per point value. A shared legend lists every point value
//! present in the matrix. Empty categories get no panel.
//!
//! ```text
//! Points: 5 10 15
//!
//! Algèbre
//!    5 | ██████████ 2
//!   10 |  0
//! ```

use crate::error::ScrapeError;
use crate::models::AggregateMatrix;
use std::fmt::Write as _;
use std::io::Write;
use tracing::{info, instrument};

/// Longest bar, in characters.
pub const BAR_WIDTH: u32 = 30;

/// Consumer of a finished [`AggregateMatrix`].
pub trait ChartSink {
    fn render(&mut self, matrix: &AggregateMatrix) -> Result<(), ScrapeError>;
}

/// Renders bar panels as plain text to a writer (stdout or a file).
pub struct TextChart<W> {
    out: W,
    title: Option<String>,
}

impl<W: Write> TextChart<W> {
    pub fn new(out: W) -> Self {
        Self { out, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl<W: Write> ChartSink for TextChart<W> {
    #[instrument(level = "debug", skip_all)]
    fn render(&mut self, matrix: &AggregateMatrix) -> Result<(), ScrapeError> {
        let text = render_panels(matrix, self.title.as_deref());
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        info!(panels = matrix.categories_with_data().count(), "Rendered chart");
        Ok(())
    }
}

/// Build the chart text for `matrix`.
pub fn render_panels(matrix: &AggregateMatrix, title: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(title) = title {
        let _ = writeln!(out, "{title}\n");
    }

    if matrix.is_empty() {
        let _ = writeln!(out, "No solved problems to chart.");
    } else {
        write_panels(&mut out, matrix);
    }

    if matrix.unclassified > 0 {
        let _ = writeln!(out, "\n({} solved problems without a category)", matrix.unclassified);
    }
    out
}

fn write_panels(out: &mut String, matrix: &AggregateMatrix) {
    let legend = matrix.point_values();
    let label_width = legend.iter().map(|p| p.to_string().len()).max().unwrap_or(1);
    let peak = matrix
        .counts
        .values()
        .flat_map(|by_points| by_points.values())
        .copied()
        .max()
        .unwrap_or(1);

    let _ = writeln!(
        out,
        "Points: {}",
        legend.iter().map(u32::to_string).collect::<Vec<_>>().join(" ")
    );

    for (category, _) in matrix.categories_with_data() {
        let _ = writeln!(out, "\n{category}");
        for &points in &legend {
            let count = matrix.count(category, points);
            let bar = "█".repeat(bar_len(count, peak));
            let _ = writeln!(out, "  {points:>label_width$} | {bar} {count}");
        }
    }
}

/// Bar length scaled so the largest count spans [`BAR_WIDTH`].
fn bar_len(count: u32, peak: u32) -> usize {
    if count == 0 || peak == 0 {
        return 0;
    }
    ((count * BAR_WIDTH).div_ceil(peak)) as usize
}
