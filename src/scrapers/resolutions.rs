//! Resolution history of a single profile.
//!
//! The "Résolutions" table lists every scoring event of a user. Only solved
//! problems (positive award, `Problème #` in the description) are tallied,
//! per subject [`Category`] and point value.

use crate::error::ScrapeError;
use crate::locator::element_text;
use crate::models::{AggregateMatrix, Category, ResolutionRow};
use crate::net::PageFetcher;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

/// Marker distinguishing problems from exercises in a description.
pub const PROBLEM_MARKER: &str = "Problème #";

static RESOLUTIONS_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.table.middle_aligned.my-0").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static POINTS_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.text-center.fw-bold.user_color").unwrap());

/// Collect the (points, description) pairs of the resolutions table.
///
/// Rows lacking either cell (headers, separators) are skipped.
///
/// # Errors
///
/// [`ScrapeError::StructuralAbsence`] if the page has no resolutions table.
pub fn parse_resolution_rows(html: &str) -> Result<Vec<ResolutionRow>, ScrapeError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&RESOLUTIONS_TABLE)
        .next()
        .ok_or_else(|| ScrapeError::absent("resolutions table"))?;

    let rows = table
        .select(&ROW)
        .filter_map(|row| {
            let points = row.select(&POINTS_CELL).next()?;
            let description = row
                .select(&CELL)
                .find(|cell| *cell != points && is_unstyled(cell))?;
            Some(ResolutionRow {
                points_text: element_text(&points),
                description: element_text(&description),
            })
        })
        .collect();
    Ok(rows)
}

/// The description cell carries no inline style, unlike the date and points cells.
fn is_unstyled(cell: &ElementRef<'_>) -> bool {
    cell.value().attr("style").is_none_or(|style| style.trim().is_empty())
}

/// Tally solved problems by category and point value.
pub fn aggregate<'a, I>(rows: I) -> AggregateMatrix
where
    I: IntoIterator<Item = &'a ResolutionRow>,
{
    let mut matrix = AggregateMatrix::new();
    for row in rows {
        if !row.points_text.starts_with('+') || !row.description.contains(PROBLEM_MARKER) {
            continue;
        }

        let Ok(points) = row.points_text.trim_matches('+').trim().parse::<u32>() else {
            debug!(points = %row.points_text, "Unreadable point value; row skipped");
            continue;
        };

        match Category::classify(&row.description) {
            Some(category) => matrix.increment(category, points),
            None => {
                matrix.unclassified += 1;
                debug!(description = %row.description, "Problem matches no category");
            }
        }
    }
    matrix
}

/// Parse and tally a resolution history page.
///
/// A page without the resolutions table yields an empty matrix.
pub fn aggregate_resolutions(html: &str) -> AggregateMatrix {
    match parse_resolution_rows(html) {
        Ok(rows) => {
            let matrix = aggregate(&rows);
            info!(
                rows = rows.len(),
                solved = matrix.total(),
                unclassified = matrix.unclassified,
                "Aggregated resolutions"
            );
            if matrix.unclassified > 0 {
                warn!(count = matrix.unclassified, "Some solved problems matched no category");
            }
            matrix
        }
        Err(e) => {
            warn!(error = %e, "Couldn't find resolutions table");
            debug!(preview = %truncate_for_log(html, 300), "Page without resolutions table");
            AggregateMatrix::new()
        }
    }
}

/// Fetch a profile and tally its resolution history.
///
/// # Arguments
///
/// * `fetcher` - Source of page bodies
/// * `url` - Absolute profile URL
///
/// # Returns
///
/// The tallied matrix, or the fetch error (transport failure or non-200 status).
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_resolutions<F: PageFetcher>(
    fetcher: &F,
    url: &str,
) -> Result<AggregateMatrix, ScrapeError> {
    let html = fetcher.fetch(url).await?;
    Ok(aggregate_resolutions(&html))
}

/// Like [`fetch_resolutions`], but a failed fetch is logged and yields an
/// empty matrix so the sinks still run.
pub async fn tally_profile<F: PageFetcher>(fetcher: &F, url: &str) -> AggregateMatrix {
    match fetch_resolutions(fetcher, url).await {
        Ok(matrix) => matrix,
        Err(e) => {
            warn!(%url, error = %e, "Profile fetch failed");
            AggregateMatrix::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::StaticFetcher;

    fn history_page(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(points, description)| {
                format!(
                    r#"<tr>
                         <td style="width:120px;">12/03/24 14h02</td>
                         <td class="text-center fw-bold user_color" style="width:50px;">{points}</td>
                         <td style="">{description}</td>
                       </tr>"#
                )
            })
            .collect();
        format!(
            r#"<html><body>
                 <h3>Résolutions</h3>
                 <table class="table middle_aligned my-0">
                   <tr><th>Date</th><th>Points</th><th>Description</th></tr>
                   {body}
                 </table>
               </body></html>"#
        )
    }

    fn row(points: &str, description: &str) -> ResolutionRow {
        ResolutionRow {
            points_text: points.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_only_positive_problem_rows_count() {
        let html = history_page(&[
            ("+5", "Problème #3 - Algèbre"),
            ("-2", "Problème #4 - Algèbre"),
            ("+3", "Exercice #1 - Algèbre"),
            ("+5", "Problème #7 - Algèbre"),
        ]);
        let matrix = aggregate_resolutions(&html);

        let mut expected = AggregateMatrix::new();
        expected.increment(Category::Algebra, 5);
        expected.increment(Category::Algebra, 5);
        assert_eq!(matrix, expected);
        assert_eq!(matrix.count(Category::Algebra, 5), 2);
        assert_eq!(matrix.counts.len(), 1);
    }

    #[test]
    fn test_rows_are_read_from_the_styled_cells() {
        let rows = parse_resolution_rows(&history_page(&[("+10", "Problème #2 - Géométrie")]))
            .unwrap();
        assert_eq!(rows, vec![row("+10", "Problème #2 - Géométrie")]);
    }

    #[test]
    fn test_description_cell_without_style_attribute() {
        let html = r#"<table class="table middle_aligned my-0">
            <tr><td class="text-center fw-bold user_color" style="width:50px">+15</td><td>Problème #9 - Inégalités</td></tr>
        </table>"#;
        let rows = parse_resolution_rows(html).unwrap();
        assert_eq!(rows, vec![row("+15", "Problème #9 - Inégalités")]);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let html = history_page(&[
            ("+5", "Problème #3 - Combinatoire"),
            ("+10", "Problème #8 - Théorie des nombres"),
            ("+15", "Problème #11 - Équations fonctionnelles"),
            ("+10", "Problème #12 - Théorie des nombres"),
        ]);
        assert_eq!(aggregate_resolutions(&html), aggregate_resolutions(&html));
    }

    #[test]
    fn test_unclassified_problems_are_counted() {
        let matrix = aggregate(&[
            row("+5", "Problème #3 - Probabilités"),
            row("+5", "Problème #4 - Géométrie"),
        ]);
        assert_eq!(matrix.unclassified, 1);
        assert_eq!(matrix.total(), 1);
    }

    #[test]
    fn test_unreadable_points_are_skipped() {
        let matrix = aggregate(&[row("+?", "Problème #3 - Algèbre")]);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_missing_table_gives_empty_matrix() {
        let html = "<html><body><p>Aucune résolution</p></body></html>";
        assert!(matches!(
            parse_resolution_rows(html),
            Err(ScrapeError::StructuralAbsence { field: "resolutions table" })
        ));
        assert!(aggregate_resolutions(html).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_resolutions() {
        let url = "https://www.mathraining.be/users/101";
        let fetcher = StaticFetcher::default()
            .with_page(url, &history_page(&[("+20", "Problème #1 - Inégalités")]));

        let matrix = fetch_resolutions(&fetcher, url).await.unwrap();
        assert_eq!(matrix.count(Category::Inequalities, 20), 1);

        let missing = fetch_resolutions(&fetcher, "https://www.mathraining.be/users/0").await;
        assert!(matches!(missing, Err(ScrapeError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_tally_profile_recovers_from_failed_fetch() {
        let fetcher = StaticFetcher::default();
        let matrix = tally_profile(&fetcher, "https://www.mathraining.be/users/0").await;
        assert!(matrix.is_empty());
        assert_eq!(matrix.unclassified, 0);
    }
}
