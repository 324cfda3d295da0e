//! Profile detail pages.
//!
//! A profile page shows the user's name, score and progress counters, and,
//! in the "evolution" widget, the date the account was created. The name and
//! counters are required; the sign-up date is best effort.

use crate::date::{CalendarDate, parse_french_date};
use crate::error::ScrapeError;
use crate::locator::{FieldLocator, element_text};
use crate::models::{ListingEntry, ProfileRecord};
use crate::net::PageFetcher;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};

const NAME: FieldLocator = FieldLocator::first("name", "span.fw-bold");
const SCORE: FieldLocator = FieldLocator::after_label("score", "Score", "td.myvalue");
const EXERCISES: FieldLocator =
    FieldLocator::after_label("exercises", "Exercices", "div.progress_nb");
const PROBLEMS: FieldLocator =
    FieldLocator::after_label("problems", "Problèmes", "div.progress_nb");

static EVOLUTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.g-col-12.basic_container.p-1").unwrap());
static DATE_SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span.user_color").unwrap());

/// Extract a [`ProfileRecord`] from profile markup fetched from `link`.
///
/// # Errors
///
/// [`ScrapeError::StructuralAbsence`] if the name, score, exercise or problem
/// counter cannot be located. A missing or unparseable sign-up date is not an
/// error.
pub fn parse_profile(html: &str, link: &str) -> Result<ProfileRecord, ScrapeError> {
    let document = Html::parse_document(html);

    Ok(ProfileRecord {
        name: NAME.extract(&document)?,
        link: link.to_string(),
        score: SCORE.extract(&document)?,
        exercises_completed: EXERCISES.extract(&document)?,
        problems_solved: PROBLEMS.extract(&document)?,
        sign_up_date: sign_up_date(&document),
    })
}

fn sign_up_date(document: &Html) -> Option<CalendarDate> {
    let Some(evolution) = document.select(&EVOLUTION).next() else {
        debug!("No evolution container; sign-up date omitted");
        return None;
    };
    let Some(span) = evolution.select(&DATE_SPAN).next() else {
        debug!("No date in evolution container; sign-up date omitted");
        return None;
    };

    let text = element_text(&span);
    match parse_french_date(&text) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(%text, error = %e, "Unparseable sign-up date; omitted");
            None
        }
    }
}

/// Fetch and parse one profile.
#[instrument(level = "debug", skip_all, fields(url = %entry.profile_url))]
pub async fn fetch_profile<F: PageFetcher>(
    fetcher: &F,
    entry: &ListingEntry,
) -> Result<ProfileRecord, ScrapeError> {
    let html = fetcher.fetch(&entry.profile_url).await?;
    parse_profile(&html, &entry.profile_url)
}

/// Fetch every profile in order.
///
/// # Arguments
///
/// * `fetcher` - Source of page bodies
/// * `entries` - Profiles collected from the listing pages
///
/// # Returns
///
/// One record per profile that could be fetched and parsed, in listing
/// order. Profiles that fail to fetch or lack a required field are logged
/// and skipped.
#[instrument(level = "info", skip_all, fields(profiles = entries.len()))]
pub async fn fetch_profiles<F: PageFetcher>(
    fetcher: &F,
    entries: &[ListingEntry],
) -> Vec<ProfileRecord> {
    let records: Vec<ProfileRecord> = stream::iter(entries)
        .then(move |entry| async move {
            match fetch_profile(fetcher, entry).await {
                Ok(record) => {
                    debug!(name = %record.name, "Scraped profile");
                    Some(record)
                }
                Err(ScrapeError::StructuralAbsence { field }) => {
                    warn!(url = %entry.profile_url, field, "Profile page is missing a required field");
                    None
                }
                Err(e) => {
                    error!(url = %entry.profile_url, display_name = %entry.display_name, error = %e, "Profile fetch failed");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(
        count = records.len(),
        skipped = entries.len() - records.len(),
        "Scraped profile details"
    );
    records
}
