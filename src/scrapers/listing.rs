//! Country listing pages.
//!
//! The user listing at `/users` is paginated and filterable by country. Each
//! page holds a `users_table` whose second column links to the user's profile.
//!
//! # URL Pattern
//!
//! `https://www.mathraining.be/users?country=48&page=2&title=0`

use crate::locator::element_text;
use crate::models::ListingEntry;
use crate::net::PageFetcher;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static USERS_TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table#users_table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Listing page URLs for pages `1..=page_count` of `country_id`, in page order.
pub fn listing_urls(origin: &str, country_id: u32, page_count: u32) -> Vec<String> {
    let origin = origin.trim_end_matches('/');
    (1..=page_count)
        .map(|page| format!("{origin}/users?country={country_id}&page={page}&title=0"))
        .collect()
}

/// Extract the users of one listing page.
///
/// A page without the users table yields no entries. Rows with fewer than two
/// cells are placeholders and are skipped.
pub fn parse_listing(html: &str, origin: &Url) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&USERS_TABLE).next() else {
        debug!("No users table on listing page");
        return Vec::new();
    };

    let mut entries = Vec::new();
    for row in table.select(&ROW).skip(1) {
        let cells: Vec<_> = row.select(&CELL).collect();
        if cells.len() <= 1 {
            continue;
        }

        let name_cell = cells[1];
        let Some(href) = name_cell
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            debug!(name = %element_text(&name_cell), "Listing row has no profile link");
            continue;
        };

        match origin.join(href) {
            Ok(resolved) => entries.push(ListingEntry {
                display_name: element_text(&name_cell),
                profile_url: resolved.to_string(),
            }),
            Err(e) => debug!(%href, error = %e, "Unresolvable profile link"),
        }
    }
    entries
}

/// Fetch every listing page in order and collect the profile entries.
///
/// A page that fails to fetch is logged and contributes nothing.
///
/// # Arguments
///
/// * `fetcher` - Source of page bodies
/// * `origin` - Site origin that relative profile links are resolved against
/// * `urls` - Listing page URLs, as built by [`listing_urls`]
///
/// # Returns
///
/// Entries from all pages in page order, duplicates included.
#[instrument(level = "info", skip_all, fields(pages = urls.len()))]
pub async fn index_profiles<F: PageFetcher>(
    fetcher: &F,
    origin: &Url,
    urls: &[String],
) -> Vec<ListingEntry> {
    let pages: Vec<Vec<ListingEntry>> = stream::iter(urls)
        .then(move |url| async move {
            match fetcher.fetch(url).await {
                Ok(html) => {
                    let entries = parse_listing(&html, origin);
                    debug!(%url, count = entries.len(), "Parsed listing page");
                    entries
                }
                Err(e) => {
                    warn!(%url, error = %e, "Listing page fetch failed");
                    Vec::new()
                }
            }
        })
        .collect()
        .await;

    let entries: Vec<ListingEntry> = pages.into_iter().flatten().collect();
    info!(count = entries.len(), "Indexed profile links");
    entries
}

/// Drop repeated profile URLs, keeping the first occurrence.
///
/// Listing pages can shift while being crawled, so the same user may appear
/// on two pages. The harvest keeps repeats unless asked otherwise.
pub fn dedupe_entries(entries: Vec<ListingEntry>) -> Vec<ListingEntry> {
    let before = entries.len();
    let unique: Vec<ListingEntry> = entries
        .into_iter()
        .unique_by(|entry| entry.profile_url.clone())
        .collect();
    debug!(before, after = unique.len(), "Deduplicated profile links");
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::StaticFetcher;

    const ORIGIN: &str = "https://www.mathraining.be";

    fn origin() -> Url {
        Url::parse(ORIGIN).unwrap()
    }

    fn listing_page(rows: &str) -> String {
        format!(
            r#"<html><body>
              <table id="users_table">
                <tr><th>#</th><th>Nom</th><th>Score</th></tr>
                {rows}
              </table>
            </body></html>"#
        )
    }

    #[test]
    fn test_listing_urls_for_country() {
        let urls = listing_urls(ORIGIN, 48, 3);
        assert_eq!(
            urls,
            vec![
                "https://www.mathraining.be/users?country=48&page=1&title=0",
                "https://www.mathraining.be/users?country=48&page=2&title=0",
                "https://www.mathraining.be/users?country=48&page=3&title=0",
            ]
        );
        assert!(urls.iter().all(|u| u.contains("country=48")));
    }

    #[test]
    fn test_listing_urls_zero_pages() {
        assert!(listing_urls(ORIGIN, 48, 0).is_empty());
    }

    #[test]
    fn test_parse_two_rows_in_order() {
        let html = listing_page(
            r#"<tr><td>1</td><td> <a href="/users/101">Awa Koné</a> </td><td>1500</td></tr>
               <tr><td>2</td><td><a href="/users/202">Yao Kouassi</a></td><td>900</td></tr>"#,
        );
        let entries = parse_listing(&html, &origin());
        assert_eq!(
            entries,
            vec![
                ListingEntry {
                    display_name: "Awa Koné".to_string(),
                    profile_url: "https://www.mathraining.be/users/101".to_string(),
                },
                ListingEntry {
                    display_name: "Yao Kouassi".to_string(),
                    profile_url: "https://www.mathraining.be/users/202".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_header_only_table_is_empty() {
        assert!(parse_listing(&listing_page(""), &origin()).is_empty());
    }

    #[test]
    fn test_page_without_table_is_empty() {
        let html = "<html><body><p>Aucun utilisateur</p></body></html>";
        assert!(parse_listing(html, &origin()).is_empty());
    }

    #[test]
    fn test_short_and_linkless_rows_are_skipped() {
        let html = listing_page(
            r#"<tr><td colspan="3">...</td></tr>
               <tr><td>2</td><td>Anonyme</td></tr>
               <tr><td>3</td><td><a href="https://www.mathraining.be/users/7">Ama</a></td></tr>"#,
        );
        let entries = parse_listing(&html, &origin());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].profile_url, "https://www.mathraining.be/users/7");
    }

    #[tokio::test]
    async fn test_index_skips_failed_pages_and_keeps_duplicates() {
        let urls = listing_urls(ORIGIN, 48, 3);
        let page = listing_page(r#"<tr><td>1</td><td><a href="/users/101">Awa</a></td></tr>"#);
        let fetcher = StaticFetcher::default()
            .with_page(&urls[0], &page)
            .with_page(&urls[2], &page);

        let entries = index_profiles(&fetcher, &origin(), &urls).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entries[1]);
        assert_eq!(dedupe_entries(entries).len(), 1);
    }
}
