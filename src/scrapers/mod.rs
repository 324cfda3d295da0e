//! Scrapers for the Mathraining site.
//!
//! Each page type has a pure `parse_*` function over raw markup plus an async
//! driver that fetches through a [`PageFetcher`](crate::net::PageFetcher):
//!
//! | Page | Module | Parser | Driver |
//! |------|--------|--------|--------|
//! | Country listing | [`listing`] | `parse_listing` | `index_profiles` |
//! | Profile | [`profile`] | `parse_profile` | `fetch_profiles` |
//! | Resolution history | [`resolutions`] | `parse_resolution_rows` + `aggregate` | `fetch_resolutions` |
//!
//! Drivers fetch one page at a time, in order. A failed page is logged and
//! skipped without failing the run.

pub mod listing;
pub mod profile;
pub mod resolutions;
