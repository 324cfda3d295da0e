//! Data models for harvested listings, profiles and resolution histories.
//!
//! - [`ListingEntry`]: one user row from a country listing page
//! - [`ProfileRecord`]: summary statistics scraped from a profile page
//! - [`Category`]: the six subject labels used by the platform
//! - [`ResolutionRow`]: one raw row of a resolution history table
//! - [`AggregateMatrix`]: solved-problem counts per category and point value
//!
//! [`ProfileRecord`] field names are renamed to the CSV column headers so the
//! same struct serializes straight into the snapshot file.

use crate::date::CalendarDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A user discovered on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// The name shown in the listing table.
    pub display_name: String,
    /// Absolute URL of the user's profile page.
    pub profile_url: String,
}

/// Summary statistics of one user, as shown on their profile page.
///
/// Counts are kept as the verbatim trimmed text of the page (e.g. `"12 / 96"`),
/// so the snapshot reflects exactly what the site displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "Name")]
    pub name: String,
    /// The URL the profile was fetched from.
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Score")]
    pub score: String,
    #[serde(rename = "Exercises Completed")]
    pub exercises_completed: String,
    #[serde(rename = "Problems Solved")]
    pub problems_solved: String,
    /// Registration date; `None` when the page does not show one.
    #[serde(rename = "Sign Up Date")]
    pub sign_up_date: Option<CalendarDate>,
}

/// Subject category of a problem.
///
/// Variants are declared in match order: when classifying a description, the
/// first category whose label occurs in it wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Combinatoire")]
    Combinatorics,
    #[serde(rename = "Géométrie")]
    Geometry,
    #[serde(rename = "Théorie des nombres")]
    NumberTheory,
    #[serde(rename = "Algèbre")]
    Algebra,
    #[serde(rename = "Équations fonctionnelles")]
    FunctionalEquations,
    #[serde(rename = "Inégalités")]
    Inequalities,
}

impl Category {
    /// All categories in match order.
    pub const ALL: [Category; 6] = [
        Category::Combinatorics,
        Category::Geometry,
        Category::NumberTheory,
        Category::Algebra,
        Category::FunctionalEquations,
        Category::Inequalities,
    ];

    /// The platform's label for this category, verbatim.
    pub fn label(self) -> &'static str {
        match self {
            Category::Combinatorics => "Combinatoire",
            Category::Geometry => "Géométrie",
            Category::NumberTheory => "Théorie des nombres",
            Category::Algebra => "Algèbre",
            Category::FunctionalEquations => "Équations fonctionnelles",
            Category::Inequalities => "Inégalités",
        }
    }

    /// First category whose label is a substring of `description`.
    pub fn classify(description: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| description.contains(category.label()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a resolution history table, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRow {
    /// Text of the points cell, e.g. `"+5"` or `"-2"`.
    pub points_text: String,
    /// Text of the description cell, e.g. `"Problème #3 - Algèbre"`.
    pub description: String,
}

/// Solved-problem counts keyed by category, then by point value.
///
/// Only non-zero cells are stored. Use [`AggregateMatrix::count`] and
/// [`AggregateMatrix::point_values`] to materialize the full grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateMatrix {
    pub counts: BTreeMap<Category, BTreeMap<u32, u32>>,
    /// Problem rows that matched no category.
    pub unclassified: u32,
}

impl AggregateMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one solved problem worth `points` in `category`.
    pub fn increment(&mut self, category: Category, points: u32) {
        *self
            .counts
            .entry(category)
            .or_default()
            .entry(points)
            .or_insert(0) += 1;
    }

    /// Count for a cell, zero when absent.
    pub fn count(&self, category: Category, points: u32) -> u32 {
        self.counts
            .get(&category)
            .and_then(|by_points| by_points.get(&points))
            .copied()
            .unwrap_or(0)
    }

    /// Sorted union of point values present in any category.
    pub fn point_values(&self) -> Vec<u32> {
        let mut values: Vec<u32> = self
            .counts
            .values()
            .flat_map(|by_points| by_points.keys().copied())
            .collect();
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Categories holding at least one count, in match order.
    pub fn categories_with_data(&self) -> impl Iterator<Item = (Category, &BTreeMap<u32, u32>)> {
        self.counts
            .iter()
            .filter(|(_, by_points)| !by_points.is_empty())
            .map(|(category, by_points)| (*category, by_points))
    }

    /// Total number of classified problems.
    pub fn total(&self) -> u32 {
        self.counts.values().flat_map(|by_points| by_points.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
