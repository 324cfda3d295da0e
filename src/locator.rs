//! Declarative field locators over parsed HTML.
//!
//! Each required field of a profile page is described by a [`FieldLocator`]:
//! a field name plus a [`Locate`] rule. Markup changes are absorbed by editing
//! the locator table in the profile scraper, not the traversal code here.

use crate::error::ScrapeError;
use scraper::{ElementRef, Html, Node, Selector};

/// How to find the element holding a field's value.
#[derive(Debug, Clone, Copy)]
pub enum Locate {
    /// The first element matching the selector.
    First(&'static str),
    /// The first element matching `value` that follows, in document order,
    /// a text node whose trimmed content equals `label`.
    AfterLabel {
        label: &'static str,
        value: &'static str,
    },
}

/// A named extraction rule for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldLocator {
    pub field: &'static str,
    pub locate: Locate,
}

impl FieldLocator {
    pub const fn first(field: &'static str, selector: &'static str) -> Self {
        Self {
            field,
            locate: Locate::First(selector),
        }
    }

    pub const fn after_label(field: &'static str, label: &'static str, value: &'static str) -> Self {
        Self {
            field,
            locate: Locate::AfterLabel { label, value },
        }
    }

    /// Trimmed text of the located element.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::StructuralAbsence`] naming this field if the label or the
    /// value element is missing.
    pub fn extract(&self, document: &Html) -> Result<String, ScrapeError> {
        let element = match self.locate {
            Locate::First(selector) => {
                let selector = parse_selector(selector)?;
                document.select(&selector).next()
            }
            Locate::AfterLabel { label, value } => {
                let selector = parse_selector(value)?;
                find_after_label(document, label, &selector)
            }
        };

        element
            .map(|el| element_text(&el))
            .ok_or_else(|| ScrapeError::absent(self.field))
    }
}

/// Parse a CSS selector, mapping the borrowed parse error into [`ScrapeError`].
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector(format!("{selector:?}: {e}")))
}

/// All text under an element, whitespace-trimmed at both ends.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn find_after_label<'a>(
    document: &'a Html,
    label: &str,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .skip_while(|node| !matches!(node.value(), Node::Text(text) if text.trim() == label))
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| selector.matches(el))
}
