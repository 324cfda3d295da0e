//! Error types shared by the fetchers, parsers and sinks.
//!
//! Parsers return these explicitly so the driver decides per call site whether
//! a failure skips one page, drops one optional field, or aborts the run.

use thiserror::Error;

/// Failures raised while fetching or extracting a page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than 200.
    #[error("failed to retrieve {url}: status code {status}")]
    Status { url: String, status: u16 },

    /// A required element of the page layout is missing.
    #[error("missing {field} in page markup")]
    StructuralAbsence { field: &'static str },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid CSS selector: {0}")]
    Selector(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ScrapeError {
    pub fn absent(field: &'static str) -> Self {
        ScrapeError::StructuralAbsence { field }
    }
}

/// Failures of the French date normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Not of the shape `<day> <month> <year>`, or day/year not numeric.
    #[error("malformed date text {0:?}")]
    Malformed(String),

    #[error("unknown French month name {0:?}")]
    UnknownMonth(String),

    /// The triple does not name a real calendar day.
    #[error("invalid calendar date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_url_and_code() {
        let err = ScrapeError::Status {
            url: "https://www.mathraining.be/users/1".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "failed to retrieve https://www.mathraining.be/users/1: status code 404"
        );
    }

    #[test]
    fn test_absent_field_message() {
        assert_eq!(ScrapeError::absent("score").to_string(), "missing score in page markup");
    }

    #[test]
    fn test_invalid_date_message_is_zero_padded() {
        let err = DateError::InvalidDate { year: 2021, month: 4, day: 31 };
        assert_eq!(err.to_string(), "invalid calendar date 2021-04-31");
    }
}
