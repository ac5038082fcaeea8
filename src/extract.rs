//! Summary extraction from the extracts API response.
//!
//! Only `query.pages.<pageid>.extract` (and the page title) are read; every
//! other field is ignored.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no article found")]
    NotFound,
    #[error("expected a single page, got {0}")]
    MultiplePages(usize),
}

/// The one page of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Option<String>,
    pub extract: String,
}

/// Outcome of [`extract_summary`]: found with text, or not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryResult {
    pub text: Option<String>,
}

impl SummaryResult {
    pub fn found(&self) -> bool {
        self.text.is_some()
    }
}

/// Lenient extraction: any failure is reported as not found.
pub fn extract_summary(body: &[u8]) -> SummaryResult {
    match try_extract(body) {
        Ok(page) => SummaryResult {
            text: Some(page.extract),
        },
        Err(e) => {
            tracing::debug!(error = %e, "no summary in response");
            SummaryResult::default()
        }
    }
}

/// Strict extraction, keeping parse failures apart from missing articles.
///
/// Responses with more than one page are rejected rather than guessed at.
pub fn try_extract(body: &[u8]) -> Result<Page, ExtractError> {
    let root: Value = serde_json::from_slice(body)?;

    let pages = root
        .get("query")
        .and_then(|query| query.get("pages"))
        .and_then(Value::as_object)
        .ok_or(ExtractError::NotFound)?;

    let mut entries = pages.values();
    let page = match (entries.next(), pages.len()) {
        (None, _) => return Err(ExtractError::NotFound),
        (Some(page), 1) => page,
        (Some(_), n) => return Err(ExtractError::MultiplePages(n)),
    };

    let extract = page
        .get("extract")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ExtractError::NotFound)?;

    Ok(Page {
        title: page.get("title").and_then(Value::as_str).map(str::to_string),
        extract: extract.to_string(),
    })
}
