//! Query construction for the Wikipedia extracts API.

const QUERY_PREFIX: &str = "/w/api.php?continue=&action=query&titles=";
const QUERY_SUFFIX: &str = "&prop=extracts&exintro=&explaintext=&format=json&redirects";

/// Default Wikipedia language code
pub const DEFAULT_LANGUAGE: &str = "en";

/// A single summary lookup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub title: String,
    pub language: String,
}

impl Query {
    /// Create a query against the English Wikipedia
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Request URL for this query
    pub fn url(&self) -> String {
        build_query_url(&self.title, &self.language)
    }
}

/// Build the extracts API URL for `title` on the `language` wiki.
///
/// Spaces become underscores before percent-encoding. The language code is
/// placed in the host unescaped, so it must come from trusted configuration.
pub fn build_query_url(title: &str, language: &str) -> String {
    let term = title.replace(' ', "_");
    format!(
        "https://{}.wikipedia.org{}{}{}",
        language,
        QUERY_PREFIX,
        urlencoding::encode(&term),
        QUERY_SUFFIX
    )
}
