//! Summary struct - the text handed to presenters once a lookup succeeds.

/// Introductory extract of one Wikipedia article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Article title as reported by the API, after redirects
    pub title: String,
    /// Plain-text introduction
    pub text: String,
}

impl Summary {
    /// Create a new summary
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Check if the summary has any content
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
