//! HTTP transport for the Wikipedia API.
//!
//! Uses reqwest for fetching. The `Transport` trait is the seam the lookup
//! is driven through, so tests can substitute a canned response.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered with HTTP {0}")]
    Status(u16),
}

/// A completed response: status code and the body that follows the headers
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body, or `FetchError::Status` for a non-2xx response
    pub fn success_body(self) -> Result<Vec<u8>, FetchError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(FetchError::Status(self.status))
        }
    }
}

/// Performs one GET per call, resolving once the whole body has arrived
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given User-Agent and request timeout
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        tracing::debug!(%url, "fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn transport() -> HttpTransport {
        HttpTransport::new("wikisumma-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetch_returns_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::UrlEncoded("titles".into(), "Emacs".into()))
            .match_header("user-agent", "wikisumma-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"query":{}}"#)
            .create_async()
            .await;

        let url = format!("{}/w/api.php?action=query&titles=Emacs", server.url());
        let response = transport().fetch(&url).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, br#"{"query":{}}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_becomes_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/w/api.php")
            .with_status(503)
            .create_async()
            .await;

        let url = format!("{}/w/api.php", server.url());
        let response = transport().fetch(&url).await.unwrap();

        assert_eq!(response.status, 503);
        assert!(matches!(response.success_body(), Err(FetchError::Status(503))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_failure_is_a_request_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let err = transport()
            .fetch("http://127.0.0.1:9/w/api.php")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }
}
