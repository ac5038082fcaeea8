//! Summary lookup: construct the query, fetch, extract, present.

use crate::extract::{self, ExtractError};
use crate::present::{Presented, Presenter};
use crate::query::Query;
use crate::summary::Summary;
use crate::surface::SurfaceError;
use crate::transport::{FetchError, Transport};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("lookup failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("lookup failed: malformed response: {0}")]
    Parse(serde_json::Error),
    #[error("No article found")]
    ArticleNotFound,
    #[error("target surface is read-only: {}", .0.display())]
    TargetSurfaceReadOnly(PathBuf),
    #[error(transparent)]
    Surface(SurfaceError),
    #[error("lookup did not complete")]
    Interrupted,
}

impl LookupError {
    /// Fatal errors abort the run; the rest are reported as a status line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TargetSurfaceReadOnly(_) | Self::Surface(_))
    }
}

impl From<ExtractError> for LookupError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Parse(e) => Self::Parse(e),
            ExtractError::NotFound => Self::ArticleNotFound,
            ExtractError::MultiplePages(n) => {
                tracing::warn!(pages = n, "ambiguous response, expected one page");
                Self::ArticleNotFound
            }
        }
    }
}

impl From<SurfaceError> for LookupError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::ReadOnly(path) => Self::TargetSurfaceReadOnly(path),
            other => Self::Surface(other),
        }
    }
}

/// A finished lookup
#[derive(Debug, Clone)]
pub struct Found {
    pub summary: Summary,
    pub presented: Presented,
}

/// Run one lookup to completion. The fetch is the only await point.
pub async fn lookup(
    query: &Query,
    transport: &dyn Transport,
    presenter: &dyn Presenter,
) -> Result<Found, LookupError> {
    let url = query.url();
    tracing::debug!(title = %query.title, language = %query.language, "looking up");

    let body = transport.fetch(&url).await?.success_body()?;
    let page = extract::try_extract(&body)?;

    let summary = Summary::new(page.title.unwrap_or_else(|| query.title.clone()), page.extract);
    let presented = presenter.present(&summary)?;

    Ok(Found { summary, presented })
}

/// Run independent lookups concurrently, yielding results as they complete.
///
/// Completion order is unrelated to the order of `queries`. Every query
/// gets a result: one whose task panicked comes back last as
/// `LookupError::Interrupted`.
pub async fn lookup_all(
    queries: Vec<Query>,
    transport: Arc<dyn Transport>,
    presenter: Arc<dyn Presenter>,
) -> Vec<(Query, Result<Found, LookupError>)> {
    let mut pending: Vec<Option<Query>> = queries.iter().cloned().map(Some).collect();

    let mut tasks = JoinSet::new();
    for (index, query) in queries.into_iter().enumerate() {
        let transport = Arc::clone(&transport);
        let presenter = Arc::clone(&presenter);
        tasks.spawn(async move {
            let result = lookup(&query, transport.as_ref(), presenter.as_ref()).await;
            (index, query, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, query, result)) => {
                pending[index] = None;
                results.push((query, result));
            }
            Err(e) => tracing::error!(error = %e, "lookup task failed"),
        }
    }

    results.extend(
        pending
            .into_iter()
            .flatten()
            .map(|query| (query, Err(LookupError::Interrupted))),
    );
    results
}
