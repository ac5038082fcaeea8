//! # wikisumma
//!
//! Look up the introductory summary of a Wikipedia article and display it.
//!
//! A lookup is strictly linear: build the query URL, fetch it, extract the
//! `extract` field from the JSON response, and present the reflowed text on
//! a display surface (a new read-only file, or an insertion into an existing
//! one).

pub mod config;
pub mod extract;
pub mod fill;
pub mod lookup;
pub mod present;
pub mod query;
pub mod summary;
pub mod surface;
pub mod transport;

pub use config::Config;
pub use extract::{extract_summary, SummaryResult};
pub use lookup::{lookup, lookup_all, LookupError};
pub use present::{InsertInto, NewSurface, Presenter};
pub use query::{build_query_url, Query};
pub use summary::Summary;
pub use transport::{HttpTransport, Transport};
