// Directory-listing service
//
// A `ListingSource` answers listing requests for a path. `HttpListingSource`
// talks to the remote endpoint; `ListingClient` runs requests on the tokio
// runtime and reports completions to the UI thread through the async bridge.

pub mod client;
pub mod http;

pub use client::{FetchDispatcher, FetchRequest, ListingClient, ListingCompletion};
pub use http::HttpListingSource;

use crate::model::ListingResponse;
use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain a listing response at all
///
/// A response carrying a server-reported `error` is not a `ListingError`;
/// it is a successfully decoded [`ListingResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("invalid listing response: {0}")]
    Decode(String),
}

/// Source of directory listings
///
/// Implementations may be slow (network round trips); callers run them off
/// the UI thread.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// List the entries of `path`
    ///
    /// # Errors
    ///
    /// Returns an error if no listing response could be obtained or decoded.
    async fn list(&self, path: &str) -> Result<ListingResponse, ListingError>;
}
