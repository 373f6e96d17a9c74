use super::{ListingError, ListingSource};
use crate::model::{ListingRequest, ListingResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Path of the listing endpoint, relative to the server base URL
pub const LISTING_ENDPOINT: &str = "/api/directorycontents";

/// Listing source backed by the remote HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpListingSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            url: format!("{}{}", base_url.trim_end_matches('/'), LISTING_ENDPOINT),
            agent,
        }
    }

    /// Full URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post a listing request and decode the answer, blocking the caller
    pub fn fetch_blocking(&self, path: &str) -> Result<ListingResponse, ListingError> {
        let body = serde_json::to_string(&ListingRequest {
            path: path.to_string(),
        })
        .map_err(|e| ListingError::Decode(e.to_string()))?;

        tracing::debug!("POST {} path={}", self.url, path);

        let result = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .set("Cache-Control", "no-cache")
            .send_string(&body);

        match result {
            Ok(response) => {
                let text = response
                    .into_string()
                    .map_err(|e| ListingError::Transport(e.to_string()))?;
                decode_response(&text)
            }
            Err(ureq::Error::Status(status, response)) => {
                // Servers may report application errors with an error status
                // and a regular listing body.
                let described = response
                    .into_string()
                    .ok()
                    .and_then(|text| serde_json::from_str::<ListingResponse>(&text).ok())
                    .filter(|listing| listing.error.is_some());

                match described {
                    Some(listing) => Ok(listing),
                    None => Err(ListingError::Status { status }),
                }
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(ListingError::Transport(transport.to_string()))
            }
        }
    }
}

fn decode_response(text: &str) -> Result<ListingResponse, ListingError> {
    serde_json::from_str(text).map_err(|e| ListingError::Decode(e.to_string()))
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn list(&self, path: &str) -> Result<ListingResponse, ListingError> {
        let source = self.clone();
        let path = path.to_string();

        tokio::task::spawn_blocking(move || source.fetch_blocking(&path))
            .await
            .map_err(|e| ListingError::Transport(e.to_string()))?
    }
}
