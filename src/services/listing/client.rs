use super::{ListingError, ListingSource};
use crate::model::ListingResponse;
use crate::services::async_bridge::AsyncMessage;
use crate::view::file_tree::NodeId;
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;

/// One listing request issued by the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Path sent to the server
    pub path: String,
    /// Node the listing is written onto; `None` replaces the whole tree
    pub target: Option<NodeId>,
    /// Generation of the tree the target belongs to
    pub generation: u64,
}

/// A finished listing request and its outcome
#[derive(Debug, Clone)]
pub struct ListingCompletion {
    pub request: FetchRequest,
    pub result: Result<ListingResponse, ListingError>,
}

/// Sends listing requests somewhere that will eventually answer them
pub trait FetchDispatcher {
    fn dispatch(&self, request: FetchRequest);
}

/// Runs listing requests on the tokio runtime
///
/// Each request becomes its own task. Tasks are not ordered relative to each
/// other and are never cancelled; every completion is posted to the UI
/// thread as [`AsyncMessage::ListingLoaded`].
pub struct ListingClient {
    runtime: Handle,
    source: Arc<dyn ListingSource>,
    sender: mpsc::Sender<AsyncMessage>,
}

impl ListingClient {
    pub fn new(
        runtime: Handle,
        source: Arc<dyn ListingSource>,
        sender: mpsc::Sender<AsyncMessage>,
    ) -> Self {
        Self {
            runtime,
            source,
            sender,
        }
    }
}

impl FetchDispatcher for ListingClient {
    fn dispatch(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        self.runtime.spawn(async move {
            let result = source.list(&request.path).await;
            if let Err(e) = &result {
                tracing::warn!("Listing request for {} failed: {}", request.path, e);
            }
            // The receiver is gone only when the UI is shutting down
            let _ = sender.send(AsyncMessage::ListingLoaded(ListingCompletion {
                request,
                result,
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snapshot;
    use crate::services::async_bridge::AsyncBridge;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedSource;

    #[async_trait]
    impl ListingSource for FixedSource {
        async fn list(&self, path: &str) -> Result<ListingResponse, ListingError> {
            if path == "./missing" {
                return Err(ListingError::Status { status: 404 });
            }
            Ok(ListingResponse::ok(vec![Snapshot::file(
                "a.txt",
                format!("{}/a.txt", path.trim_start_matches("./")),
            )]))
        }
    }

    #[test]
    fn test_completions_reach_the_bridge() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let bridge = AsyncBridge::new();
        let client = ListingClient::new(
            runtime.handle().clone(),
            Arc::new(FixedSource),
            bridge.sender(),
        );

        let request = FetchRequest {
            path: "./home".to_string(),
            target: Some(NodeId(4)),
            generation: 2,
        };
        client.dispatch(request.clone());

        let AsyncMessage::ListingLoaded(completion) = bridge
            .recv_timeout(Duration::from_secs(5))
            .expect("completion should arrive");
        assert_eq!(completion.request, request);

        let response = completion.result.unwrap();
        assert_eq!(response.into_result().unwrap()[0].full_path, "home/a.txt");
    }

    #[test]
    fn test_failures_are_reported_too() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let bridge = AsyncBridge::new();
        let client = ListingClient::new(
            runtime.handle().clone(),
            Arc::new(FixedSource),
            bridge.sender(),
        );

        client.dispatch(FetchRequest {
            path: "./missing".to_string(),
            target: None,
            generation: 0,
        });

        let AsyncMessage::ListingLoaded(completion) = bridge
            .recv_timeout(Duration::from_secs(5))
            .expect("completion should arrive");
        assert_eq!(
            completion.result.unwrap_err(),
            ListingError::Status { status: 404 }
        );
    }
}
