//! Channel between background tasks and the UI thread
//!
//! Tasks running on the tokio runtime hold a cloned sender and post
//! [`AsyncMessage`]s. The event loop drains them once per iteration, so every
//! state change still happens on the UI thread.

use crate::services::listing::ListingCompletion;
use std::sync::mpsc;
use std::time::Duration;

/// Messages delivered from background tasks to the UI thread
#[derive(Debug)]
pub enum AsyncMessage {
    /// A directory listing request finished (successfully or not)
    ListingLoaded(ListingCompletion),
}

pub struct AsyncBridge {
    sender: mpsc::Sender<AsyncMessage>,
    receiver: mpsc::Receiver<AsyncMessage>,
}

impl AsyncBridge {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Sender handed to background tasks
    pub fn sender(&self) -> mpsc::Sender<AsyncMessage> {
        self.sender.clone()
    }

    /// All messages that have arrived so far, without blocking
    pub fn try_recv_all(&self) -> Vec<AsyncMessage> {
        self.receiver.try_iter().collect()
    }

    /// Wait up to `timeout` for the next message
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AsyncMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

impl Default for AsyncBridge {
    fn default() -> Self {
        Self::new()
    }
}
