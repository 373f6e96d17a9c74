//! Asynchronous services and process-level integrations
//!
//! Everything here deals with the network, the terminal or log files.

pub mod async_bridge;
pub mod listing;
pub mod log_dirs;
pub mod terminal_modes;
pub mod tracing_setup;
