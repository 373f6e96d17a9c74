pub mod listing;

pub use listing::{EntryKind, ListingRequest, ListingResponse, Snapshot};
