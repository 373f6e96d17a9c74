//! Wire types for the directory-listing endpoint
//!
//! The server answers `POST /api/directorycontents` with either
//! `{ "error": null, "snapshots": [...] }` or `{ "error": "message" }`.
//! Each snapshot describes one entry; `type` is `0` for files and `1` for
//! directories. A snapshot may carry its own nested `snapshots` when the
//! server already listed that directory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a listed entry, encoded on the wire as `0` (file) or `1` (directory)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EntryKind {
    File,
    Directory,
}

impl TryFrom<u8> for EntryKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EntryKind::File),
            1 => Ok(EntryKind::Directory),
            other => Err(format!("unknown entry type {}", other)),
        }
    }
}

impl From<EntryKind> for u8 {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::File => 0,
            EntryKind::Directory => 1,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub file_name: String,
    pub full_path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Pre-fetched children, present only when the server already listed them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<Vec<Snapshot>>,
}

impl Snapshot {
    pub fn file(file_name: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            full_path: full_path.into(),
            kind: EntryKind::File,
            snapshots: None,
        }
    }

    pub fn directory(file_name: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            full_path: full_path.into(),
            kind: EntryKind::Directory,
            snapshots: None,
        }
    }

    pub fn with_snapshots(mut self, snapshots: Vec<Snapshot>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Request body for a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub path: String,
}

/// Response body for a listing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub snapshots: Option<Vec<Snapshot>>,
}

impl ListingResponse {
    pub fn ok(snapshots: Vec<Snapshot>) -> Self {
        Self {
            error: None,
            snapshots: Some(snapshots),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            snapshots: None,
        }
    }

    /// Split the response into the listing or the server-reported error.
    ///
    /// A success without `snapshots` is an empty listing.
    pub fn into_result(self) -> Result<Vec<Snapshot>, String> {
        match self.error {
            Some(message) => Err(message),
            None => Ok(self.snapshots.unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_response() {
        let json = r#"{"error": null, "snapshots": [
            {"file_name": "a.txt", "full_path": "home/a.txt", "type": 0},
            {"file_name": "docs", "full_path": "home/docs", "type": 1, "snapshots": null}
        ]}"#;

        let response: ListingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error, None);

        let snapshots = response.into_result().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0], Snapshot::file("a.txt", "home/a.txt"));
        assert_eq!(snapshots[1].kind, EntryKind::Directory);
        assert_eq!(snapshots[1].snapshots, None);
    }

    #[test]
    fn test_decode_error_response() {
        let response: ListingResponse =
            serde_json::from_str(r#"{"error": "permission denied"}"#).unwrap();
        assert_eq!(
            response.into_result(),
            Err("permission denied".to_string())
        );
    }

    #[test]
    fn test_success_without_snapshots_is_empty() {
        let response: ListingResponse = serde_json::from_str(r#"{"error": null}"#).unwrap();
        assert_eq!(response.into_result(), Ok(Vec::new()));
    }

    #[test]
    fn test_nested_snapshots() {
        let json = r#"{"file_name": "src", "full_path": "p/src", "type": 1,
            "snapshots": [{"file_name": "lib.rs", "full_path": "p/src/lib.rs", "type": 0}]}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        assert!(snapshot.is_dir());
        let children = snapshot.snapshots.unwrap();
        assert_eq!(children[0].file_name, "lib.rs");
    }

    #[test]
    fn test_unknown_entry_type_is_rejected() {
        let json = r#"{"file_name": "x", "full_path": "x", "type": 7}"#;
        let result: Result<Snapshot, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_string(&ListingRequest {
            path: "./home/docs".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"path":"./home/docs"}"#);
    }
}
