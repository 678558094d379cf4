//! Directory entry types produced by listing operations.

use serde::{Deserialize, Serialize};

/// Kind of directory entry.
///
/// Serializes lowercase (`"file"` / `"directory"`) — this is the wire
/// format clients see in `ls` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirEntryKind {
    File,
    Directory,
}

/// A single entry directly under a listed directory.
///
/// Produced transiently by `list()`; never persisted. The `kind` field
/// serializes as `type` to match the client contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Name of the entry (not a path).
    pub name: String,
    /// Kind of entry.
    #[serde(rename = "type")]
    pub kind: DirEntryKind,
}

impl DirEntry {
    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DirEntryKind::Directory,
        }
    }

    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DirEntryKind::File,
        }
    }

    /// Returns true if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == DirEntryKind::Directory
    }

    /// Returns true if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == DirEntryKind::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kind_as_lowercase_type() {
        let entry = DirEntry::file("notes.txt");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "notes.txt");
        assert_eq!(json["type"], "file");

        let entry = DirEntry::directory("docs");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "directory");
    }

    #[test]
    fn round_trips_through_json() {
        let entry = DirEntry::directory("projects");
        let json = serde_json::to_string(&entry).unwrap();
        let back: DirEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
        assert!(back.is_dir());
        assert!(!back.is_file());
    }
}
