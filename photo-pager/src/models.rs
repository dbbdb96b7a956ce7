use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the content of an asset can be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocator {
    /// Absolute path on the local file system
    LocalPath(PathBuf),
    /// Platform content URI (e.g. `content://media/...`, `ph://...`)
    ContentUri(String),
}

/// A single photo as reported by the asset store
///
/// Optional fields are resolved best-effort: the store leaves them empty when
/// the platform could not produce them, and the record is still served.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    /// Opaque identifier, stable within a session
    pub identifier: String,
    /// Creation date, only used for ordering
    pub created_at: DateTime<Utc>,
    pub byte_size: Option<u64>,
    pub file_name: String,
    pub locator: Option<AssetLocator>,
    /// Raw bytes, only present when content was requested
    pub content: Option<Vec<u8>>,
}

/// Normalized item handed to the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAsset {
    pub uri: String,
    pub file_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// One window of normalized items, in library order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Absolute index of `items[0]` in the sorted library
    pub start_index: usize,
    pub items: Vec<NormalizedAsset>,
    /// True when this page exhausted the library
    pub reached_end: bool,
}

impl Page {
    /// An empty page: the library is exhausted or a fetch is already running
    pub fn empty(reached_end: bool) -> Self {
        Self {
            start_index: 0,
            items: Vec::new(),
            reached_end,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What a source should resolve for each fetched record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Load full byte content (needed for the `data` field)
    pub include_data: bool,
}

/// Configuration for a fetch coordinator
#[derive(Debug, Clone)]
pub struct PagerConfig {
    /// Items per window
    pub page_size: usize,
    /// Resolve full content for every paged item
    pub include_data: bool,
    /// Upper bound on per-item resolutions running at once
    pub max_concurrent_resolutions: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: 60,
            include_data: false,
            max_concurrent_resolutions: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_asset_wire_names() {
        let asset = NormalizedAsset {
            uri: "file:///tmp/a.png".to_string(),
            file_name: "a.png".to_string(),
            kind: "png".to_string(),
            file_size: 12,
            data: None,
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["fileName"], "a.png");
        assert_eq!(json["type"], "png");
        assert_eq!(json["fileSize"], 12);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_empty_page() {
        let page = Page::empty(true);
        assert!(page.is_empty());
        assert!(page.reached_end);
    }
}
