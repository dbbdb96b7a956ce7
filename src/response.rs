use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A picked image written to the cache directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PickResponse {
    pub path: String,
    pub uri: String,
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`
    #[serde(rename = "type")]
    pub kind: String,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Result of a single-shot request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(PickResponse),
    /// The user dismissed the picker; serialized as `{"didCancel": true}`
    Cancelled,
}

impl PickOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PickOutcome::Cancelled)
    }
}

impl Serialize for PickOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PickOutcome::Picked(response) => response.serialize(serializer),
            PickOutcome::Cancelled => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("didCancel", &true)?;
                map.end()
            }
        }
    }
}

/// MIME type for a file extension
pub fn mime_from_ext(ext: &str) -> String {
    match ext.to_ascii_lowercase().as_str() {
        "" | "jpg" | "jpeg" => "image/jpeg".to_string(),
        "heic" | "heif" => "image/heic".to_string(),
        other => format!("image/{}", other),
    }
}
