use crate::models::{AssetLocator, AssetRecord, NormalizedAsset};
use base64::Engine;

/// Extension of `file_name` as written, without the dot
///
/// Returns an empty string when the name has no `.` at all.
pub fn file_type(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) => &file_name[pos + 1..],
        None => "",
    }
}

/// Caller-facing URI for a locator
pub fn locator_uri(locator: &AssetLocator) -> String {
    match locator {
        AssetLocator::LocalPath(path) => format!("file://{}", path.display()),
        AssetLocator::ContentUri(uri) => uri.clone(),
    }
}

/// Map a store record into the stable response shape
///
/// Unresolved fields fall back to an empty string or zero.
pub fn normalize(record: &AssetRecord) -> NormalizedAsset {
    NormalizedAsset {
        uri: record.locator.as_ref().map(locator_uri).unwrap_or_default(),
        file_name: record.file_name.clone(),
        kind: file_type(&record.file_name).to_string(),
        file_size: record.byte_size.unwrap_or(0),
        data: record
            .content
            .as_ref()
            .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
    }
}
