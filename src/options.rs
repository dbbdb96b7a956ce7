//! Typed selector options
//!
//! Every field is optional on input; the accessors supply the defaults shown to
//! the user. The serialized names follow the JavaScript options object, so the
//! same structure can be read from the bridge (JSON) or from a config file (TOML).

use crate::error::SelectorError;
use photo_pager::PagerConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Pick Photos";
pub const DEFAULT_GALLERY_TITLE: &str = "Choose Photo";
pub const DEFAULT_CANCEL_TITLE: &str = "Cancel";
pub const DEFAULT_TAKE_PHOTO_TITLE: &str = "Take Photos";
pub const DEFAULT_LIBRARY_TITLE: &str = "Open Photo Gallery";
pub const DEFAULT_PAGE_SIZE: usize = 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorOptions {
    /// Title of the source chooser
    pub title: Option<String>,
    /// Title of the gallery screen
    pub gallery_title: Option<String>,
    pub cancel_button_title: Option<String>,
    pub take_photo_button_title: Option<String>,
    pub choose_from_library_button_title: Option<String>,
    #[serde(rename = "iOSGridNumber")]
    pub ios_grid_number: GridColumns,
    #[serde(rename = "iOSModalPresentationStyle")]
    pub ios_modal_presentation_style: ModalPresentationStyle,
    /// Gallery page size, applied on the first page only
    pub page_size: Option<usize>,
    /// Include base64 content in gallery pages
    pub include_data: bool,
    /// Where cache files are written
    pub storage_options: StorageOptions,
    pub permission_denied: Option<PermissionDeniedText>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageOptions {
    /// Exclude cache files from device backups (iOS)
    pub skip_backup: bool,
    /// Sub directory of the cache directory for written files
    pub path: Option<String>,
}

/// Text of the "permission denied" alert
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionDeniedText {
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "reTryTitle")]
    pub retry_title: Option<String>,
    pub ok_title: Option<String>,
}

/// Number of gallery columns
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridColumns {
    #[default]
    Three,
    Four,
}

impl TryFrom<u8> for GridColumns {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(GridColumns::Three),
            4 => Ok(GridColumns::Four),
            other => Err(format!("grid number must be 3 or 4, got {}", other)),
        }
    }
}

impl From<GridColumns> for u8 {
    fn from(value: GridColumns) -> Self {
        value.count() as u8
    }
}

impl GridColumns {
    pub fn count(self) -> u32 {
        match self {
            GridColumns::Three => 3,
            GridColumns::Four => 4,
        }
    }

    /// Rows per screen height
    pub fn height_divider(self) -> f64 {
        match self {
            GridColumns::Three => 6.5,
            GridColumns::Four => 8.0,
        }
    }

    /// Cell size for a gallery of the given frame, with 2pt spacing
    pub fn cell_size(self, frame_width: f64, frame_height: f64) -> (f64, f64) {
        (
            frame_width / self.count() as f64 - 2.0,
            frame_height / self.height_divider(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ModalPresentationStyle {
    /// Requires iOS 15 or later
    PageSheet,
    #[default]
    OverFullScreen,
}

impl SelectorOptions {
    /// Parse the options object sent over the bridge
    pub fn from_json(s: &str) -> Result<Self, SelectorError> {
        serde_json::from_str(s).map_err(|e| SelectorError::Options(e.to_string()))
    }

    /// Load options from a TOML config file's contents
    pub fn from_toml(s: &str) -> Result<Self, SelectorError> {
        toml::from_str(s).map_err(|e| SelectorError::Options(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, SelectorError> {
        toml::to_string_pretty(self).map_err(|e| SelectorError::Options(e.to_string()))
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn gallery_title(&self) -> &str {
        self.gallery_title.as_deref().unwrap_or(DEFAULT_GALLERY_TITLE)
    }

    pub fn cancel_button_title(&self) -> &str {
        self.cancel_button_title
            .as_deref()
            .unwrap_or(DEFAULT_CANCEL_TITLE)
    }

    pub fn take_photo_button_title(&self) -> &str {
        self.take_photo_button_title
            .as_deref()
            .unwrap_or(DEFAULT_TAKE_PHOTO_TITLE)
    }

    pub fn choose_from_library_button_title(&self) -> &str {
        self.choose_from_library_button_title
            .as_deref()
            .unwrap_or(DEFAULT_LIBRARY_TITLE)
    }

    /// Pager configuration for the gallery
    pub fn pager_config(&self) -> PagerConfig {
        PagerConfig {
            page_size: self.page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
            include_data: self.include_data,
            ..PagerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SelectorOptions::default();
        assert_eq!(options.title(), "Pick Photos");
        assert_eq!(options.gallery_title(), "Choose Photo");
        assert_eq!(options.cancel_button_title(), "Cancel");
        assert_eq!(options.take_photo_button_title(), "Take Photos");
        assert_eq!(options.choose_from_library_button_title(), "Open Photo Gallery");
        assert_eq!(options.ios_grid_number, GridColumns::Three);
        assert_eq!(
            options.ios_modal_presentation_style,
            ModalPresentationStyle::OverFullScreen
        );
        assert_eq!(options.pager_config().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_from_bridge_json() {
        let options = SelectorOptions::from_json(
            r#"{
                "title": "Profilbild",
                "cancelButtonTitle": "Abbrechen",
                "storageOptions": { "skipBackup": true, "path": "images" },
                "permissionDenied": { "title": "No access", "reTryTitle": "Retry" },
                "iOSGridNumber": 4,
                "iOSModalPresentationStyle": "pageSheet"
            }"#,
        )
        .unwrap();

        assert_eq!(options.title(), "Profilbild");
        assert_eq!(options.cancel_button_title(), "Abbrechen");
        assert_eq!(options.take_photo_button_title(), "Take Photos");
        assert!(options.storage_options.skip_backup);
        assert_eq!(options.storage_options.path.as_deref(), Some("images"));
        let denied = options.permission_denied.unwrap();
        assert_eq!(denied.retry_title.as_deref(), Some("Retry"));
        assert_eq!(denied.ok_title, None);
        assert_eq!(options.ios_grid_number, GridColumns::Four);
        assert_eq!(
            options.ios_modal_presentation_style,
            ModalPresentationStyle::PageSheet
        );
    }

    #[test]
    fn test_invalid_grid_number_rejected() {
        let err = SelectorOptions::from_json(r#"{ "iOSGridNumber": 5 }"#).unwrap_err();
        assert!(matches!(err, SelectorError::Options(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_src = r#"
            galleryTitle = "Fotos"
            pageSize = 30
            includeData = true

            [storageOptions]
            path = "selector"
        "#;
        let options = SelectorOptions::from_toml(toml_src).unwrap();
        assert_eq!(options.gallery_title(), "Fotos");
        let config = options.pager_config();
        assert_eq!(config.page_size, 30);
        assert!(config.include_data);

        let reparsed = SelectorOptions::from_toml(&options.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed, options);
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let options = SelectorOptions {
            page_size: Some(0),
            ..SelectorOptions::default()
        };
        assert_eq!(options.pager_config().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_grid_cell_size() {
        let (w, h) = GridColumns::Three.cell_size(300.0, 650.0);
        assert_eq!(w, 98.0);
        assert_eq!(h, 100.0);
        let (w, h) = GridColumns::Four.cell_size(400.0, 800.0);
        assert_eq!(w, 98.0);
        assert_eq!(h, 100.0);
    }
}
