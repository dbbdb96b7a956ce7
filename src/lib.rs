//! # Image Selector
//!
//! Pick a single image from the camera, the system photo library or an in-app
//! gallery, and hand it back as a file in the app cache directory.
//!
//! - [`PickerSession`] runs one camera or library request at a time
//! - [`GallerySession`] pages through the library with [`photo_pager`] and
//!   turns a selection into a cache file
//! - [`SelectorOptions`] carries titles, storage and gallery settings, parsed
//!   from the bridge JSON or a TOML file
//!
//! Every request ends in a [`PickOutcome`] or a [`SelectorError`] whose
//! [`ErrorResponse`] carries the numeric code reported to the caller.
//!
//! ```rust,ignore
//! use image_selector::{
//!     default_cache_dir, platform_picker, CacheFileWriter, PickSource, PickerSession, SelectorOptions,
//! };
//!
//! image_selector::init_logging();
//! let session = PickerSession::new(
//!     platform_picker(),
//!     CacheFileWriter::new(default_cache_dir()),
//!     SelectorOptions::from_json(options_json)?,
//! );
//! match session.pick(PickSource::Library).await {
//!     Ok(outcome) => send(serde_json::to_string(&outcome)?),
//!     Err(e) => send(serde_json::to_string(&e.to_response())?),
//! }
//! ```

pub mod cache;
pub mod error;
pub mod filesystem;
pub mod gallery;
pub mod logging;
pub mod options;
pub mod picker;
pub mod response;

pub use cache::{CacheFileWriter, CACHE_FILE_PREFIX};
pub use error::{ErrorCode, ErrorResponse, SelectorError};
pub use filesystem::default_cache_dir;
pub use gallery::GallerySession;
pub use logging::init_logging;
pub use options::{
    GridColumns, ModalPresentationStyle, PermissionDeniedText, SelectorOptions, StorageOptions,
};
pub use picker::{
    platform_picker, PermissionStatus, PickSource, PickerSession, PlatformPicker,
    UnsupportedPicker,
};
pub use response::{mime_from_ext, PickOutcome, PickResponse};
