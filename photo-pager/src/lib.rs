//! # Photo Pager
//!
//! Incremental, order-preserving pagination over a device photo library.
//!
//! This crate provides the cross-platform part of the image selector gallery:
//! - An [`AssetSource`] abstraction over the platform photo store
//! - A [`PaginationCursor`] tracking fixed-size fetch windows
//! - A [`FetchCoordinator`] that resolves each window concurrently and returns
//!   it in library order, with at most one fetch in flight
//! - [`normalize`], mapping store records to the `{uri, fileName, type, fileSize, data?}` shape
//! - A SQLite-backed asset index ([`SqliteAssetSource`])
//!
//! ## Platform Separation
//!
//! Permission prompts, picker UI and content-URI resolution stay in the
//! application crate; platforms plug in by implementing [`AssetSource`].
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_pager::{FetchCoordinator, PagerConfig, SqliteAssetSource};
//! use std::sync::Arc;
//!
//! let source = Arc::new(SqliteAssetSource::new(conn, "/path/to/photos"));
//! let pager = FetchCoordinator::new(source, PagerConfig { page_size: 30, ..Default::default() });
//!
//! let page = pager.fetch_next_page().await?;
//! ```

pub mod coordinator;
pub mod cursor;
pub mod error;
pub mod models;
pub mod normalize;
pub mod schema;
pub mod source;
pub mod sqlite_source;

pub use coordinator::FetchCoordinator;
pub use cursor::PaginationCursor;
pub use error::{PagerError, PagerResult};
pub use models::{AssetLocator, AssetRecord, NormalizedAsset, Page, PagerConfig, ResolveOptions};
pub use normalize::{file_type, locator_uri, normalize};
pub use schema::{init_asset_schema, mark_asset_deleted, upsert_asset, NewAsset};
pub use source::{AssetSource, MemoryAssetSource};
pub use sqlite_source::SqliteAssetSource;
