//! In-app gallery: paginated browsing plus selection of a single image

use crate::cache::CacheFileWriter;
use crate::error::SelectorError;
use crate::options::{GridColumns, SelectorOptions};
use crate::picker::RequestGuard;
use crate::response::PickOutcome;
use photo_pager::{
    file_type, AssetSource, FetchCoordinator, NormalizedAsset, Page, PaginationCursor,
    ResolveOptions,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub struct GallerySession {
    pager: FetchCoordinator,
    writer: CacheFileWriter,
    options: SelectorOptions,
    selecting: AtomicBool,
}

impl GallerySession {
    pub fn new(
        source: Arc<dyn AssetSource>,
        writer: CacheFileWriter,
        options: SelectorOptions,
    ) -> Self {
        let pager = FetchCoordinator::new(source, options.pager_config());
        Self {
            pager,
            writer,
            options,
            selecting: AtomicBool::new(false),
        }
    }

    pub fn title(&self) -> &str {
        self.options.gallery_title()
    }

    pub fn grid(&self) -> GridColumns {
        self.options.ios_grid_number
    }

    /// Next page of the gallery; empty when exhausted or already loading
    pub async fn fetch_next_page(&self) -> Result<Page, SelectorError> {
        Ok(self.pager.fetch_next_page().await?)
    }

    pub fn reset_session(&self) {
        self.pager.reset_session();
    }

    pub fn loaded_items(&self) -> Vec<NormalizedAsset> {
        self.pager.loaded_items()
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.pager.cursor()
    }

    /// Copy the asset at `index` to the cache and close the gallery
    pub async fn select(&self, index: usize) -> Result<PickOutcome, SelectorError> {
        let Some(_guard) = RequestGuard::acquire(&self.selecting) else {
            return Err(SelectorError::RequestInProgress);
        };

        let record = self
            .pager
            .resolve(index, ResolveOptions { include_data: true })
            .await?;

        let Some(content) = record.content else {
            return Err(SelectorError::FileCreate(format!(
                "No content for asset {}",
                record.identifier
            )));
        };

        let extension = match file_type(&record.file_name) {
            "" => "jpg".to_string(),
            ext => ext.to_ascii_lowercase(),
        };

        let response = self
            .writer
            .write(content, &extension, &self.options.storage_options)
            .await?;

        log::info!("Gallery selection {} saved to {}", index, response.path);
        self.pager.reset_session();
        Ok(PickOutcome::Picked(response))
    }

    /// Close the gallery without a selection
    pub fn cancel(&self) -> PickOutcome {
        self.pager.reset_session();
        PickOutcome::Cancelled
    }
}
