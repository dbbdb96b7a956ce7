//! Page fetching over an [`AssetSource`]
//!
//! A coordinator serves the library one window at a time. Every item of a
//! window is resolved on the blocking pool; results are slotted by index so the
//! page comes back in library order no matter which resolution finishes first.

use crate::cursor::PaginationCursor;
use crate::error::{PagerError, PagerResult};
use crate::models::{AssetRecord, NormalizedAsset, Page, PagerConfig, ResolveOptions};
use crate::normalize::normalize;
use crate::source::AssetSource;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinSet;

struct SessionState {
    cursor: PaginationCursor,
    /// Every item served since the last reset, in library order
    loaded: Vec<NormalizedAsset>,
    /// Bumped on reset; a fetch that started under an older generation is stale
    generation: u64,
}

pub struct FetchCoordinator {
    source: Arc<dyn AssetSource>,
    config: PagerConfig,
    state: Mutex<SessionState>,
}

impl FetchCoordinator {
    pub fn new(source: Arc<dyn AssetSource>, config: PagerConfig) -> Self {
        let cursor = PaginationCursor::new(config.page_size);
        Self {
            source,
            config,
            state: Mutex::new(SessionState {
                cursor,
                loaded: Vec::new(),
                generation: 0,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch the next window of the library
    ///
    /// Returns an empty page when the library is exhausted or another fetch is
    /// still running. Store-level failures are returned as `Err` and leave the
    /// cursor where it was, so the same window is retried on the next call.
    pub async fn fetch_next_page(&self) -> PagerResult<Page> {
        let generation = {
            let mut state = self.lock_state();
            if state.cursor.is_fetching() || state.cursor.reached_end() {
                log::debug!(
                    "Skipping fetch (fetching: {}, reached end: {})",
                    state.cursor.is_fetching(),
                    state.cursor.reached_end()
                );
                return Ok(Page::empty(state.cursor.reached_end()));
            }
            state.cursor.set_fetching(true);
            state.generation
        };
        let mut in_flight = FetchGuard {
            coordinator: self,
            generation,
            armed: true,
        };

        let result = self.fetch_window(generation).await;

        let mut state = self.lock_state();
        in_flight.armed = false;
        if state.generation != generation {
            log::debug!("Session was reset during fetch, discarding results");
            return Ok(Page::empty(state.cursor.reached_end()));
        }
        state.cursor.set_fetching(false);

        match result {
            Ok(Some((count, start_index, items))) => {
                state.cursor.advance(count);
                state.loaded.extend(items.iter().cloned());
                log::debug!(
                    "Served {} assets from index {} ({} loaded, reached end: {})",
                    items.len(),
                    start_index,
                    state.loaded.len(),
                    state.cursor.reached_end()
                );
                Ok(Page {
                    start_index,
                    items,
                    reached_end: state.cursor.reached_end(),
                })
            }
            Ok(None) => {
                state.cursor.mark_ended();
                Ok(Page::empty(true))
            }
            Err(e) => {
                log::error!("Page fetch failed: {}", e);
                Err(e)
            }
        }
    }

    /// Resolve the current window. `Ok(None)` means nothing is left to serve.
    async fn fetch_window(
        &self,
        generation: u64,
    ) -> PagerResult<Option<(usize, usize, Vec<NormalizedAsset>)>> {
        let source = Arc::clone(&self.source);
        let count = tokio::task::spawn_blocking(move || source.count())
            .await
            .map_err(|e| PagerError::Other(format!("Task join error: {}", e)))??;

        let window = {
            let state = self.lock_state();
            if state.generation != generation {
                return Ok(None);
            }
            state.cursor.window(count)
        };

        let Some((start, end)) = window else {
            log::debug!("No assets left to serve (library holds {})", count);
            return Ok(None);
        };

        let items = self.resolve_window(start, end).await?;
        Ok(Some((count, start, items)))
    }

    async fn resolve_window(&self, start: usize, end: usize) -> PagerResult<Vec<NormalizedAsset>> {
        let options = ResolveOptions {
            include_data: self.config.include_data,
        };
        let limit = self.config.max_concurrent_resolutions.max(1);
        let mut slots: Vec<Option<NormalizedAsset>> = vec![None; end - start + 1];
        let mut failure: Option<PagerError> = None;
        let mut join_set = JoinSet::new();

        for index in start..=end {
            while join_set.len() >= limit {
                if let Some(joined) = join_set.join_next().await {
                    store_resolution(joined, start, &mut slots, &mut failure);
                }
            }

            let source = Arc::clone(&self.source);
            join_set.spawn_blocking(move || {
                let result = source.fetch(index, options).map(|record| normalize(&record));
                (index, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            store_resolution(joined, start, &mut slots, &mut failure);
        }

        if let Some(e) = failure {
            return Err(e);
        }

        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(offset, slot)| {
                slot.unwrap_or_else(|| {
                    log::error!("Asset {} produced no result, serving placeholder", start + offset);
                    NormalizedAsset::default()
                })
            })
            .collect())
    }

    /// Resolve one asset outside of paging, e.g. for a selection
    pub async fn resolve(&self, index: usize, options: ResolveOptions) -> PagerResult<AssetRecord> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || source.fetch(index, options))
            .await
            .map_err(|e| PagerError::Other(format!("Task join error: {}", e)))?
    }

    /// Start over from the first window and drop everything loaded so far
    ///
    /// A fetch still in flight finishes on its own, but its results are
    /// discarded.
    pub fn reset_session(&self) {
        let mut state = self.lock_state();
        state.cursor.reset();
        state.loaded.clear();
        state.generation = state.generation.wrapping_add(1);
        log::debug!("Gallery session reset");
    }

    /// Change the page size; only honored before the first page is served
    pub fn set_page_size(&self, page_size: usize) -> bool {
        self.lock_state().cursor.initialize(page_size)
    }

    /// Snapshot of the cursor
    pub fn cursor(&self) -> PaginationCursor {
        self.lock_state().cursor.clone()
    }

    /// All items served since the last reset
    pub fn loaded_items(&self) -> Vec<NormalizedAsset> {
        self.lock_state().loaded.clone()
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }
}

/// Clears `is_fetching` if a fetch future is dropped before it completes
struct FetchGuard<'a> {
    coordinator: &'a FetchCoordinator,
    generation: u64,
    armed: bool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.coordinator.lock_state();
        if state.generation == self.generation {
            log::debug!("Fetch dropped before completion, releasing cursor");
            state.cursor.set_fetching(false);
        }
    }
}

fn store_resolution(
    joined: Result<(usize, PagerResult<NormalizedAsset>), tokio::task::JoinError>,
    start: usize,
    slots: &mut [Option<NormalizedAsset>],
    failure: &mut Option<PagerError>,
) {
    match joined {
        Ok((index, Ok(item))) => slots[index - start] = Some(item),
        Ok((index, Err(e))) => {
            log::warn!("Resolving asset {} failed: {}", index, e);
            if failure.is_none() {
                *failure = Some(e);
            }
        }
        // The slot stays empty and is filled with a placeholder
        Err(e) => log::error!("Asset resolution task failed: {}", e),
    }
}
