//! Asset store abstraction
//!
//! A source exposes the photo library as a random-access list sorted by
//! creation date, newest first. Implementations are called from the blocking
//! worker pool, so they may block on the platform SDK or the database.

use crate::error::{PagerError, PagerResult};
use crate::models::{AssetRecord, ResolveOptions};
use std::sync::RwLock;

pub trait AssetSource: Send + Sync + 'static {
    /// Total number of assets currently in the library
    fn count(&self) -> PagerResult<usize>;

    /// Resolve the asset at `index`
    ///
    /// Fields the platform cannot produce stay empty on the returned record.
    /// `Err` is reserved for store-level failures.
    fn fetch(&self, index: usize, options: ResolveOptions) -> PagerResult<AssetRecord>;
}

/// Source over records that were already enumerated, e.g. by a platform
/// picker callback
pub struct MemoryAssetSource {
    records: RwLock<Vec<AssetRecord>>,
}

impl MemoryAssetSource {
    pub fn new(mut records: Vec<AssetRecord>) -> Self {
        sort_newest_first(&mut records);
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replace the library contents (the platform reported a change)
    pub fn replace(&self, mut records: Vec<AssetRecord>) {
        sort_newest_first(&mut records);
        let mut guard = self.records.write().unwrap_or_else(|e| {
            log::warn!("Record list was poisoned, replacing its contents");
            e.into_inner()
        });
        *guard = records;
        drop(guard);
        self.records.clear_poison();
    }
}

fn sort_newest_first(records: &mut [AssetRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
}

impl AssetSource for MemoryAssetSource {
    fn count(&self) -> PagerResult<usize> {
        self.records
            .read()
            .map(|r| r.len())
            .map_err(|_| PagerError::Unavailable("record list poisoned".to_string()))
    }

    fn fetch(&self, index: usize, options: ResolveOptions) -> PagerResult<AssetRecord> {
        let records = self
            .records
            .read()
            .map_err(|_| PagerError::Unavailable("record list poisoned".to_string()))?;
        let mut record = records
            .get(index)
            .cloned()
            .ok_or(PagerError::IndexOutOfRange {
                index,
                count: records.len(),
            })?;
        if !options.include_data {
            record.content = None;
        }
        Ok(record)
    }
}
