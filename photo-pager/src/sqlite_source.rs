use crate::error::{PagerError, PagerResult};
use crate::models::{AssetLocator, AssetRecord, ResolveOptions};
use crate::source::AssetSource;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Asset source backed by the `gallery_assets` index table
///
/// Files referenced by `relative_path` live under `storage_path`.
pub struct SqliteAssetSource {
    conn: Mutex<Connection>,
    storage_path: PathBuf,
}

impl SqliteAssetSource {
    /// The schema must already be initialized on `conn`.
    pub fn new(conn: Connection, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            conn: Mutex::new(conn),
            storage_path: storage_path.into(),
        }
    }

    fn lock_conn(&self) -> PagerResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PagerError::Unavailable("database connection poisoned".to_string()))
    }

    /// Returns the absolute path for a file stored under the storage root
    pub fn absolute_path(&self, relative_path: &str) -> PathBuf {
        if self.storage_path.as_os_str().is_empty() {
            PathBuf::from(relative_path)
        } else {
            self.storage_path.join(relative_path)
        }
    }

    /// Run `f` against the underlying connection (e.g. to register assets)
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> PagerResult<T> {
        let conn = self.lock_conn()?;
        Ok(f(&conn)?)
    }
}

struct AssetRow {
    uuid: String,
    file_name: String,
    relative_path: Option<String>,
    content_uri: Option<String>,
    byte_size: Option<i64>,
    created_at: DateTime<Utc>,
}

impl AssetSource for SqliteAssetSource {
    fn count(&self) -> PagerResult<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM gallery_assets WHERE deleted = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn fetch(&self, index: usize, options: ResolveOptions) -> PagerResult<AssetRecord> {
        let row = {
            let conn = self.lock_conn()?;
            conn.query_row(
                "SELECT uuid, file_name, relative_path, content_uri, byte_size, created_at
                 FROM gallery_assets
                 WHERE deleted = 0
                 ORDER BY created_at DESC, uuid ASC
                 LIMIT 1 OFFSET ?1",
                params![index as i64],
                |row| {
                    Ok(AssetRow {
                        uuid: row.get(0)?,
                        file_name: row.get(1)?,
                        relative_path: row.get(2)?,
                        content_uri: row.get(3)?,
                        byte_size: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()?
        };

        let Some(row) = row else {
            return Err(PagerError::IndexOutOfRange {
                index,
                count: self.count()?,
            });
        };

        let local_path = row
            .relative_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| self.absolute_path(p));

        let locator = match (&local_path, row.content_uri) {
            (Some(path), _) => Some(AssetLocator::LocalPath(path.clone())),
            (None, Some(uri)) if !uri.is_empty() => Some(AssetLocator::ContentUri(uri)),
            _ => None,
        };

        let byte_size = row
            .byte_size
            .map(|s| s as u64)
            .or_else(|| local_path.as_deref().and_then(file_len));

        let content = if options.include_data {
            local_path.as_deref().and_then(read_content)
        } else {
            None
        };

        Ok(AssetRecord {
            identifier: row.uuid,
            created_at: row.created_at,
            byte_size,
            file_name: row.file_name,
            locator,
            content,
        })
    }
}

fn file_len(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

fn read_content(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Failed to read asset content {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{init_asset_schema, mark_asset_deleted, upsert_asset, NewAsset};
    use chrono::{Duration, TimeZone};

    fn asset(uuid: &str, age_minutes: i64, relative_path: Option<&str>) -> NewAsset {
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        NewAsset {
            uuid: uuid.to_string(),
            file_name: format!("{}.jpg", uuid),
            relative_path: relative_path.map(|p| p.to_string()),
            content_uri: None,
            byte_size: None,
            created_at: base - Duration::minutes(age_minutes),
        }
    }

    fn source(storage: &Path) -> SqliteAssetSource {
        let conn = Connection::open_in_memory().unwrap();
        init_asset_schema(&conn).unwrap();
        SqliteAssetSource::new(conn, storage)
    }

    #[test]
    fn test_newest_first_and_deleted_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(dir.path());
        source
            .with_connection(|conn| {
                upsert_asset(conn, &asset("old", 60, None))?;
                upsert_asset(conn, &asset("newest", 1, None))?;
                upsert_asset(conn, &asset("middle", 30, None))?;
                upsert_asset(conn, &asset("gone", 5, None))?;
                mark_asset_deleted(conn, "gone")?;
                Ok(())
            })
            .unwrap();

        assert_eq!(source.count().unwrap(), 3);
        let ids: Vec<String> = (0..3)
            .map(|i| source.fetch(i, ResolveOptions::default()).unwrap().identifier)
            .collect();
        assert_eq!(ids, vec!["newest", "middle", "old"]);
    }

    #[test]
    fn test_local_file_resolution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.jpg"), b"jpegbytes").unwrap();
        let source = source(dir.path());
        source
            .with_connection(|conn| upsert_asset(conn, &asset("pic", 1, Some("pic.jpg"))))
            .unwrap();

        let record = source
            .fetch(0, ResolveOptions { include_data: true })
            .unwrap();
        assert_eq!(
            record.locator,
            Some(AssetLocator::LocalPath(dir.path().join("pic.jpg")))
        );
        assert_eq!(record.byte_size, Some(9));
        assert_eq!(record.content.as_deref(), Some(&b"jpegbytes"[..]));

        let light = source.fetch(0, ResolveOptions::default()).unwrap();
        assert!(light.content.is_none());
    }

    #[test]
    fn test_missing_file_degrades_to_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(dir.path());
        source
            .with_connection(|conn| upsert_asset(conn, &asset("lost", 1, Some("lost.jpg"))))
            .unwrap();

        let record = source
            .fetch(0, ResolveOptions { include_data: true })
            .unwrap();
        assert!(record.byte_size.is_none());
        assert!(record.content.is_none());
        assert!(record.locator.is_some());
    }

    #[test]
    fn test_content_uri_locator() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(dir.path());
        let mut remote = asset("remote", 1, None);
        remote.content_uri = Some("content://media/external/images/media/7".to_string());
        remote.byte_size = Some(512);
        source
            .with_connection(|conn| upsert_asset(conn, &remote))
            .unwrap();

        let record = source.fetch(0, ResolveOptions::default()).unwrap();
        assert_eq!(
            record.locator,
            Some(AssetLocator::ContentUri(
                "content://media/external/images/media/7".to_string()
            ))
        );
        assert_eq!(record.byte_size, Some(512));
    }

    #[test]
    fn test_out_of_range_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(dir.path());
        let err = source.fetch(0, ResolveOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PagerError::IndexOutOfRange { index: 0, count: 0 }
        ));
    }
}
