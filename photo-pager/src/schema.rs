use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

/// Initialize the asset index schema
pub fn init_asset_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS asset_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT version FROM asset_schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_asset_schema_v1(conn)?;
        conn.execute("INSERT INTO asset_schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Create asset index schema version 1
fn create_asset_schema_v1(conn: &Connection) -> Result<()> {
    // Either relative_path (under the storage root) or content_uri locates the bytes
    conn.execute(
        "CREATE TABLE IF NOT EXISTS gallery_assets (
            uuid TEXT PRIMARY KEY,
            file_name TEXT NOT NULL,
            relative_path TEXT,
            content_uri TEXT,
            byte_size INTEGER,
            created_at TEXT NOT NULL,
            deleted INTEGER NOT NULL DEFAULT 0 CHECK(deleted IN (0,1))
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_gallery_assets_created ON gallery_assets(created_at DESC, uuid)",
        [],
    )?;

    Ok(())
}

/// Row to register in the asset index
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub uuid: String,
    pub file_name: String,
    pub relative_path: Option<String>,
    pub content_uri: Option<String>,
    pub byte_size: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Register an asset (or refresh an existing one with the same uuid)
pub fn upsert_asset(conn: &Connection, asset: &NewAsset) -> Result<()> {
    conn.execute(
        "INSERT INTO gallery_assets (uuid, file_name, relative_path, content_uri, byte_size, created_at, deleted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
         ON CONFLICT(uuid) DO UPDATE SET
            file_name = excluded.file_name,
            relative_path = excluded.relative_path,
            content_uri = excluded.content_uri,
            byte_size = excluded.byte_size,
            created_at = excluded.created_at,
            deleted = 0",
        params![
            asset.uuid,
            asset.file_name,
            asset.relative_path,
            asset.content_uri,
            asset.byte_size.map(|s| s as i64),
            asset.created_at,
        ],
    )?;
    Ok(())
}

/// Hide an asset from the gallery; returns whether a row was affected
pub fn mark_asset_deleted(conn: &Connection, uuid: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE gallery_assets SET deleted = 1 WHERE uuid = ?1",
        params![uuid],
    )?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        init_asset_schema(&conn).unwrap();
        init_asset_schema(&conn).unwrap();

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM asset_schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_upsert_and_delete() {
        let conn = Connection::open_in_memory().unwrap();
        init_asset_schema(&conn).unwrap();

        let mut asset = NewAsset {
            uuid: "a1".to_string(),
            file_name: "a.jpg".to_string(),
            relative_path: Some("a.jpg".to_string()),
            content_uri: None,
            byte_size: Some(10),
            created_at: Utc::now(),
        };
        upsert_asset(&conn, &asset).unwrap();
        asset.byte_size = Some(20);
        upsert_asset(&conn, &asset).unwrap();

        let size: i64 = conn
            .query_row("SELECT byte_size FROM gallery_assets WHERE uuid = 'a1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(size, 20);

        assert!(mark_asset_deleted(&conn, "a1").unwrap());
        assert!(!mark_asset_deleted(&conn, "missing").unwrap());
    }
}
