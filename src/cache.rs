use crate::error::SelectorError;
use crate::options::StorageOptions;
use crate::response::{mime_from_ext, PickResponse};
use base64::Engine;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

pub const CACHE_FILE_PREFIX: &str = "react-native-image-selector_";

/// Writes picked image bytes into the app cache directory
#[derive(Debug, Clone)]
pub struct CacheFileWriter {
    cache_dir: PathBuf,
}

impl CacheFileWriter {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Write `bytes` to a new cache file and describe it
    ///
    /// Uses spawn_blocking to avoid blocking the async runtime.
    pub async fn write(
        &self,
        bytes: Vec<u8>,
        extension: &str,
        storage: &StorageOptions,
    ) -> Result<PickResponse, SelectorError> {
        let cache_dir = self.cache_dir.clone();
        let sub_dir = storage.path.clone();
        let extension = extension.to_string();

        tokio::task::spawn_blocking(move || {
            write_cache_file(&cache_dir, sub_dir.as_deref(), &bytes, &extension)
        })
        .await
        .map_err(|e| SelectorError::FileCreate(format!("Task join error: {}", e)))?
    }
}

/// Directory a file should go to: `cache_dir/sub_dir` when usable, else `cache_dir`
fn target_dir(cache_dir: &Path, sub_dir: Option<&str>) -> PathBuf {
    let Some(sub_dir) = sub_dir.filter(|s| !s.trim().is_empty()) else {
        return cache_dir.to_path_buf();
    };

    let relative = Path::new(sub_dir);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        log::warn!("Ignoring storage path outside the cache directory: {}", sub_dir);
        return cache_dir.to_path_buf();
    }

    let dir = cache_dir.join(relative);
    match std::fs::create_dir_all(&dir) {
        Ok(()) => dir,
        Err(e) => {
            log::warn!("Could not create {}: {}, using cache root", dir.display(), e);
            cache_dir.to_path_buf()
        }
    }
}

fn write_cache_file(
    cache_dir: &Path,
    sub_dir: Option<&str>,
    bytes: &[u8],
    extension: &str,
) -> Result<PickResponse, SelectorError> {
    std::fs::create_dir_all(cache_dir).map_err(|e| {
        SelectorError::FileCreate(format!("Cache dir {}: {}", cache_dir.display(), e))
    })?;

    let extension = if extension.is_empty() { "jpg" } else { extension };
    let file_name = format!("{}{}.{}", CACHE_FILE_PREFIX, uuid::Uuid::new_v4(), extension);
    let path = target_dir(cache_dir, sub_dir).join(&file_name);

    log::debug!("Writing {} bytes to {}", bytes.len(), path.display());

    // Never replace an existing file
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| SelectorError::FileCreate(format!("{}: {}", path.display(), e)))?;
    file.write_all(bytes)
        .map_err(|e| SelectorError::FileCreate(format!("{}: {}", path.display(), e)))?;

    let path_str = path.to_string_lossy().to_string();
    Ok(PickResponse {
        uri: format!("file://{}", path_str),
        path: path_str,
        file_name,
        kind: mime_from_ext(extension),
        file_size: bytes.len() as u64,
        data: Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
    })
}
