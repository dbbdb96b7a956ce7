use std::path::PathBuf;

#[cfg(target_os = "android")]
fn android_cache_dir() -> Result<PathBuf, crate::error::SelectorError> {
    use crate::picker::android::{attach_vm, jni_err};
    use jni::objects::JObject;

    let vm = attach_vm()?;
    let mut env = vm
        .attach_current_thread()
        .map_err(jni_err("JNI attach failed"))?;
    let context = unsafe { JObject::from_raw(ndk_context::android_context().context().cast()) };

    let cache_dir = env
        .call_method(&context, "getCacheDir", "()Ljava/io/File;", &[])
        .and_then(|v| v.l())
        .map_err(jni_err("getCacheDir failed"))?;
    let abs_path = env
        .call_method(&cache_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .map_err(jni_err("getAbsolutePath failed"))?;
    let path: String = env
        .get_string((&abs_path).into())
        .map_err(jni_err("String conversion failed"))?
        .into();

    Ok(PathBuf::from(path))
}

/// Get the cache directory for picked images on the current platform
pub fn default_cache_dir() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        match android_cache_dir() {
            Ok(dir) => return dir,
            Err(e) => log::warn!("Could not resolve the app cache dir ({}), using temp dir", e),
        }
    }

    std::env::temp_dir().join("image-selector")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_desktop_cache_dir_under_temp() {
        let dir = default_cache_dir();
        assert!(dir.starts_with(std::env::temp_dir()));
        assert!(dir.ends_with("image-selector"));
    }
}
