//! Single-shot camera and library requests
//!
//! A [`PickerSession`] asks the platform for permission, launches the native
//! picker and copies the chosen image into the cache directory. Only one request
//! per session runs at a time.

#[cfg(target_os = "android")]
pub(crate) mod android;

#[cfg(target_os = "android")]
pub use android::{AndroidPicker, AndroidPickerConfig};

use crate::cache::CacheFileWriter;
use crate::error::SelectorError;
use crate::options::SelectorOptions;
use crate::response::PickOutcome;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSource {
    Camera,
    Library,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    NotDetermined,
    Denied,
}

/// Native camera / photo library access
///
/// All methods block and are called from the blocking thread pool.
pub trait PlatformPicker: Send + Sync + 'static {
    fn permission_status(&self, source: PickSource) -> Result<PermissionStatus, SelectorError>;

    /// Ask the user for access; returns whether it was granted
    fn request_permission(&self, source: PickSource) -> Result<bool, SelectorError>;

    /// Show the picker; `None` when the user cancelled
    fn launch(&self, source: PickSource) -> Result<Option<PathBuf>, SelectorError>;
}

/// Picker for platforms without camera or photo library
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedPicker;

impl PlatformPicker for UnsupportedPicker {
    fn permission_status(&self, source: PickSource) -> Result<PermissionStatus, SelectorError> {
        Err(SelectorError::Unsupported(format!(
            "{:?} not available on this platform",
            source
        )))
    }

    fn request_permission(&self, _source: PickSource) -> Result<bool, SelectorError> {
        Ok(false)
    }

    fn launch(&self, source: PickSource) -> Result<Option<PathBuf>, SelectorError> {
        Err(SelectorError::Unsupported(format!(
            "{:?} not available on this platform",
            source
        )))
    }
}

/// Picker backend for the current platform
#[cfg(target_os = "android")]
pub fn platform_picker() -> Arc<dyn PlatformPicker> {
    Arc::new(AndroidPicker::default())
}

/// Picker backend for the current platform
#[cfg(not(target_os = "android"))]
pub fn platform_picker() -> Arc<dyn PlatformPicker> {
    Arc::new(UnsupportedPicker)
}

/// Marks a session busy until dropped
pub(crate) struct RequestGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RequestGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct PickerSession {
    picker: Arc<dyn PlatformPicker>,
    writer: CacheFileWriter,
    options: SelectorOptions,
    in_flight: AtomicBool,
}

impl PickerSession {
    pub fn new(
        picker: Arc<dyn PlatformPicker>,
        writer: CacheFileWriter,
        options: SelectorOptions,
    ) -> Self {
        Self {
            picker,
            writer,
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Pick one image from the camera or the photo library
    pub async fn pick(&self, source: PickSource) -> Result<PickOutcome, SelectorError> {
        let Some(_guard) = RequestGuard::acquire(&self.in_flight) else {
            log::warn!("Rejected {:?} request, another one is in progress", source);
            return Err(SelectorError::RequestInProgress);
        };

        log::info!("Starting {:?} request", source);

        let picker = self.picker.clone();
        let picked = tokio::task::spawn_blocking(move || launch_with_permission(&*picker, source))
            .await
            .map_err(|e| SelectorError::FailToPick(format!("Task join error: {}", e)))??;

        let Some(path) = picked else {
            log::info!("{:?} request cancelled", source);
            return Ok(PickOutcome::Cancelled);
        };

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SelectorError::NotValidPath(format!("{}: {}", path.display(), e)))?;

        let response = self
            .writer
            .write(bytes, &extension_of(&path), &self.options.storage_options)
            .await?;

        log::info!("Picked image saved to {}", response.path);
        Ok(PickOutcome::Picked(response))
    }
}

fn launch_with_permission(
    picker: &dyn PlatformPicker,
    source: PickSource,
) -> Result<Option<PathBuf>, SelectorError> {
    let granted = match picker.permission_status(source)? {
        PermissionStatus::Granted => true,
        PermissionStatus::NotDetermined => picker.request_permission(source)?,
        PermissionStatus::Denied => false,
    };

    if !granted {
        return Err(match source {
            PickSource::Camera => SelectorError::CameraPermissionDenied,
            PickSource::Library => SelectorError::LibraryPermissionDenied,
        });
    }

    picker.launch(source)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "jpg".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::PickResponse;
    use std::sync::Mutex;
    use std::time::Duration;

    struct FakePicker {
        status: PermissionStatus,
        grant_on_request: bool,
        result: Mutex<Option<PathBuf>>,
        delay: Duration,
        requests: Mutex<Vec<PickSource>>,
    }

    impl FakePicker {
        fn new(status: PermissionStatus, result: Option<PathBuf>) -> Self {
            Self {
                status,
                grant_on_request: true,
                result: Mutex::new(result),
                delay: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl PlatformPicker for FakePicker {
        fn permission_status(&self, _source: PickSource) -> Result<PermissionStatus, SelectorError> {
            Ok(self.status)
        }

        fn request_permission(&self, source: PickSource) -> Result<bool, SelectorError> {
            self.requests.lock().unwrap().push(source);
            Ok(self.grant_on_request)
        }

        fn launch(&self, _source: PickSource) -> Result<Option<PathBuf>, SelectorError> {
            std::thread::sleep(self.delay);
            Ok(self.result.lock().unwrap().clone())
        }
    }

    fn session(picker: FakePicker, cache: &Path) -> (Arc<FakePicker>, PickerSession) {
        let picker = Arc::new(picker);
        let session = PickerSession::new(
            picker.clone(),
            CacheFileWriter::new(cache),
            SelectorOptions::default(),
        );
        (picker, session)
    }

    fn picked(outcome: PickOutcome) -> PickResponse {
        match outcome {
            PickOutcome::Picked(response) => response,
            PickOutcome::Cancelled => panic!("expected a picked image"),
        }
    }

    #[tokio::test]
    async fn test_granted_library_pick_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let source_file = dir.path().join("IMG_0001.PNG");
        std::fs::write(&source_file, b"png-bytes").unwrap();

        let (_, session) = session(
            FakePicker::new(PermissionStatus::Granted, Some(source_file)),
            &dir.path().join("cache"),
        );

        let response = picked(session.pick(PickSource::Library).await.unwrap());
        assert_eq!(response.kind, "image/png");
        assert_eq!(response.file_size, 9);
        assert_eq!(std::fs::read(&response.path).unwrap(), b"png-bytes");
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_not_determined_requests_permission() {
        let dir = tempfile::tempdir().unwrap();
        let source_file = dir.path().join("shot.jpg");
        std::fs::write(&source_file, b"jpg").unwrap();

        let (picker, session) = session(
            FakePicker::new(PermissionStatus::NotDetermined, Some(source_file)),
            dir.path(),
        );

        let outcome = session.pick(PickSource::Camera).await.unwrap();
        assert_eq!(picked(outcome).kind, "image/jpeg");
        assert_eq!(*picker.requests.lock().unwrap(), vec![PickSource::Camera]);
    }

    #[tokio::test]
    async fn test_denied_permission_codes() {
        let dir = tempfile::tempdir().unwrap();
        let (_, session) = session(FakePicker::new(PermissionStatus::Denied, None), dir.path());

        let err = session.pick(PickSource::Camera).await.unwrap_err();
        assert_eq!(err.to_response().code, 100);
        let err = session.pick(PickSource::Library).await.unwrap_err();
        assert_eq!(err.to_response().code, 101);
    }

    #[tokio::test]
    async fn test_request_refused_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let mut picker = FakePicker::new(PermissionStatus::NotDetermined, None);
        picker.grant_on_request = false;
        let (_, session) = session(picker, dir.path());

        let err = session.pick(PickSource::Library).await.unwrap_err();
        assert!(matches!(err, SelectorError::LibraryPermissionDenied));
    }

    #[tokio::test]
    async fn test_cancelled_pick() {
        let dir = tempfile::tempdir().unwrap();
        let (_, session) = session(FakePicker::new(PermissionStatus::Granted, None), dir.path());

        let outcome = session.pick(PickSource::Library).await.unwrap();
        assert!(outcome.is_cancelled());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_valid_path() {
        let dir = tempfile::tempdir().unwrap();
        let (_, session) = session(
            FakePicker::new(
                PermissionStatus::Granted,
                Some(dir.path().join("does-not-exist.jpg")),
            ),
            dir.path(),
        );

        let err = session.pick(PickSource::Library).await.unwrap_err();
        assert_eq!(err.to_response().code, 105);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_unsupported_platform() {
        let dir = tempfile::tempdir().unwrap();
        let session = PickerSession::new(
            Arc::new(UnsupportedPicker),
            CacheFileWriter::new(dir.path()),
            SelectorOptions::default(),
        );

        let err = session.pick(PickSource::Camera).await.unwrap_err();
        assert_eq!(err.to_response().code, 102);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_request_rejected_while_busy() {
        let dir = tempfile::tempdir().unwrap();
        let source_file = dir.path().join("slow.jpg");
        std::fs::write(&source_file, b"slow").unwrap();

        let mut picker = FakePicker::new(PermissionStatus::Granted, Some(source_file));
        picker.delay = Duration::from_millis(200);
        let (_, session) = session(picker, dir.path());
        let session = Arc::new(session);

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.pick(PickSource::Library).await })
        };
        while !session.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let err = session.pick(PickSource::Library).await.unwrap_err();
        assert!(matches!(err, SelectorError::RequestInProgress));

        let outcome = first.await.unwrap().unwrap();
        assert_eq!(picked(outcome).file_size, 4);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("/a/b.HEIC")), "heic");
        assert_eq!(extension_of(Path::new("/a/noext")), "jpg");
    }
}
