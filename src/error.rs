use photo_pager::PagerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    CameraPermissionDenied = 100,
    LibraryPermissionDenied = 101,
    SimulatorError = 102,
    SourceTypeMismatch = 103,
    FileCreateError = 104,
    NotValidPath = 105,
    FailToPickImage = 106,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::CameraPermissionDenied => "CAMERA_PERMISSION_DENIED",
            ErrorCode::LibraryPermissionDenied => "LIBRARY_PERMISSION_DENIED",
            ErrorCode::SimulatorError => "SIMULATOR_ERROR",
            ErrorCode::SourceTypeMismatch => "SOURCE_TYPE_MISMATCH",
            ErrorCode::FileCreateError => "FILE_CREATE_ERROR",
            ErrorCode::NotValidPath => "NOT_VALID_PATH",
            ErrorCode::FailToPickImage => "FAIL_TO_PICK_IMAGE",
        }
    }
}

/// `{code, message}` as delivered to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

/// Central error type for picker and gallery requests
#[derive(Debug)]
pub enum SelectorError {
    CameraPermissionDenied,
    LibraryPermissionDenied,
    /// No camera or picker on this platform (simulator, desktop)
    Unsupported(String),
    SourceTypeMismatch,
    /// Writing the cache file failed
    FileCreate(String),
    /// The picked file could not be read
    NotValidPath(String),
    /// The platform picker failed or timed out
    FailToPick(String),
    /// Another request on the same session has not completed yet
    RequestInProgress,
    /// The asset store failed while paging
    Pager(PagerError),
    /// Options could not be parsed
    Options(String),
    Io(std::io::Error),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SelectorError::CameraPermissionDenied => write!(f, "Camera permission denied"),
            SelectorError::LibraryPermissionDenied => write!(f, "Photo library permission denied"),
            SelectorError::Unsupported(msg) => write!(f, "Platform not supported: {}", msg),
            SelectorError::SourceTypeMismatch => write!(f, "Picker returned an unexpected source type"),
            SelectorError::FileCreate(msg) => write!(f, "File create error: {}", msg),
            SelectorError::NotValidPath(msg) => write!(f, "Not a valid path: {}", msg),
            SelectorError::FailToPick(msg) => write!(f, "Failed to pick image: {}", msg),
            SelectorError::RequestInProgress => write!(f, "Another request is still in progress"),
            SelectorError::Pager(e) => write!(f, "Gallery error: {}", e),
            SelectorError::Options(msg) => write!(f, "Invalid options: {}", msg),
            SelectorError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for SelectorError {}

impl From<PagerError> for SelectorError {
    fn from(e: PagerError) -> Self {
        SelectorError::Pager(e)
    }
}

impl From<std::io::Error> for SelectorError {
    fn from(e: std::io::Error) -> Self {
        SelectorError::Io(e)
    }
}

impl SelectorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SelectorError::CameraPermissionDenied => ErrorCode::CameraPermissionDenied,
            SelectorError::LibraryPermissionDenied => ErrorCode::LibraryPermissionDenied,
            SelectorError::Unsupported(_) => ErrorCode::SimulatorError,
            SelectorError::SourceTypeMismatch => ErrorCode::SourceTypeMismatch,
            SelectorError::FileCreate(_) | SelectorError::Io(_) => ErrorCode::FileCreateError,
            SelectorError::NotValidPath(_) => ErrorCode::NotValidPath,
            SelectorError::FailToPick(_)
            | SelectorError::RequestInProgress
            | SelectorError::Pager(_)
            | SelectorError::Options(_) => ErrorCode::FailToPickImage,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let code = self.code();
        ErrorResponse {
            code: code as i32,
            message: code.message().to_string(),
        }
    }

    /// User-friendly error messages for UI
    pub fn user_message(&self) -> String {
        match self {
            SelectorError::CameraPermissionDenied => {
                "Camera access is required. Please allow it in the settings.".to_string()
            }
            SelectorError::LibraryPermissionDenied => {
                "Photo library access is required. Please allow it in the settings.".to_string()
            }
            SelectorError::Unsupported(_) => "This device has no camera.".to_string(),
            SelectorError::RequestInProgress => "Please wait for the current selection.".to_string(),
            SelectorError::Pager(_) => "The photo library could not be loaded.".to_string(),
            _ => "The image could not be loaded. Please try again.".to_string(),
        }
    }
}
