/// Error type for store-level pager failures
///
/// Item-level problems (missing size, unresolvable URI, unreadable content)
/// never surface here; they degrade to empty fields on the item instead.
#[derive(Debug)]
pub enum PagerError {
    DatabaseError(rusqlite::Error),
    IoError(std::io::Error),
    IndexOutOfRange { index: usize, count: usize },
    Unavailable(String),
    Other(String),
}

impl std::fmt::Display for PagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PagerError::DatabaseError(e) => write!(f, "Database error: {}", e),
            PagerError::IoError(e) => write!(f, "IO error: {}", e),
            PagerError::IndexOutOfRange { index, count } => write!(
                f,
                "Asset index {} out of range (library holds {} assets)",
                index, count
            ),
            PagerError::Unavailable(msg) => write!(f, "Asset store unavailable: {}", msg),
            PagerError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PagerError {}

impl From<rusqlite::Error> for PagerError {
    fn from(err: rusqlite::Error) -> Self {
        PagerError::DatabaseError(err)
    }
}

impl From<std::io::Error> for PagerError {
    fn from(err: std::io::Error) -> Self {
        PagerError::IoError(err)
    }
}

/// Result type for pager operations
pub type PagerResult<T> = Result<T, PagerError>;
