//! Chart rendering and upload error types.

/// Chart pipeline failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ChartErrorKind {
    /// Drawing the chart failed.
    #[display("Failed to render chart: {}", _0)]
    Render(String),
    /// The transient chart file could not be created, written or read.
    #[display("Chart file error: {}", _0)]
    Io(String),
    /// The image host rejected or garbled the upload.
    #[display("Chart upload failed: {}", _0)]
    Upload(String),
    /// The blocking render task panicked or was cancelled.
    #[display("Chart render task failed: {}", _0)]
    Join(String),
}

/// Chart error with location tracking.
///
/// # Examples
///
/// ```
/// use pricebot_error::{ChartError, ChartErrorKind};
///
/// let err = ChartError::new(ChartErrorKind::Upload("HTTP 403".to_string()));
/// assert!(err.to_string().contains("Chart upload failed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Chart Error: {} at line {} in {}", kind, line, file)]
pub struct ChartError {
    /// The kind of error that occurred
    pub kind: ChartErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ChartError {
    /// Create a new ChartError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ChartErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ChartErrorKind {
        &self.kind
    }
}

impl From<std::io::Error> for ChartError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        ChartError::new(ChartErrorKind::Io(err.to_string()))
    }
}

impl From<crate::HttpError> for ChartError {
    #[track_caller]
    fn from(err: crate::HttpError) -> Self {
        ChartError::new(ChartErrorKind::Upload(err.to_string()))
    }
}
