//! Historical data error types.
//!
//! Unavailable history is not fatal: fetchers report it so the cache can
//! skip storing it, and callers then degrade to "no chart".

/// Reasons historical data could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HistoryErrorKind {
    /// The data source answered with a non-success status.
    #[display("History source returned HTTP {}", _0)]
    Status(u16),
    /// The request never completed.
    #[display("History source unreachable: {}", _0)]
    Transport(String),
    /// The body could not be decoded into a price series.
    #[display("History response unreadable: {}", _0)]
    Parse(String),
    /// The request itself made no sense (e.g. zero days).
    #[display("Invalid history request: {}", _0)]
    InvalidRequest(String),
}

/// Historical data error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("History Error: {} at line {} in {}", kind, line, file)]
pub struct HistoryError {
    /// The kind of error that occurred
    pub kind: HistoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl HistoryError {
    /// Create a new HistoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HistoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HistoryErrorKind {
        &self.kind
    }
}
