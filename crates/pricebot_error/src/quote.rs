//! Quote API error types.
//!
//! Each kind's `Display` text is the message shown to the chat user, so it is
//! phrased for them rather than for the log.

/// Quote fetch failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum QuoteErrorKind {
    /// The API rejected the symbol outright (HTTP 400).
    #[display("Invalid symbol provided")]
    InvalidSymbol,
    /// The API answered but does not know the symbol.
    #[display("Sorry, I could not find the price for {}", _0)]
    UnknownSymbol(String),
    /// API key rejected (HTTP 401).
    #[display("Unauthorized access to the API")]
    Unauthorized,
    /// API key lacks access (HTTP 403).
    #[display("Forbidden access to the API")]
    Forbidden,
    /// Too many requests (HTTP 429).
    #[display("API rate limit exceeded")]
    RateLimited,
    /// The API failed internally (HTTP 5xx).
    #[display("Internal server error on the API")]
    ServerError(u16),
    /// Any other non-success status.
    #[display("An error occurred while retrieving the price data. Status code: {}", _0)]
    UnexpectedStatus(u16),
    /// The body lacked fields the bot needs.
    #[display("{}", _0)]
    MalformedResponse(String),
    /// The request never completed (connect failure, timeout).
    ///
    /// The detail stays out of the reply; it can carry request URLs.
    #[display("Sorry, the price API could not be reached right now")]
    Transport(String),
}

impl QuoteErrorKind {
    /// Classify a non-success HTTP status from the quote API.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricebot_error::QuoteErrorKind;
    ///
    /// assert_eq!(QuoteErrorKind::from_status(429), QuoteErrorKind::RateLimited);
    /// assert_eq!(QuoteErrorKind::from_status(503), QuoteErrorKind::ServerError(503));
    /// ```
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidSymbol,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError(status),
            other => Self::UnexpectedStatus(other),
        }
    }

    /// Whether the failure is attributable to the symbol the user typed.
    pub fn is_symbol_error(&self) -> bool {
        matches!(self, Self::InvalidSymbol | Self::UnknownSymbol(_))
    }
}

/// Quote API error with source location tracking.
///
/// # Examples
///
/// ```
/// use pricebot_error::{QuoteError, QuoteErrorKind};
///
/// let err = QuoteError::new(QuoteErrorKind::UnknownSymbol("NOPE".to_string()));
/// assert_eq!(err.reply_text(), "Sorry, I could not find the price for NOPE");
/// assert!(err.to_string().starts_with("Quote Error:"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Quote Error: {} at line {} in {}", kind, line, file)]
pub struct QuoteError {
    /// The kind of error that occurred
    pub kind: QuoteErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl QuoteError {
    /// Create a new QuoteError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QuoteErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuoteErrorKind {
        &self.kind
    }

    /// Text to send back to the channel.
    pub fn reply_text(&self) -> String {
        self.kind.to_string()
    }
}

impl From<crate::HttpError> for QuoteError {
    #[track_caller]
    fn from(err: crate::HttpError) -> Self {
        match err.status {
            Some(status) => QuoteError::new(QuoteErrorKind::from_status(status)),
            None => QuoteError::new(QuoteErrorKind::Transport(err.message)),
        }
    }
}
