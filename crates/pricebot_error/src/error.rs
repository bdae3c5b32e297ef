//! Top-level error wrapper types.

use crate::{ChartError, ConfigError, HistoryError, HttpError, QuoteError};

/// Every failure the bot can surface, one variant per concern.
///
/// # Examples
///
/// ```
/// use pricebot_error::{PricebotError, QuoteError, QuoteErrorKind};
///
/// let quote_err = QuoteError::new(QuoteErrorKind::Forbidden);
/// let err: PricebotError = quote_err.into();
/// assert!(format!("{}", err).contains("Forbidden access"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PricebotErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Quote API error
    #[from(QuoteError)]
    Quote(QuoteError),
    /// Historical data error
    #[from(HistoryError)]
    History(HistoryError),
    /// Chart render or upload error
    #[from(ChartError)]
    Chart(ChartError),
}

/// Pricebot error with kind discrimination.
///
/// # Examples
///
/// ```
/// use pricebot_error::{ConfigError, ConfigErrorKind, PricebotResult};
///
/// fn startup() -> PricebotResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::MissingCredential("DISCORD_TOKEN")))?
/// }
///
/// assert!(startup().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Pricebot Error: {}", _0)]
pub struct PricebotError(Box<PricebotErrorKind>);

impl PricebotError {
    /// Create a new error from a kind.
    pub fn new(kind: PricebotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PricebotErrorKind {
        &self.0
    }
}

impl<T> From<T> for PricebotError
where
    T: Into<PricebotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for pricebot operations.
pub type PricebotResult<T> = std::result::Result<T, PricebotError>;
