//! Configuration error types.

/// Specific configuration failures. All of them are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A required credential was absent or empty.
    #[display("{} is missing. Set it in the environment or a .env file", _0)]
    MissingCredential(&'static str),
    /// A configuration source could not be read.
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// A configuration value was present but unusable.
    #[display("Invalid configuration value for '{}': {}", field, reason)]
    Invalid {
        /// Dotted path of the offending setting
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// What went wrong
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricebot_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::new(ConfigErrorKind::MissingCredential("CMC_API_KEY"));
    /// assert!(err.to_string().contains("CMC_API_KEY is missing"));
    /// ```
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
