//! HTTP transport error types.

/// HTTP error for requests that never produced a usable response.
///
/// Carries the requested URL (without query string) and, when the server
/// answered, the status code.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} ({}) at line {} in {}", message, url, line, file)]
pub struct HttpError {
    /// The underlying error message
    pub message: String,
    /// Endpoint that was requested
    pub url: String,
    /// Status code, if the server responded
    pub status: Option<u16>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError for `url` at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricebot_error::HttpError;
    ///
    /// let err = HttpError::new("https://api.imgur.com/3/image", "Connection refused");
    /// assert!(err.message.contains("Connection refused"));
    /// assert!(err.status.is_none());
    /// ```
    #[track_caller]
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            url: url.into(),
            status: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attach the response status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for HttpError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| format!("{}{}", u.origin().ascii_serialization(), u.path()))
            .unwrap_or_default();
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        let http = HttpError::new(url, message);
        match err.status() {
            Some(status) => http.with_status(status.as_u16()),
            None => http,
        }
    }
}
