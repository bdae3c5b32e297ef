//! Image hosting.

use async_trait::async_trait;
use pricebot_error::{ChartError, ChartErrorKind, HttpError};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Imgur anonymous image upload endpoint.
pub const IMGUR_UPLOAD_URL: &str = "https://api.imgur.com/3/image";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes rendered charts and returns their public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload PNG bytes, returning the public link.
    async fn upload_png(&self, png: Vec<u8>) -> Result<String, ChartError>;
}

#[derive(Debug, Deserialize)]
struct ImgurResponse {
    data: ImgurImage,
}

#[derive(Debug, Deserialize)]
struct ImgurImage {
    #[serde(default)]
    link: Option<String>,
}

/// Extract `data.link` from an Imgur upload response.
///
/// # Examples
///
/// ```
/// use pricebot_chart::parse_upload_response;
///
/// let body = r#"{"data": {"id": "abc", "link": "https://i.imgur.com/abc.png"}, "success": true, "status": 200}"#;
/// assert_eq!(parse_upload_response(body).unwrap(), "https://i.imgur.com/abc.png");
/// ```
pub fn parse_upload_response(body: &str) -> Result<String, ChartError> {
    let response: ImgurResponse = serde_json::from_str(body)
        .map_err(|e| ChartError::new(ChartErrorKind::Upload(format!("unreadable response: {}", e))))?;
    response
        .data
        .link
        .filter(|link| !link.is_empty())
        .ok_or_else(|| ChartError::new(ChartErrorKind::Upload("response has no link".to_string())))
}

/// Imgur client implementing [`ImageHost`] with client-id authentication.
pub struct ImgurClient {
    client: Client,
    client_id: String,
    endpoint: String,
}

impl ImgurClient {
    /// Create a client with the default timeout.
    pub fn new(client_id: String) -> Self {
        Self::with_timeout(client_id, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(client_id: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_client(client, client_id)
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client, client_id: String) -> Self {
        Self {
            client,
            client_id,
            endpoint: IMGUR_UPLOAD_URL.to_string(),
        }
    }

    /// Point the client at another upload endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ImageHost for ImgurClient {
    #[instrument(skip(self, png), fields(bytes = png.len(), endpoint = %self.endpoint))]
    async fn upload_png(&self, png: Vec<u8>) -> Result<String, ChartError> {
        let image = Part::bytes(png)
            .file_name("chart.png")
            .mime_str("image/png")
            .map_err(HttpError::from)?;
        let form = Form::new().part("image", image).text("type", "file");

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await
            .map_err(HttpError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(HttpError::from)?;
        if !status.is_success() {
            return Err(ChartError::new(ChartErrorKind::Upload(format!(
                "image host returned HTTP {}",
                status.as_u16()
            ))));
        }

        let link = parse_upload_response(&body)?;
        debug!(link = %link, "Uploaded chart");
        Ok(link)
    }
}
