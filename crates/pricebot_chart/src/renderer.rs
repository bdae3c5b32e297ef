//! Render-then-upload pipeline.

use crate::{ChartSettings, ImageHost, chart_title, render_chart};
use pricebot_error::{ChartError, ChartErrorKind};
use pricebot_market::HistoricalSeries;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Turns price history into a hosted chart URL.
///
/// Each call renders into its own temporary PNG, which is deleted before the
/// call returns whether or not the upload succeeds.
pub struct ChartRenderer {
    host: Arc<dyn ImageHost>,
    settings: ChartSettings,
}

impl ChartRenderer {
    /// Create a renderer uploading to `host`.
    pub fn new(host: Arc<dyn ImageHost>, settings: ChartSettings) -> Self {
        Self { host, settings }
    }

    /// Chart settings in use.
    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Render `series` and upload it, returning the public URL.
    ///
    /// Returns `Ok(None)` ("no chart") when history is unavailable or empty.
    ///
    /// # Errors
    ///
    /// Render, file or upload failures.
    #[instrument(skip(self, series), fields(available = series.is_some()))]
    pub async fn render_and_upload(
        &self,
        name: &str,
        days: u32,
        series: Option<HistoricalSeries>,
    ) -> Result<Option<String>, ChartError> {
        let Some(series) = series.filter(|s| !s.is_empty()) else {
            debug!("No history, skipping chart");
            return Ok(None);
        };

        let png = self.render_png(series, chart_title(name, days)).await?;
        let url = self.host.upload_png(png).await?;
        Ok(Some(url))
    }

    /// Render `series` to PNG bytes via a scoped temporary file.
    pub async fn render_png(
        &self,
        series: HistoricalSeries,
        title: String,
    ) -> Result<Vec<u8>, ChartError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pricebot-chart-").suffix(".png");
        let file = match self.settings.temp_dir() {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let path = file.path().to_path_buf();
        debug!(path = %path.display(), "Rendering chart");

        let settings = self.settings.clone();
        let render_path = path.clone();
        tokio::task::spawn_blocking(move || render_chart(&series, &title, &settings, &render_path))
            .await
            .map_err(|e| ChartError::new(ChartErrorKind::Join(e.to_string())))??;

        let png = tokio::fs::read(&path).await?;
        drop(file);
        Ok(png)
    }
}
