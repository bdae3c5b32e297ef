//! Historical price charts for pricebot.
//!
//! [`ChartRenderer`] draws a price series with plotters into a temporary PNG
//! and publishes it through an [`ImageHost`] (Imgur in production).

#![warn(missing_docs)]

mod render;
mod renderer;
mod settings;
mod upload;

pub use render::{chart_title, render_chart};
pub use renderer::ChartRenderer;
pub use settings::ChartSettings;
pub use upload::{IMGUR_UPLOAD_URL, ImageHost, ImgurClient, parse_upload_response};
