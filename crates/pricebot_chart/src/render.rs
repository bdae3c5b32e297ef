//! Line chart drawing.

use crate::ChartSettings;
use chrono::DateTime;
use plotters::prelude::*;
use plotters::style::FontStyle;
use pricebot_error::{ChartError, ChartErrorKind};
use pricebot_market::{HistoricalSeries, format_price};
use std::path::Path;
use std::sync::OnceLock;

const BACKGROUND: RGBColor = RGBColor(0x36, 0x39, 0x3F);
const TEXT: RGBColor = RGBColor(0xD8, 0xD8, 0xD8);
const GRID: RGBColor = RGBColor(0x50, 0x50, 0x50);
const PRICE_LINE: RGBColor = RGBColor(0xFF, 0xA5, 0x00);
const CURRENT_PRICE_LINE: RGBColor = RGBColor(0xAD, 0xD8, 0xE6);

const FONT_FAMILY: &str = "sans-serif";
const ONE_DAY_MS: f64 = 86_400_000.0;

/// Outcome of the one-time font registration, keyed to the first path tried.
static FONT_LOADED: OnceLock<bool> = OnceLock::new();

fn render_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::new(ChartErrorKind::Render(e.to_string()))
}

/// Register the label font. Returns whether text can be drawn.
fn ensure_font(path: &Path) -> bool {
    *FONT_LOADED.get_or_init(|| {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Chart font unreadable, drawing without text");
                return false;
            }
        };
        // Registered fonts live for the whole process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Registered chart font");
                true
            }
            Err(_) => {
                tracing::warn!(path = %path.display(), "Chart font invalid, drawing without text");
                false
            }
        }
    })
}

fn format_date_label(x: &f64) -> String {
    DateTime::from_timestamp_millis(*x as i64)
        .map(|d| d.format("%d-%b").to_string())
        .unwrap_or_default()
}

fn format_price_label(y: &f64) -> String {
    format_price(*y)
}

/// Chart title for an asset and window.
///
/// # Examples
///
/// ```
/// use pricebot_chart::chart_title;
///
/// assert_eq!(chart_title("Bitcoin", 30), "Historical Price Data for BITCOIN (30 Days)");
/// ```
pub fn chart_title(name: &str, days: u32) -> String {
    format!("Historical Price Data for {} ({} Days)", name.to_uppercase(), days)
}

/// Draw `series` as a PNG line chart at `path`.
///
/// Draws the price line, a dashed line at the latest price and, when a font
/// is configured and loads, the title, axis labels and latest-price label.
///
/// # Errors
///
/// `Render` if the series is empty or plotters fails to draw or encode.
#[tracing::instrument(skip(series, settings, path), fields(points = series.len()))]
pub fn render_chart(
    series: &HistoricalSeries,
    title: &str,
    settings: &ChartSettings,
    path: &Path,
) -> Result<(), ChartError> {
    let (start, end) = series
        .time_range()
        .ok_or_else(|| render_err("series has no points"))?;
    let (low, high) = series
        .price_range()
        .ok_or_else(|| render_err("series has no points"))?;
    let current = series
        .latest()
        .map(|p| p.price)
        .ok_or_else(|| render_err("series has no points"))?;

    let x_start = start.timestamp_millis() as f64;
    let mut x_end = end.timestamp_millis() as f64;
    if x_end <= x_start {
        x_end = x_start + ONE_DAY_MS;
    }
    let pad = ((high - low) * 0.05).max(high.abs() * 0.01).max(f64::EPSILON);
    let (y_start, y_end) = (low - pad, high + pad);

    let labelled = settings.font_path().as_deref().is_some_and(ensure_font);

    let root = BitMapBackend::new(path, (*settings.width(), *settings.height())).into_drawing_area();
    root.fill(&BACKGROUND).map_err(render_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(40);
    if labelled {
        builder
            .caption(title, (FONT_FAMILY, 32).into_font().color(&TEXT))
            .x_label_area_size(70)
            .y_label_area_size(110);
    }
    let mut chart = builder
        .build_cartesian_2d(x_start..x_end, y_start..y_end)
        .map_err(render_err)?;

    if labelled {
        let days = (*settings.days()).clamp(2, 30) as usize;
        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price (USD)")
            .x_labels(days)
            .y_labels(10)
            .max_light_lines(0)
            .x_label_formatter(&format_date_label)
            .y_label_formatter(&format_price_label)
            .axis_style(GRID.stroke_width(1))
            .bold_line_style(GRID.stroke_width(1))
            .label_style((FONT_FAMILY, 14).into_font().color(&TEXT))
            .axis_desc_style((FONT_FAMILY, 20).into_font().color(&TEXT))
            .draw()
            .map_err(render_err)?;
    }

    chart
        .draw_series(LineSeries::new(
            series
                .points()
                .iter()
                .map(|p| (p.timestamp.timestamp_millis() as f64, p.price)),
            PRICE_LINE.stroke_width(2),
        ))
        .map_err(render_err)?;

    // Dashed line at the latest price: 1% dashes with 1% gaps.
    let dash = (x_end - x_start) / 100.0;
    chart
        .draw_series((0..50).map(|i| {
            let from = x_start + dash * (2 * i) as f64;
            PathElement::new(
                vec![(from, current), (from + dash, current)],
                CURRENT_PRICE_LINE.stroke_width(1),
            )
        }))
        .map_err(render_err)?;

    if labelled {
        let label_y = current + (y_end - y_start) * 0.01;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("${}", format_price(current)),
                (x_start + dash, label_y),
                (FONT_FAMILY, 24).into_font().color(&TEXT),
            )))
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}
