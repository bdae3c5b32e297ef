//! Price embed formatting.
//!
//! Produces a platform-neutral [`PriceEmbed`]; the Discord module converts it
//! into serenity's builder.

use derive_getters::Getters;
pub use pricebot_market::format_price;
use pricebot_market::{QuoteRecord, token_slug};

/// Embed accent colour.
pub const EMBED_COLOR: u32 = 0xFDBE02;

/// Title of the field shown instead of a chart.
pub const NO_CHART_TITLE: &str = "Historical Data Not Available";

/// One name/value cell of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

impl EmbedField {
    /// Create a field.
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Rich reply describing an asset's prices.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PriceEmbed {
    title: String,
    description: String,
    url: String,
    color: u32,
    fields: Vec<EmbedField>,
    image_url: Option<String>,
}

impl PriceEmbed {
    /// Field with the given name, if present.
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Format a percent change with an explicit sign.
///
/// # Examples
///
/// ```
/// use pricebot_social::format_change;
///
/// assert_eq!(format_change(0.5), "+0.50%");
/// assert_eq!(format_change(-1.2), "-1.20%");
/// ```
pub fn format_change(change: f64) -> String {
    // Avoid "-0.00%" for tiny negative values.
    let rounded = (change * 100.0).round() / 100.0;
    let change = if rounded == 0.0 { 0.0 } else { change };
    format!("{:+.2}%", change)
}

/// CoinMarketCap page for the asset called `name`.
pub fn coinmarketcap_url(name: &str) -> String {
    format!("https://coinmarketcap.com/currencies/{}/", token_slug(name))
}

/// Build the reply embed for a quote and an optional chart.
pub fn format_price_embed(record: &QuoteRecord, chart_url: Option<&str>) -> PriceEmbed {
    let mut fields: Vec<EmbedField> = record
        .prices()
        .iter()
        .map(|(currency, price)| {
            EmbedField::new(
                currency.code(),
                format!("{}{}", currency.symbol(), format_price(*price)),
                true,
            )
        })
        .collect();

    fields.extend(
        record
            .changes()
            .labelled()
            .map(|(label, change)| EmbedField::new(label, format_change(change), true)),
    );

    if chart_url.is_none() {
        fields.push(EmbedField::new(
            NO_CHART_TITLE,
            format!(
                "Sorry, no historical data could be found for {}, so no chart will be generated.",
                record.symbol()
            ),
            false,
        ));
    }

    PriceEmbed {
        title: format!("{} PRICES:", record.symbol()),
        description: record.name().clone(),
        url: coinmarketcap_url(record.name()),
        color: EMBED_COLOR,
        fields,
        image_url: chart_url.map(str::to_string),
    }
}
