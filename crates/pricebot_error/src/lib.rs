//! Error types for pricebot.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with the file and line that raised it
//! - constructors use `#[track_caller]` so the location is captured for free
//!
//! Quote errors double as user-facing replies: [`QuoteError::reply_text`]
//! returns the kind's message without the location suffix.
//!
//! # Examples
//!
//! ```
//! use pricebot_error::{PricebotResult, QuoteError, QuoteErrorKind};
//!
//! fn fetch_price() -> PricebotResult<f64> {
//!     Err(QuoteError::new(QuoteErrorKind::RateLimited))?
//! }
//!
//! match fetch_price() {
//!     Ok(price) => println!("Got: {}", price),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chart;
mod config;
mod error;
mod history;
mod http;
mod quote;

pub use chart::{ChartError, ChartErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{PricebotError, PricebotErrorKind, PricebotResult};
pub use history::{HistoryError, HistoryErrorKind};
pub use http::HttpError;
pub use quote::{QuoteError, QuoteErrorKind};
