//! Layered runtime configuration.

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File, FileFormat};
use derive_getters::Getters;
use pricebot_cache::ResponseCacheConfig;
use pricebot_chart::ChartSettings;
use pricebot_error::{ConfigError, ConfigErrorKind, PricebotResult};
use pricebot_social::CommandSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../pricebot.toml");

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HttpSettings {
    /// Timeout for market data requests (seconds)
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,

    /// Timeout for chart uploads (seconds)
    #[serde(default = "default_upload_timeout_seconds")]
    upload_timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_upload_timeout_seconds() -> u64 {
    30
}

impl HttpSettings {
    /// Market data timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Upload timeout as a `Duration`.
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_seconds)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            upload_timeout_seconds: default_upload_timeout_seconds(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct LoggingSettings {
    /// Emit JSON lines instead of text
    #[serde(default)]
    json: bool,
}

/// Complete pricebot configuration.
///
/// Configuration sources in order of precedence (later sources override earlier):
/// 1. Bundled defaults (pricebot.toml shipped with the binary)
/// 2. User config in home directory (~/.config/pricebot/pricebot.toml)
/// 3. User config in current directory (./pricebot.toml), or an explicit file
///
/// Credentials are not part of this file; see [`crate::Credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct PricebotConfig {
    /// Response cache
    #[serde(default)]
    cache: ResponseCacheConfig,

    /// Outbound HTTP
    #[serde(default)]
    http: HttpSettings,

    /// Chart rendering
    #[serde(default)]
    chart: ChartSettings,

    /// Command parsing
    #[serde(default)]
    command: CommandSettings,

    /// Logging
    #[serde(default)]
    logging: LoggingSettings,
}

impl PricebotConfig {
    /// Load configuration from the default locations.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pricebot::PricebotConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = PricebotConfig::load()?;
    /// println!("cache TTL: {}s", config.cache().ttl_seconds());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> PricebotResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");
        let builder = Self::user_layers(Self::defaults())
            .add_source(File::with_name("pricebot").required(false));
        Self::finish(builder)
    }

    /// Load defaults, the home directory file, then `path`, which must exist.
    ///
    /// # Errors
    ///
    /// `Load` if `path` is missing or unparsable, `Invalid` if a value is out
    /// of range.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_with(path: impl AsRef<Path>) -> PricebotResult<Self> {
        debug!("Loading configuration with explicit file");
        let builder = Self::user_layers(Self::defaults()).add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Parse a TOML document layered over the bundled defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use pricebot::PricebotConfig;
    ///
    /// let config = PricebotConfig::from_toml_str("[cache]\nttl_seconds = 60").unwrap();
    /// assert_eq!(*config.cache().ttl_seconds(), 60);
    /// assert_eq!(*config.cache().max_size(), 100);
    /// ```
    pub fn from_toml_str(toml: &str) -> PricebotResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn user_layers(mut builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/pricebot/pricebot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> PricebotResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Load(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Load(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the bot cannot run with.
    ///
    /// # Errors
    ///
    /// `Invalid` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&str, bool, &str); 7] = [
            ("cache.ttl_seconds", *self.cache.ttl_seconds() > 0, "must be positive"),
            ("http.timeout_seconds", self.http.timeout_seconds > 0, "must be positive"),
            (
                "http.upload_timeout_seconds",
                self.http.upload_timeout_seconds > 0,
                "must be positive",
            ),
            ("chart.days", *self.chart.days() > 0, "must be at least 1"),
            ("chart.width", *self.chart.width() >= 200, "must be at least 200 pixels"),
            ("chart.height", *self.chart.height() >= 100, "must be at least 100 pixels"),
            ("command.prefix", !self.command.prefix().trim().is_empty(), "must not be empty"),
        ];

        match checks.into_iter().find(|(_, ok, _)| !ok) {
            Some((field, _, reason)) => Err(ConfigError::new(ConfigErrorKind::Invalid {
                field: field.to_string(),
                reason: reason.to_string(),
            })),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_parse() {
        let config = PricebotConfig::from_toml_str("").expect("defaults load");
        assert_eq!(*config.cache().ttl_seconds(), 300);
        assert_eq!(*config.cache().max_size(), 100);
        assert!(*config.cache().enabled());
        assert_eq!(*config.http().timeout_seconds(), 10);
        assert_eq!(*config.chart().days(), 30);
        assert_eq!(config.command().prefix(), "!");
        assert!(!*config.logging().json());
    }

    #[test]
    fn test_struct_defaults_match_bundled_file() {
        let bundled = PricebotConfig::from_toml_str("").expect("defaults load");
        let code = PricebotConfig::default();
        assert_eq!(bundled.cache(), code.cache());
        assert_eq!(bundled.http(), code.http());
        assert_eq!(bundled.command(), code.command());
        assert_eq!(bundled.chart().days(), code.chart().days());
    }

    #[test]
    fn test_override_layer_wins() {
        let config = PricebotConfig::from_toml_str(
            "[command]\nprefix = \"$\"\n[chart]\ndays = 7\n[logging]\njson = true",
        )
        .expect("loads");
        assert_eq!(config.command().prefix(), "$");
        assert_eq!(*config.chart().days(), 7);
        assert_eq!(*config.chart().width(), 1800);
        assert!(*config.logging().json());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let err = PricebotConfig::from_toml_str("[cache]\nttl_seconds = 0").unwrap_err();
        assert!(err.to_string().contains("cache.ttl_seconds"));
    }

    #[test]
    fn test_zero_upload_timeout_rejected() {
        let err =
            PricebotConfig::from_toml_str("[http]\nupload_timeout_seconds = 0").unwrap_err();
        assert!(err.to_string().contains("http.upload_timeout_seconds"));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = PricebotConfig::from_toml_str("[command]\nprefix = \" \"").unwrap_err();
        assert!(err.to_string().contains("command.prefix"));
    }

    #[test]
    fn test_malformed_toml_is_load_error() {
        let err = PricebotConfig::from_toml_str("[cache\nttl_seconds = ").unwrap_err();
        assert!(err.to_string().contains("Failed to"));
    }
}
