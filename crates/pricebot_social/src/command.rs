//! Command parsing.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Prefix-command settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct CommandSettings {
    /// Marker a message must start with to be treated as a price request
    #[serde(default = "default_prefix")]
    prefix: String,
}

fn default_prefix() -> String {
    "!".to_string()
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

/// Extract the upper-cased symbol from a prefixed command.
///
/// Returns `None` when the message does not start with `prefix` or nothing
/// but whitespace follows it.
///
/// # Examples
///
/// ```
/// use pricebot_social::parse_command;
///
/// assert_eq!(parse_command("!", "!btc").as_deref(), Some("BTC"));
/// assert_eq!(parse_command("!", "hello"), None);
/// assert_eq!(parse_command("!", "!"), None);
/// ```
pub fn parse_command(prefix: &str, content: &str) -> Option<String> {
    let symbol = content.strip_prefix(prefix)?.trim();
    if symbol.is_empty() {
        return None;
    }
    Some(symbol.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_uppercased() {
        assert_eq!(parse_command("!", "!eth").as_deref(), Some("ETH"));
        assert_eq!(parse_command("!", "!Doge").as_deref(), Some("DOGE"));
    }

    #[test]
    fn test_whole_remainder_is_symbol() {
        assert_eq!(parse_command("!", "!btc please").as_deref(), Some("BTC PLEASE"));
        assert_eq!(parse_command("!", "!eth  ").as_deref(), Some("ETH"));
    }

    #[test]
    fn test_prefix_must_lead() {
        assert_eq!(parse_command("!", " !btc"), None);
        assert_eq!(parse_command("!", "price !btc"), None);
    }

    #[test]
    fn test_space_after_prefix_is_empty() {
        assert_eq!(parse_command("!", "!   "), None);
        assert_eq!(parse_command("!", "! btc"), Some("BTC".to_string()));
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(parse_command("$p ", "$p sol").as_deref(), Some("SOL"));
        assert_eq!(parse_command("$p ", "!sol"), None);
    }

    #[test]
    fn test_settings_default_prefix() {
        assert_eq!(CommandSettings::default().prefix(), "!");
        assert_eq!(CommandSettings::default().with_prefix("?").prefix(), "?");
    }
}
