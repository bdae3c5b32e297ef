//! Chart settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How charts are drawn and where their transient files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ChartSettings {
    /// Days of history plotted
    #[serde(default = "default_days")]
    days: u32,

    /// Image width in pixels
    #[serde(default = "default_width")]
    width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    height: u32,

    /// TrueType font for titles and labels. Without one, charts are drawn
    /// without text.
    #[serde(default)]
    #[setters(strip_option)]
    font_path: Option<PathBuf>,

    /// Directory for transient chart files (system temp dir if unset)
    #[serde(default)]
    #[setters(strip_option)]
    temp_dir: Option<PathBuf>,
}

fn default_days() -> u32 {
    30
}

fn default_width() -> u32 {
    1800
}

fn default_height() -> u32 {
    900
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            days: default_days(),
            width: default_width(),
            height: default_height(),
            font_path: None,
            temp_dir: None,
        }
    }
}
