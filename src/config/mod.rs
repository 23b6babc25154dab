//! Canvas configuration contract.
//!
//! The canvas consumes configuration through [`ConfigProvider`]; where the
//! values come from (file, settings UI, defaults) is the host's business.
//! A TOML loader is provided for the demo binary.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Margin style between panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginStyle {
    None,
    Thin,
    #[default]
    Normal,
    Thick,
}

/// Canvas section of the host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Scrollback line budget enforced by the evictor.
    pub scrollback_max_lines: usize,
    /// Scrollback frame budget enforced by the evictor.
    pub scrollback_max_frames: usize,
    /// UI scale percentage; feeds the spacing unit.
    pub ui_scale_percent: usize,
    /// Margin style between panes.
    pub margin_style: MarginStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            scrollback_max_lines: 10_000,
            scrollback_max_frames: 100,
            ui_scale_percent: 100,
            margin_style: MarginStyle::Normal,
        }
    }
}

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl CanvasConfig {
    /// Parse the `[canvas]` section (or top level) of a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct Document {
            #[serde(default)]
            canvas: Option<CanvasConfig>,
            #[serde(flatten)]
            top: CanvasConfig,
        }
        let doc: Document = toml::from_str(text)?;
        Ok(doc.canvas.unwrap_or(doc.top))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_toml_str(&fs::read_to_string(path)?)?)
    }
}

/// Source of the canvas configuration section.
pub trait ConfigProvider {
    fn canvas_config(&self) -> CanvasConfig;
}

impl ConfigProvider for CanvasConfig {
    fn canvas_config(&self) -> CanvasConfig {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = CanvasConfig::default();
        assert_eq!(cfg.scrollback_max_lines, 10_000);
        assert_eq!(cfg.scrollback_max_frames, 100);
        assert_eq!(cfg.ui_scale_percent, 100);
        assert_eq!(cfg.margin_style, MarginStyle::Normal);
    }

    #[test]
    fn parses_a_canvas_section() {
        let cfg = CanvasConfig::from_toml_str(
            r#"
            [canvas]
            scrollback_max_lines = 500
            scrollback_max_frames = 10
            margin_style = "thin"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scrollback_max_lines, 500);
        assert_eq!(cfg.scrollback_max_frames, 10);
        assert_eq!(cfg.margin_style, MarginStyle::Thin);
        // Unset fields keep their defaults.
        assert_eq!(cfg.ui_scale_percent, 100);
    }

    #[test]
    fn parses_top_level_keys() {
        let cfg = CanvasConfig::from_toml_str("scrollback_max_lines = 42").unwrap();
        assert_eq!(cfg.scrollback_max_lines, 42);
    }

    #[test]
    fn malformed_numeric_is_an_error() {
        let err = CanvasConfig::from_toml_str("scrollback_max_lines = \"lots\"");
        assert!(err.is_err());
    }

    #[test]
    fn config_is_its_own_provider() {
        let cfg = CanvasConfig {
            scrollback_max_lines: 7,
            ..CanvasConfig::default()
        };
        assert_eq!(cfg.canvas_config().scrollback_max_lines, 7);
    }
}
