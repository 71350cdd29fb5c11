use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from mentions.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Hex overrides keyed by theme slot, e.g. `badge_task = "#44DDFF"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum suggestion rows shown at once
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    /// Dropdown height assumed before the first measurement
    #[serde(default = "default_dropdown_estimate")]
    pub dropdown_estimate: u16,
    /// How long a clicked badge stays highlighted
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            max_visible: default_max_visible(),
            dropdown_estimate: default_dropdown_estimate(),
            pulse_ms: default_pulse_ms(),
        }
    }
}

fn default_max_visible() -> usize {
    8
}

fn default_dropdown_estimate() -> u16 {
    10
}

fn default_pulse_ms() -> u64 {
    600
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive, e.g. "debug" or "mentions=trace"
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.editor.max_visible, 8);
        assert_eq!(config.editor.dropdown_estimate, 10);
    }

    #[test]
    fn test_partial_editor_section() {
        let config: Config = toml::from_str("[editor]\npulse_ms = 250\n").unwrap();
        assert_eq!(config.editor.pulse_ms, 250);
        assert_eq!(config.editor.max_visible, 8);
    }
}
