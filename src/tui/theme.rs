use ratatui::style::Color;

use crate::model::{MentionKind, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub badge_bg: Color,
    pub badge_task: Color,
    pub badge_file: Color,
    pub badge_user: Color,
    /// Background of a badge right after it was clicked
    pub pulse_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            badge_bg: Color::Rgb(0x1E, 0x12, 0x3A),
            badge_task: Color::Rgb(0x44, 0xDD, 0xFF),
            badge_file: Color::Rgb(0xFF, 0xD7, 0x00),
            badge_user: Color::Rgb(0xCC, 0x66, 0xFF),
            pulse_bg: Color::Rgb(0x40, 0xE0, 0xD0),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "badge_bg" => theme.badge_bg = color,
                "badge_task" => theme.badge_task = color,
                "badge_file" => theme.badge_file = color,
                "badge_user" => theme.badge_user = color,
                "pulse_bg" => theme.pulse_bg = color,
                _ => tracing::warn!(key = %key, "unknown theme color"),
            }
        }

        theme
    }

    /// Accent color for a mention badge
    pub fn badge_color(&self, kind: MentionKind) -> Color {
        match kind {
            MentionKind::Task => self.badge_task,
            MentionKind::File => self.badge_file,
            MentionKind::User => self.badge_user,
        }
    }
}
