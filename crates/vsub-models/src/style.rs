//! Declarative caption styling.
//!
//! The style object is purely descriptive; the media layer translates it
//! into the subtitle filter's force_style string at burn-in time. Defaults
//! mirror the rendering engine's own fallbacks so a style-less project
//! still burns legible captions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertical anchor row for the caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptionPosition {
    Top,
    Middle,
    #[default]
    Bottom,
}

impl CaptionPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionPosition::Top => "top",
            CaptionPosition::Middle => "middle",
            CaptionPosition::Bottom => "bottom",
        }
    }
}

impl fmt::Display for CaptionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Horizontal alignment of the caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
        }
    }
}

impl fmt::Display for TextAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caption appearance for preview and burn-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size_px: u32,
    /// Text color, `#RRGGBB`
    #[serde(default = "default_foreground")]
    pub foreground_color: String,
    /// Box color behind the text, `#RRGGBB`
    #[serde(default = "default_background")]
    pub background_color: String,
    /// 0.0 disables the box entirely (outline-only mode); anything above
    /// zero selects opaque-box mode at burn-in.
    #[serde(default = "default_background_opacity")]
    pub background_opacity: f64,
    #[serde(default)]
    pub position: CaptionPosition,
    #[serde(default)]
    pub alignment: TextAlignment,
    #[serde(default)]
    pub outline_enabled: bool,
    /// Stroke color, `#RRGGBB`; only visible in outline-only mode
    #[serde(default = "default_outline_color")]
    pub outline_color: String,
    #[serde(default = "default_outline_width")]
    pub outline_width_px: u32,
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_foreground() -> String {
    "#FFFFFF".to_string()
}

fn default_background() -> String {
    "#000000".to_string()
}

fn default_background_opacity() -> f64 {
    0.8
}

fn default_outline_color() -> String {
    "#000000".to_string()
}

fn default_outline_width() -> u32 {
    2
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size_px: default_font_size(),
            foreground_color: default_foreground(),
            background_color: default_background(),
            background_opacity: default_background_opacity(),
            position: CaptionPosition::default(),
            alignment: TextAlignment::default(),
            outline_enabled: false,
            outline_color: default_outline_color(),
            outline_width_px: default_outline_width(),
        }
    }
}

impl CaptionStyle {
    /// Effective stroke width: a disabled outline draws nothing.
    pub fn effective_outline_width(&self) -> u32 {
        if self.outline_enabled {
            self.outline_width_px
        } else {
            0
        }
    }

    /// Whether burn-in should paint an opaque box behind the text.
    pub fn uses_background_box(&self) -> bool {
        self.background_opacity > 0.0
    }
}
