//! Render job options: output format presets, trimming, logo overlay.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Social-media output presets.
///
/// Each preset scales with aspect preserved and pads to the target canvas;
/// a render without a preset keeps the source dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderFormat {
    /// 1080x1920 vertical
    InstagramStory,
    /// 1080x1920 vertical
    Tiktok,
    /// 1080x1080 square
    InstagramFeed,
    /// 1920x1080 landscape
    Youtube,
    /// 1440x1080 4:3
    Classic,
}

impl RenderFormat {
    pub const ALL: &'static [RenderFormat] = &[
        RenderFormat::InstagramStory,
        RenderFormat::Tiktok,
        RenderFormat::InstagramFeed,
        RenderFormat::Youtube,
        RenderFormat::Classic,
    ];

    /// Target canvas in pixels.
    pub fn output_dimensions(&self) -> (u32, u32) {
        match self {
            RenderFormat::InstagramStory | RenderFormat::Tiktok => (1080, 1920),
            RenderFormat::InstagramFeed => (1080, 1080),
            RenderFormat::Youtube => (1920, 1080),
            RenderFormat::Classic => (1440, 1080),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderFormat::InstagramStory => "instagram_story",
            RenderFormat::Tiktok => "tiktok",
            RenderFormat::InstagramFeed => "instagram_feed",
            RenderFormat::Youtube => "youtube",
            RenderFormat::Classic => "classic",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = RenderFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instagram_story" => Ok(RenderFormat::InstagramStory),
            "tiktok" => Ok(RenderFormat::Tiktok),
            "instagram_feed" => Ok(RenderFormat::InstagramFeed),
            "youtube" => Ok(RenderFormat::Youtube),
            "classic" => Ok(RenderFormat::Classic),
            _ => Err(RenderFormatParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown render format: {0}")]
pub struct RenderFormatParseError(String);

/// Optional trim bounds in seconds. Each bound is independent: a start
/// without an end cuts the head only, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct TrimRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

impl TrimRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Bounds are sane: non-negative, and end after start when both given.
    pub fn is_valid(&self) -> bool {
        if self.start.map_or(false, |s| s < 0.0) || self.end.map_or(false, |e| e <= 0.0) {
            return false;
        }
        match (self.start, self.end) {
            (Some(s), Some(e)) => e > s,
            _ => true,
        }
    }
}

/// Corner anchors for the logo overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogoPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl LogoPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoPosition::TopLeft => "top-left",
            LogoPosition::TopRight => "top-right",
            LogoPosition::BottomLeft => "bottom-left",
            LogoPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for LogoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Watermark/logo overlay burned into the render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoOverlay {
    pub logo_url: String,
    #[serde(default)]
    pub position: LogoPosition,
    /// Logo width as a percentage of the video width
    #[serde(default = "default_logo_size")]
    pub size: f64,
    #[serde(default = "default_logo_opacity")]
    pub opacity: f64,
}

fn default_logo_size() -> f64 {
    10.0
}

fn default_logo_opacity() -> f64 {
    0.8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(
            "instagram_story".parse::<RenderFormat>().unwrap(),
            RenderFormat::InstagramStory
        );
        assert_eq!("TIKTOK".parse::<RenderFormat>().unwrap(), RenderFormat::Tiktok);
        assert!("betamax".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn test_format_dimensions() {
        assert_eq!(RenderFormat::InstagramStory.output_dimensions(), (1080, 1920));
        assert_eq!(RenderFormat::Tiktok.output_dimensions(), (1080, 1920));
        assert_eq!(RenderFormat::InstagramFeed.output_dimensions(), (1080, 1080));
        assert_eq!(RenderFormat::Youtube.output_dimensions(), (1920, 1080));
        assert_eq!(RenderFormat::Classic.output_dimensions(), (1440, 1080));
    }

    #[test]
    fn test_trim_validity() {
        assert!(TrimRange::default().is_valid());
        assert!(TrimRange { start: Some(1.0), end: None }.is_valid());
        assert!(TrimRange { start: None, end: Some(5.0) }.is_valid());
        assert!(TrimRange { start: Some(1.0), end: Some(5.0) }.is_valid());
        assert!(!TrimRange { start: Some(5.0), end: Some(1.0) }.is_valid());
        assert!(!TrimRange { start: Some(-1.0), end: None }.is_valid());
        assert!(!TrimRange { start: None, end: Some(0.0) }.is_valid());
    }

    #[test]
    fn test_logo_defaults_and_wire_names() {
        let logo: LogoOverlay =
            serde_json::from_str(r#"{"logoUrl":"/uploads/logo.png"}"#).unwrap();
        assert_eq!(logo.position, LogoPosition::TopRight);
        assert_eq!(logo.size, 10.0);
        assert_eq!(logo.opacity, 0.8);

        let json = serde_json::to_value(&logo).unwrap();
        assert_eq!(json["logoUrl"], "/uploads/logo.png");
        assert_eq!(json["position"], "top-right");
    }
}
