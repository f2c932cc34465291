//! Caption serialization and burn-in style conversion.
//!
//! Cues are written as SRT for the subtitle overlay filter; styling is
//! expressed through libass `force_style` overrides rather than a full ASS
//! script, so the style stays declarative end to end.

use std::path::Path;
use tokio::fs;

use vsub_models::{CaptionPosition, CaptionStyle, SubtitleCue, TextAlignment};

use crate::error::{MediaError, MediaResult};

/// Horizontal margin as a fraction of the video width, applied on both sides.
const MARGIN_RATIO: f64 = 0.05;

/// Minimum box padding in opaque-box mode; below this the box collapses.
const MIN_BOX_PADDING: u32 = 5;

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_us = (seconds.max(0.0) * 1_000_000.0).round() as u64;
    let millis = (total_us / 1_000) % 1_000;
    let total_secs = total_us / 1_000_000;
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Write cues to `path` in SRT format with 1-based sequence numbers.
pub async fn write_srt(cues: &[SubtitleCue], path: impl AsRef<Path>) -> MediaResult<()> {
    let mut content = String::new();
    for (i, cue) in cues.iter().enumerate() {
        content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(cue.start),
            format_srt_timestamp(cue.end),
            cue.text
        ));
    }
    fs::write(path.as_ref(), content).await?;
    Ok(())
}

/// Convert `#RRGGBB` to the libass `&HAABBGGRR` encoding.
///
/// The alpha byte is inverted relative to CSS opacity: 0x00 is opaque and
/// 0xFF is fully transparent. Channels are reordered to blue-green-red.
pub fn ass_color(hex: &str, opacity: f64) -> MediaResult<String> {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Err(MediaError::InvalidColor(hex.to_string()));
    }
    let rgb =
        u32::from_str_radix(digits, 16).map_err(|_| MediaError::InvalidColor(hex.to_string()))?;
    let (r, g, b) = ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
    let a = ((1.0 - opacity.clamp(0.0, 1.0)) * 255.0).round() as u8;
    Ok(format!("&H{a:02X}{b:02X}{g:02X}{r:02X}"))
}

/// Map position and alignment onto the libass numpad `Alignment` code.
///
/// Rows 1-3 anchor at the bottom, 4-6 in the middle, 7-9 at the top; within
/// a row the column runs left, center, right.
pub fn alignment_code(position: CaptionPosition, alignment: TextAlignment) -> u8 {
    let row = match position {
        CaptionPosition::Bottom => 0,
        CaptionPosition::Middle => 3,
        CaptionPosition::Top => 6,
    };
    let column = match alignment {
        TextAlignment::Left => 1,
        TextAlignment::Center => 2,
        TextAlignment::Right => 3,
    };
    row + column
}

/// Build the libass `force_style` override string.
///
/// `backgroundOpacity > 0` selects opaque-box mode (`BorderStyle=3`), where
/// libass repurposes the outline channel as the box fill and `Outline` as the
/// box padding. With a transparent background the configured outline color is
/// painted as a glyph stroke instead.
pub fn build_force_style(style: &CaptionStyle, video_width: u32) -> MediaResult<String> {
    let primary = ass_color(&style.foreground_color, 1.0)?;
    let back = ass_color(&style.background_color, style.background_opacity)?;
    let margin = (f64::from(video_width) * MARGIN_RATIO) as u32;
    let alignment = alignment_code(style.position, style.alignment);

    let (border_style, outline_colour, outline) = if style.uses_background_box() {
        let padding = style.effective_outline_width().max(MIN_BOX_PADDING);
        (3, back.clone(), padding)
    } else {
        let stroke = ass_color(&style.outline_color, 1.0)?;
        (1, stroke, style.effective_outline_width())
    };

    Ok(format!(
        "FontName={},FontSize={},Bold=-1,PrimaryColour={},OutlineColour={},BackColour={},\
         BorderStyle={},Outline={},Alignment={},MarginL={},MarginR={}",
        style.font_family,
        style.font_size_px,
        primary,
        outline_colour,
        back,
        border_style,
        outline,
        alignment,
        margin,
        margin,
    ))
}

/// Escape a filesystem path for use inside a filtergraph argument.
///
/// The filtergraph parser treats `:` as an option separator and `\` and `'`
/// as escapes, so all three are backslash-escaped here.
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Build the subtitle overlay filter for an SRT file plus style overrides.
pub fn subtitles_filter(
    srt_path: &Path,
    style: &CaptionStyle,
    video_width: u32,
) -> MediaResult<String> {
    let force_style = build_force_style(style, video_width)?;
    Ok(format!(
        "subtitles={}:force_style='{}'",
        escape_filter_path(srt_path),
        force_style
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn cue(start: f64, end: f64, text: &str) -> SubtitleCue {
        SubtitleCue {
            id: 1,
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_srt_timestamp_formatting() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(3.5), "00:00:03,500");
        assert_eq!(format_srt_timestamp(61.042), "00:01:01,042");
        assert_eq!(format_srt_timestamp(3661.25), "01:01:01,250");
    }

    #[test]
    fn test_srt_timestamp_negative_clamps_to_zero() {
        assert_eq!(format_srt_timestamp(-1.0), "00:00:00,000");
    }

    #[tokio::test]
    async fn test_write_srt_blocks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subs.srt");
        let cues = vec![cue(0.0, 2.5, "hello"), cue(2.5, 5.0, "world")];

        write_srt(&cues, &path).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            content,
            "1\n00:00:00,000 --> 00:00:02,500\nhello\n\n2\n00:00:02,500 --> 00:00:05,000\nworld\n\n"
        );
    }

    #[test]
    fn test_ass_color_opaque_white() {
        assert_eq!(ass_color("#FFFFFF", 1.0).unwrap(), "&H00FFFFFF");
    }

    #[test]
    fn test_ass_color_transparent_black() {
        assert_eq!(ass_color("#000000", 0.0).unwrap(), "&HFF000000");
    }

    #[test]
    fn test_ass_color_channel_reordering() {
        // r=FF g=80 b=00 becomes BBGGRR = 0080FF
        assert_eq!(ass_color("#FF8000", 1.0).unwrap(), "&H000080FF");
    }

    #[test]
    fn test_ass_color_alpha_rounds() {
        // (1 - 0.8) * 255 = 51.0 -> 0x33
        assert_eq!(ass_color("#000000", 0.8).unwrap(), "&H33000000");
    }

    #[test]
    fn test_ass_color_rejects_bad_input() {
        assert!(ass_color("#FFF", 1.0).is_err());
        assert!(ass_color("not-a-color", 1.0).is_err());
    }

    #[test]
    fn test_alignment_codes() {
        assert_eq!(
            alignment_code(CaptionPosition::Bottom, TextAlignment::Center),
            2
        );
        assert_eq!(
            alignment_code(CaptionPosition::Middle, TextAlignment::Left),
            4
        );
        assert_eq!(alignment_code(CaptionPosition::Top, TextAlignment::Right), 9);
    }

    #[test]
    fn test_force_style_box_mode() {
        // Default style: background opacity 0.8, outline disabled
        let style = CaptionStyle::default();
        let fs = build_force_style(&style, 1080).unwrap();

        assert!(fs.contains("FontName=Arial"));
        assert!(fs.contains("FontSize=24"));
        assert!(fs.contains("BorderStyle=3"));
        // Box fill goes through the outline channel
        assert!(fs.contains("OutlineColour=&H33000000"));
        assert!(fs.contains("BackColour=&H33000000"));
        // Disabled outline still pads the box to the minimum
        assert!(fs.contains("Outline=5"));
        assert!(fs.contains("MarginL=54"));
        assert!(fs.contains("MarginR=54"));
        assert!(fs.contains("Alignment=2"));
    }

    #[test]
    fn test_force_style_outline_mode() {
        let style = CaptionStyle {
            background_opacity: 0.0,
            outline_enabled: true,
            outline_color: "#00FF00".to_string(),
            outline_width_px: 2,
            ..CaptionStyle::default()
        };
        let fs = build_force_style(&style, 1080).unwrap();

        assert!(fs.contains("BorderStyle=1"));
        assert!(fs.contains("OutlineColour=&H0000FF00"));
        assert!(fs.contains("Outline=2"));
        // Fully transparent background
        assert!(fs.contains("BackColour=&HFF000000"));
    }

    #[test]
    fn test_force_style_outline_disabled_draws_no_stroke() {
        let style = CaptionStyle {
            background_opacity: 0.0,
            outline_enabled: false,
            ..CaptionStyle::default()
        };
        let fs = build_force_style(&style, 1080).unwrap();
        assert!(fs.contains("Outline=0"));
    }

    #[test]
    fn test_escape_filter_path() {
        let path = PathBuf::from("/tmp/a:b.srt");
        assert_eq!(escape_filter_path(&path), "/tmp/a\\:b.srt");
    }

    #[test]
    fn test_subtitles_filter_shape() {
        let style = CaptionStyle::default();
        let filter = subtitles_filter(Path::new("/tmp/subs.srt"), &style, 1920).unwrap();
        assert!(filter.starts_with("subtitles=/tmp/subs.srt:force_style='"));
        assert!(filter.ends_with('\''));
        assert!(filter.contains("MarginL=96"));
    }
}
