//! Final render: subtitle burn-in, format presets, trim, and logo overlay.

use std::path::{Path, PathBuf};

use vsub_models::{CaptionStyle, LogoOverlay, LogoPosition, RenderFormat, TrimRange};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::subtitles::subtitles_filter;

/// Distance of the logo from the frame edges, in output pixels.
const LOGO_PADDING: u32 = 20;

/// Inputs to a final render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Target social-media format; source dimensions are kept when absent.
    pub format: Option<RenderFormat>,
    /// Optional trim window.
    pub trim: Option<TrimRange>,
    /// SRT file plus style for subtitle burn-in.
    pub subtitles: Option<(PathBuf, CaptionStyle)>,
    /// Downloaded logo image plus overlay parameters.
    pub logo: Option<(PathBuf, LogoOverlay)>,
}

/// Assemble the full render command.
///
/// `video_width` is what subtitle margins are computed against: the preset's
/// width when a format is chosen, the probed source width otherwise.
pub fn build_render_command(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
    video_width: u32,
) -> MediaResult<FfmpegCommand> {
    let mut cmd = FfmpegCommand::new(input, output);

    if let Some(trim) = &options.trim {
        if let Some(start) = trim.start {
            cmd = cmd.seek(start);
        }
        if let Some(end) = trim.end {
            cmd = cmd.stop_at(end);
        }
    }

    let mut base_filters = Vec::new();
    if let Some(format) = options.format {
        base_filters.push(format_filter(format));
    }
    if let Some((srt_path, style)) = &options.subtitles {
        base_filters.push(subtitles_filter(srt_path, style, video_width)?);
    }
    let base = (!base_filters.is_empty()).then(|| base_filters.join(","));

    match (&options.logo, base) {
        (Some((logo_path, logo)), Some(base)) => {
            // Base filters run on the main video first, then the logo lands
            // on top of the filtered stream.
            let chain = format!(
                "[0:v]{}[base];{}",
                base,
                logo_filter(logo).replace("[0:v]", "[base]")
            );
            cmd = cmd.second_input(logo_path).filter_complex(chain);
        }
        (Some((logo_path, logo)), None) => {
            cmd = cmd.second_input(logo_path).filter_complex(logo_filter(logo));
        }
        (None, Some(base)) => {
            cmd = cmd.video_filter(base);
        }
        (None, None) => {}
    }

    Ok(cmd
        .video_codec("libx264")
        .preset("medium")
        .crf(23)
        .audio_codec("aac")
        .audio_bitrate("128k")
        .faststart())
}

/// Run the final render. No timeout: long sources legitimately take long.
pub async fn render_video(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
    video_width: u32,
) -> MediaResult<()> {
    let cmd = build_render_command(input, output, options, video_width)?;
    FfmpegRunner::new().run(&cmd).await
}

/// Scale-and-pad filter for a format preset.
fn format_filter(format: RenderFormat) -> String {
    let (w, h) = format.output_dimensions();
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:black"
    )
}

/// Overlay x/y expressions for a logo position.
fn logo_position_expr(position: LogoPosition) -> (String, String) {
    let p = LOGO_PADDING;
    match position {
        LogoPosition::TopLeft => (p.to_string(), p.to_string()),
        LogoPosition::TopRight => (format!("W-w-{p}"), p.to_string()),
        LogoPosition::BottomLeft => (p.to_string(), format!("H-h-{p}")),
        LogoPosition::BottomRight => (format!("W-w-{p}"), format!("H-h-{p}")),
    }
}

/// Scale/alpha/overlay chain for the logo, reading the main video as `[0:v]`.
fn logo_filter(logo: &LogoOverlay) -> String {
    let (x, y) = logo_position_expr(logo.position);
    format!(
        "[1:v]scale=iw*{}:-1,format=rgba,colorchannelmixer=aa={}[logo];[0:v][logo]overlay={}:{}",
        logo.size / 100.0,
        logo.opacity,
        x,
        y
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(options: &RenderOptions) -> Vec<String> {
        build_render_command(Path::new("in.mp4"), Path::new("out.mp4"), options, 1920)
            .unwrap()
            .build_args()
    }

    #[test]
    fn test_plain_render_codecs() {
        let args = args_of(&RenderOptions::default());
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"-crf".to_string()));
        assert!(args.contains(&"aac".to_string()));
        assert!(args.contains(&"+faststart".to_string()));
        assert!(!args.contains(&"-vf".to_string()));
        assert!(!args.contains(&"-filter_complex".to_string()));
    }

    #[test]
    fn test_format_preset_filter() {
        let options = RenderOptions {
            format: Some(RenderFormat::InstagramStory),
            ..RenderOptions::default()
        };
        let args = args_of(&options);
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert!(args[vf + 1].contains("scale=1080:1920:force_original_aspect_ratio=decrease"));
        assert!(args[vf + 1].contains("pad=1080:1920:(ow-iw)/2:(oh-ih)/2:black"));
    }

    #[test]
    fn test_subtitle_burn_in_filter() {
        let options = RenderOptions {
            subtitles: Some((PathBuf::from("/tmp/subs.srt"), CaptionStyle::default())),
            ..RenderOptions::default()
        };
        let args = args_of(&options);
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert!(args[vf + 1].starts_with("subtitles=/tmp/subs.srt:force_style='"));
    }

    #[test]
    fn test_format_precedes_subtitles_in_chain() {
        let options = RenderOptions {
            format: Some(RenderFormat::Youtube),
            subtitles: Some((PathBuf::from("/tmp/subs.srt"), CaptionStyle::default())),
            ..RenderOptions::default()
        };
        let args = args_of(&options);
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        let filter = &args[vf + 1];
        let scale_at = filter.find("scale=1920:1080").unwrap();
        let subs_at = filter.find("subtitles=").unwrap();
        assert!(scale_at < subs_at);
    }

    #[test]
    fn test_trim_bounds() {
        let options = RenderOptions {
            trim: Some(TrimRange {
                start: Some(5.0),
                end: Some(30.0),
            }),
            ..RenderOptions::default()
        };
        let args = args_of(&options);
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let i = args.iter().position(|a| a == "-i").unwrap();
        let to = args.iter().position(|a| a == "-to").unwrap();
        assert!(ss < i);
        assert!(to > i);
        assert_eq!(args[ss + 1], "5.000");
        assert_eq!(args[to + 1], "30.000");
    }

    #[test]
    fn test_logo_only_overlay() {
        let options = RenderOptions {
            logo: Some((
                PathBuf::from("logo.png"),
                LogoOverlay {
                    logo_url: "/uploads/logo.png".to_string(),
                    position: LogoPosition::TopRight,
                    size: 10.0,
                    opacity: 0.8,
                },
            )),
            ..RenderOptions::default()
        };
        let args = args_of(&options);
        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
        let fc = args.iter().position(|a| a == "-filter_complex").unwrap();
        let chain = &args[fc + 1];
        assert!(chain.contains("[1:v]scale=iw*0.1:-1"));
        assert!(chain.contains("colorchannelmixer=aa=0.8"));
        assert!(chain.contains("[0:v][logo]overlay=W-w-20:20"));
    }

    #[test]
    fn test_logo_over_filtered_base() {
        let options = RenderOptions {
            format: Some(RenderFormat::InstagramFeed),
            logo: Some((
                PathBuf::from("logo.png"),
                LogoOverlay {
                    logo_url: "/uploads/logo.png".to_string(),
                    position: LogoPosition::BottomLeft,
                    size: 10.0,
                    opacity: 0.8,
                },
            )),
            ..RenderOptions::default()
        };
        let args = args_of(&options);
        let fc = args.iter().position(|a| a == "-filter_complex").unwrap();
        let chain = &args[fc + 1];
        assert!(chain.starts_with("[0:v]scale=1080:1080"));
        assert!(chain.contains("[base];"));
        assert!(chain.contains("[base][logo]overlay=20:H-h-20"));
        assert!(!args.contains(&"-vf".to_string()));
    }

    #[test]
    fn test_logo_corner_expressions() {
        assert_eq!(
            logo_position_expr(LogoPosition::TopLeft),
            ("20".to_string(), "20".to_string())
        );
        assert_eq!(
            logo_position_expr(LogoPosition::BottomRight),
            ("W-w-20".to_string(), "H-h-20".to_string())
        );
    }
}
