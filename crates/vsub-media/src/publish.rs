//! Publishing job outputs into the public uploads tree.
//!
//! The worker serves its uploads directory as `/uploads`; published assets
//! are addressed by the site-relative URL paths the webhook payloads carry.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use vsub_models::VideoId;

use crate::error::{MediaError, MediaResult};

/// Directory under the uploads root where per-video preview assets live.
const THUMBNAILS_SUBDIR: &str = "thumbnails";

/// Cross-device link error code (EXDEV).
const EXDEV: i32 = 18;

/// Destination directory for a video's preview assets.
pub fn thumbnail_dir(uploads_root: &Path, video_id: &VideoId) -> PathBuf {
    uploads_root.join(THUMBNAILS_SUBDIR).join(video_id.as_str())
}

/// File name the rendered output is stored under.
pub fn rendered_file_name(video_id: &VideoId) -> String {
    format!("rendered_{video_id}.mp4")
}

/// Publish a preview asset, returning its site-relative URL path.
pub async fn publish_thumbnail(
    src: &Path,
    uploads_root: &Path,
    video_id: &VideoId,
    file_name: &str,
) -> MediaResult<String> {
    let dest = thumbnail_dir(uploads_root, video_id).join(file_name);
    place_file(src, &dest).await?;
    Ok(format!("/uploads/{THUMBNAILS_SUBDIR}/{video_id}/{file_name}"))
}

/// Publish the rendered video, returning the path it is served from.
pub async fn publish_render(
    src: &Path,
    uploads_root: &Path,
    video_id: &VideoId,
) -> MediaResult<PathBuf> {
    let dest = uploads_root.join(rendered_file_name(video_id));
    place_file(src, &dest).await?;
    Ok(dest)
}

/// Move `src` to `dest`, creating parent directories. The job workspace and
/// the uploads tree are often on different filesystems, so a failed rename
/// falls back to copy-and-delete.
async fn place_file(src: &Path, dest: &Path) -> MediaResult<()> {
    if !src.exists() {
        return Err(MediaError::FileNotFound(src.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }

    match fs::rename(src, dest).await {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(EXDEV) => {
            debug!(
                "Cross-device publish, copying {} -> {}",
                src.display(),
                dest.display()
            );
            fs::copy(src, dest).await?;
            if let Err(e) = fs::remove_file(src).await {
                warn!("Could not remove {} after publish: {}", src.display(), e);
            }
            Ok(())
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_thumbnail_moves_and_returns_url() {
        let work = TempDir::new().unwrap();
        let uploads = TempDir::new().unwrap();
        let src = work.path().join("frame_001.jpg");
        fs::write(&src, b"jpeg bytes").await.unwrap();

        let id = VideoId::from_string("vid1");
        let url = publish_thumbnail(&src, uploads.path(), &id, "frame_0.0.jpg")
            .await
            .unwrap();

        assert_eq!(url, "/uploads/thumbnails/vid1/frame_0.0.jpg");
        assert!(!src.exists());
        let dest = uploads.path().join("thumbnails/vid1/frame_0.0.jpg");
        assert_eq!(fs::read(&dest).await.unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_publish_render_destination() {
        let work = TempDir::new().unwrap();
        let uploads = TempDir::new().unwrap();
        let src = work.path().join("out.mp4");
        fs::write(&src, b"mp4 bytes").await.unwrap();

        let id = VideoId::from_string("vid2");
        let dest = publish_render(&src, uploads.path(), &id).await.unwrap();

        assert_eq!(dest, uploads.path().join("rendered_vid2.mp4"));
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn test_publish_missing_source() {
        let uploads = TempDir::new().unwrap();
        let id = VideoId::from_string("vid3");
        let err = publish_render(Path::new("/nonexistent/out.mp4"), uploads.path(), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_publish_overwrites_existing() {
        let work = TempDir::new().unwrap();
        let uploads = TempDir::new().unwrap();
        let id = VideoId::from_string("vid4");

        let old = work.path().join("a.mp4");
        fs::write(&old, b"old").await.unwrap();
        publish_render(&old, uploads.path(), &id).await.unwrap();

        let new = work.path().join("b.mp4");
        fs::write(&new, b"new").await.unwrap();
        publish_render(&new, uploads.path(), &id).await.unwrap();

        let dest = uploads.path().join("rendered_vid4.mp4");
        assert_eq!(fs::read(&dest).await.unwrap(), b"new");
    }

    #[test]
    fn test_rendered_file_name() {
        let id = VideoId::from_string("abc-123");
        assert_eq!(rendered_file_name(&id), "rendered_abc-123.mp4");
    }
}
