//! Source material retrieval.
//!
//! Job payloads reference the source video either by absolute HTTP(S) URL or
//! by a site-relative path under the public uploads tree. Both resolve to a
//! local working copy inside the job workspace.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use vsub_models::VideoId;

use crate::error::{MediaError, MediaResult};

/// Fetch the source video into `dest_dir`, returning the local path.
///
/// HTTP and HTTPS URLs are downloaded with the supplied client (whose timeout
/// bounds the transfer). Anything else is treated as a path relative to
/// `public_root` and copied.
pub async fn fetch_source(
    client: &reqwest::Client,
    source_url: &str,
    dest_dir: &Path,
    video_id: &VideoId,
    public_root: Option<&Path>,
) -> MediaResult<PathBuf> {
    let dest = dest_dir.join(format!("video_{video_id}.mp4"));

    if source_url.starts_with("http://") || source_url.starts_with("https://") {
        debug!("Downloading {} to {}", source_url, dest.display());
        let response = client.get(source_url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        fs::write(&dest, &bytes).await?;
    } else {
        let root = public_root.ok_or_else(|| {
            MediaError::download_failed(format!(
                "relative source {source_url} requires a public root"
            ))
        })?;
        let local = root.join(source_url.trim_start_matches('/'));
        debug!("Copying local source {}", local.display());
        if !local.exists() {
            return Err(MediaError::FileNotFound(local));
        }
        fs::copy(&local, &dest).await?;
    }

    Ok(dest)
}
