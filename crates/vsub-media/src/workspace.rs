//! Job-scoped scratch directories.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use vsub_models::VideoId;

use crate::error::MediaResult;

/// Scratch directory for a single job, removed on drop.
///
/// Every job downloads its own copy of the source and writes intermediates
/// here, so concurrent jobs never share mutable files.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: TempDir,
}

impl JobWorkspace {
    /// Create a workspace labelled with the job kind and video.
    pub fn create(label: &str, video_id: &VideoId) -> MediaResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("{label}_{video_id}_"))
            .tempdir()?;
        Ok(Self { dir })
    }

    /// Workspace root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_workspace_removed_on_drop() {
        let id = VideoId::from_string("vid1");
        let ws = JobWorkspace::create("render", &id).unwrap();
        let root = ws.path().to_path_buf();

        tokio::fs::write(ws.file("scratch.txt"), b"tmp").await.unwrap();
        assert!(root.exists());

        drop(ws);
        assert!(!root.exists());
    }

    #[test]
    fn test_workspace_prefix_carries_video_id() {
        let id = VideoId::from_string("vid2");
        let ws = JobWorkspace::create("filmstrip", &id).unwrap();
        let name = ws.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("filmstrip_vid2_"));
    }
}
