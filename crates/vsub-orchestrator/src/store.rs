//! In-memory project store.
//!
//! Durable persistence is out of scope for this service; the store keeps the
//! repository shape a database-backed implementation would slot into. All
//! webhook writes go through [`ProjectStore::update`], which is a no-op for
//! ids that no longer exist.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use vsub_models::{VideoId, VideoProject};

/// Shared map of video projects keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Arc<RwLock<HashMap<VideoId, VideoProject>>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a project.
    pub async fn insert(&self, project: VideoProject) {
        let mut projects = self.projects.write().await;
        projects.insert(project.id.clone(), project);
    }

    /// Fetch a snapshot of a project.
    pub async fn get(&self, id: &VideoId) -> Option<VideoProject> {
        let projects = self.projects.read().await;
        projects.get(id).cloned()
    }

    /// Mutate a project in place, returning the closure's result.
    ///
    /// `None` means the id is unknown; callers on the webhook path treat
    /// that as a silent no-op, callers on the API path as a 404.
    pub async fn update<F, R>(&self, id: &VideoId, f: F) -> Option<R>
    where
        F: FnOnce(&mut VideoProject) -> R,
    {
        let mut projects = self.projects.write().await;
        projects.get_mut(id).map(f)
    }

    /// Remove a project, returning whether it existed.
    pub async fn remove(&self, id: &VideoId) -> bool {
        let mut projects = self.projects.write().await;
        projects.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = ProjectStore::new();
        let project = VideoProject::new("Demo", "/uploads/demo.mp4", 20.0);
        let id = project.id.clone();

        store.insert(project).await;

        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.title, "Demo");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let store = ProjectStore::new();
        let result = store
            .update(&VideoId::from("ghost"), |p| p.set_output_url("/out.mp4"))
            .await;
        assert!(result.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let store = ProjectStore::new();
        let project = VideoProject::new("Demo", "/uploads/demo.mp4", 20.0);
        let id = project.id.clone();
        store.insert(project).await;

        store
            .update(&id, |p| p.set_output_url("/uploads/rendered.mp4"))
            .await
            .unwrap();

        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.output_url.as_deref(), Some("/uploads/rendered.mp4"));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = ProjectStore::new();
        let project = VideoProject::new("Demo", "/uploads/demo.mp4", 20.0);
        let id = project.id.clone();
        store.insert(project).await;

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
    }
}
