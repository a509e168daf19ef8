//! Filesystem feedback audio store.
//!
//! Clips live under `<base>/<session_id>/` as MP3 files and are served under
//! `<url_prefix>/<session_id>/<file>`:
//!
//! ```text
//! <base>/
//!   <session_id>/
//!     welcome.mp3
//!     feedback-<uuid>.mp3
//! ```

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::domain::foundation::WorkSessionId;
use crate::ports::{AudioKind, FeedbackAudioStore, StorageError};

/// Stores feedback audio on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFeedbackAudioStore {
    base_path: PathBuf,
    url_prefix: String,
}

impl LocalFeedbackAudioStore {
    /// # Example
    /// ```ignore
    /// let store = LocalFeedbackAudioStore::new("./data/audio", "/audio");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P, url_prefix: impl Into<String>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    fn file_name(kind: AudioKind) -> String {
        match kind {
            AudioKind::Welcome => "welcome.mp3".to_string(),
            AudioKind::Feedback => format!("feedback-{}.mp3", Uuid::new_v4()),
        }
    }

    /// Maps a served URL back to a file under `base_path`.
    fn resolve(&self, url: &str) -> Result<PathBuf, StorageError> {
        let relative = url
            .strip_prefix(&self.url_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::InvalidPath(url.to_string()))?;

        let relative = Path::new(relative);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath(url.to_string()));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl FeedbackAudioStore for LocalFeedbackAudioStore {
    async fn store(
        &self,
        session_id: &WorkSessionId,
        kind: AudioKind,
        audio: &[u8],
    ) -> Result<String, StorageError> {
        let dir = self.base_path.join(session_id.to_string());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        let file_name = Self::file_name(kind);
        fs::write(dir.join(&file_name), audio)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(format!("{}/{}/{}", self.url_prefix, session_id, file_name))
    }

    async fn load(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(url)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(url.to_string()))
            }
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let path = self.resolve(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::Io(e.to_string())),
        }
        // Drop the session directory once its last clip is gone.
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir(dir).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (LocalFeedbackAudioStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (LocalFeedbackAudioStore::new(dir.path(), "/audio/"), dir)
    }

    #[tokio::test]
    async fn stores_and_loads_feedback_clip() {
        let (store, dir) = store();
        let session = WorkSessionId::new();

        let url = store
            .store(&session, AudioKind::Feedback, b"ID3-fake-mp3")
            .await
            .unwrap();

        assert!(url.starts_with(&format!("/audio/{}/feedback-", session)));
        assert!(url.ends_with(".mp3"));
        assert_eq!(store.load(&url).await.unwrap(), b"ID3-fake-mp3");
        assert!(dir.path().join(session.to_string()).is_dir());
    }

    #[tokio::test]
    async fn welcome_clip_has_stable_name() {
        let (store, _dir) = store();
        let session = WorkSessionId::new();
        let url = store.store(&session, AudioKind::Welcome, b"hello").await.unwrap();
        assert_eq!(url, format!("/audio/{}/welcome.mp3", session));
    }

    #[tokio::test]
    async fn each_feedback_clip_gets_its_own_file() {
        let (store, _dir) = store();
        let session = WorkSessionId::new();
        let a = store.store(&session, AudioKind::Feedback, b"a").await.unwrap();
        let b = store.store(&session, AudioKind::Feedback, b"b").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.load(&a).await.unwrap(), b"a");
    }

    #[tokio::test]
    async fn missing_clip_is_not_found() {
        let (store, _dir) = store();
        let err = store
            .load(&format!("/audio/{}/welcome.mp3", WorkSessionId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_clip_and_empty_session_dir() {
        let (store, dir) = store();
        let session = WorkSessionId::new();
        let url = store.store(&session, AudioKind::Feedback, b"a").await.unwrap();

        store.delete(&url).await.unwrap();

        assert!(matches!(store.load(&url).await.unwrap_err(), StorageError::NotFound(_)));
        assert!(!dir.path().join(session.to_string()).exists());
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn delete_keeps_other_clips_of_the_session() {
        let (store, _dir) = store();
        let session = WorkSessionId::new();
        let welcome = store.store(&session, AudioKind::Welcome, b"w").await.unwrap();
        let feedback = store.store(&session, AudioKind::Feedback, b"f").await.unwrap();

        store.delete(&feedback).await.unwrap();

        assert_eq!(store.load(&welcome).await.unwrap(), b"w");
    }

    #[tokio::test]
    async fn rejects_traversal_and_foreign_urls() {
        let (store, _dir) = store();
        for url in ["/audio/../secret.txt", "/other/x.mp3", "/audio/", "/audio//etc/passwd"] {
            let err = store.load(url).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidPath(_)), "{}", url);
            let err = store.delete(url).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidPath(_)), "{}", url);
        }
    }
}
