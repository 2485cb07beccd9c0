use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

/// Where finished lesson tracks live. Returns opaque keys that are
/// persisted next to the timeline.
#[async_trait]
pub trait AudioStore: Send + Sync {
    async fn put(&self, lesson_id: Uuid, audio: &[u8]) -> Result<String, String>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, String>;

    async fn delete(&self, key: &str) -> Result<(), String>;
}

/// Stores tracks as `<root>/<lesson_id>.mp3`
pub struct LocalAudioStore {
    root: PathBuf,
}

impl LocalAudioStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, String> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(format!("Invalid audio key: {}", key));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl AudioStore for LocalAudioStore {
    async fn put(&self, lesson_id: Uuid, audio: &[u8]) -> Result<String, String> {
        let key = format!("{}.mp3", lesson_id);
        let path = self.path_for(&key)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| format!("Failed to create audio directory: {}", e))?;
        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

        tracing::info!(key = %key, size = audio.len(), "Lesson audio stored");
        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to delete {}: {}", path.display(), e)),
        }
    }
}
