use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Scratch directory holding one lesson's intermediate audio files.
///
/// `purge` removes it explicitly; if the value is dropped without being
/// purged (early return, panic unwinding) `Drop` removes it instead.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    purged: bool,
}

impl WorkDir {
    pub async fn create(root: &Path) -> io::Result<Self> {
        let path = root.join(format!("lesson-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&path).await?;
        tracing::debug!(path = %path.display(), "Work directory created");
        Ok(Self {
            path,
            purged: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `bytes` to `name` inside the directory and return the full path
    pub async fn write(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let file = self.path.join(name);
        tokio::fs::write(&file, bytes).await?;
        Ok(file)
    }

    /// Remove the directory now. On failure it stays marked as live and
    /// `Drop` tries again.
    pub async fn purge(&mut self) -> io::Result<()> {
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Work directory purged"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        self.purged = true;
        Ok(())
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if self.purged {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::error!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to purge work directory"
                );
            }
        }
    }
}
