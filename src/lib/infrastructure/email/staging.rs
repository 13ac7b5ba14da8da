//! Per-send staging directory for attachment files

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use uuid::Uuid;

/// A uniquely named directory for one send.
///
/// Call [`StagingDir::remove`] once the files are no longer needed. A
/// directory that is dropped without being removed, because the send was
/// cancelled or panicked, is deleted synchronously in `Drop`.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    removed: bool,
}

impl StagingDir {
    /// Creates `<root>/<uuid>`, including `root` if needed.
    pub async fn create(root: &Path) -> io::Result<Self> {
        let path = root.join(Uuid::now_v7().to_string());

        tokio::fs::create_dir_all(&path).await.map_err(|err| {
            warn!("failed to create attachment directory {}: {err}", path.display());
            err
        })?;

        debug!("created attachment directory {}", path.display());

        Ok(Self {
            path,
            removed: false,
        })
    }

    /// The directory's path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `data` to a file named after the last component of `file_name`
    pub async fn write(&self, file_name: &str, data: &[u8]) -> io::Result<PathBuf> {
        let name = Path::new(file_name.trim()).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no usable file name in {file_name:?}"),
            )
        })?;

        let path = self.path.join(name);
        tokio::fs::write(&path, data).await?;

        Ok(path)
    }

    /// Deletes the directory without blocking the runtime. Failures are only logged.
    pub async fn remove(mut self) {
        self.removed = true;

        log_removal(&self.path, tokio::fs::remove_dir_all(&self.path).await);
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.removed {
            log_removal(&self.path, std::fs::remove_dir_all(&self.path));
        }
    }
}

fn log_removal(path: &Path, result: io::Result<()>) {
    match result {
        Ok(()) => debug!("deleted attachment directory {}", path.display()),
        Err(err) => warn!(
            "failed to delete attachment directory {}: {err}",
            path.display()
        ),
    }
}
