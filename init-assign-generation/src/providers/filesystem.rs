//! Native filesystem provider implementation using `tokio::fs`.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::errors::{GenerationError, Result};

/// Native filesystem provider using `tokio::fs` for async file operations.
///
/// # Thread Safety
/// This provider is `Send + Sync` and can be safely shared across threads.
#[derive(Debug, Clone)]
pub struct NativeFileSystemProvider;

impl NativeFileSystemProvider {
    /// Read the entire contents of a file as a UTF-8 string.
    pub async fn read_file(path: impl AsRef<Path>) -> Result<String> {
        fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| GenerationError::file_system("read", path.as_ref(), e))
    }

    /// Replace the contents of a file.
    ///
    /// The new content is written to a sibling temporary file carrying the
    /// original's permissions, then renamed over the original, so a failed
    /// write never truncates the source. The temporary file is removed again
    /// when the rename fails.
    pub async fn write_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = path.as_ref();
        let mut staged = path.as_os_str().to_owned();
        staged.push(".init-assign.tmp");
        let staged = PathBuf::from(staged);

        let permissions = match fs::metadata(path).await {
            Ok(metadata) => Some(metadata.permissions()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(GenerationError::file_system("inspect", path, e)),
        };

        fs::write(&staged, content)
            .await
            .map_err(|e| GenerationError::file_system("write", &staged, e))?;

        if let Some(permissions) = permissions {
            if let Err(e) = fs::set_permissions(&staged, permissions).await {
                discard(&staged).await;
                return Err(GenerationError::file_system("set permissions on", &staged, e));
            }
        }

        if let Err(e) = fs::rename(&staged, path).await {
            discard(&staged).await;
            return Err(GenerationError::file_system("replace", path, e));
        }
        Ok(())
    }

    /// Check if a file exists.
    pub async fn file_exists(path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(GenerationError::file_system("check existence", path, e)),
        }
    }
}

async fn discard(staged: &Path) {
    if let Err(e) = fs::remove_file(staged).await {
        log::warn!("Could not remove {}: {}", staged.display(), e);
    }
}
