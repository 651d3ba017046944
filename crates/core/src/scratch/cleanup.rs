//! Post-response deletion of scratch files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::error::ScratchError;
use super::traits::ScratchSpace;
use super::types::UniqueId;

/// Deletes a scratch file if present. Never fails.
pub async fn cleanup(scratch: &dyn ScratchSpace, path: &Path) {
    match scratch.delete(path).await {
        Ok(()) => debug!("Cleaned up scratch file {:?}", path),
        Err(ScratchError::NotFound { .. }) => {
            debug!("Scratch file {:?} already removed", path)
        }
        Err(e) => debug!("Ignoring cleanup failure for {:?}: {}", path, e),
    }
}

/// Deletes every file carrying `unique_id` except `keep`. Never fails.
///
/// Returns how many files were found for deletion.
pub async fn cleanup_unique_id(
    scratch: &dyn ScratchSpace,
    unique_id: &UniqueId,
    keep: Option<&Path>,
) -> usize {
    let paths = match scratch.find_all_by_suffix(unique_id).await {
        Ok(paths) => paths,
        Err(e) => {
            debug!("Ignoring listing failure while cleaning {}: {}", unique_id, e);
            return 0;
        }
    };

    let mut removed = 0;
    for path in paths.iter().filter(|p| Some(p.as_path()) != keep) {
        cleanup(scratch, path).await;
        removed += 1;
    }
    removed
}

/// Schedules deletion of `path` for when the returned guard is dropped.
pub fn register_for_cleanup(scratch: Arc<dyn ScratchSpace>, path: PathBuf) -> CleanupGuard {
    CleanupGuard {
        scratch,
        target: Some(CleanupTarget::File(path)),
    }
}

/// Schedules deletion of every file carrying `unique_id` for when the
/// returned guard is dropped.
pub fn register_id_for_cleanup(scratch: Arc<dyn ScratchSpace>, unique_id: UniqueId) -> CleanupGuard {
    CleanupGuard {
        scratch,
        target: Some(CleanupTarget::UniqueId(unique_id)),
    }
}

#[derive(Debug)]
enum CleanupTarget {
    File(PathBuf),
    UniqueId(UniqueId),
}

/// Deletes its file, or every file of its unique id, when dropped.
///
/// Move the guard into whatever consumes the file (e.g. a response body
/// stream); deletion then happens once the consumer is done or abandoned.
/// Dropping outside a tokio runtime leaves the files in place.
pub struct CleanupGuard {
    scratch: Arc<dyn ScratchSpace>,
    target: Option<CleanupTarget>,
}

impl CleanupGuard {
    /// The guarded file, for a file guard.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Some(CleanupTarget::File(path)) => Some(path.as_path()),
            _ => None,
        }
    }

    /// Gives up ownership without deleting anything.
    pub fn disarm(mut self) {
        self.target = None;
    }
}

impl std::fmt::Debug for CleanupGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupGuard")
            .field("scratch", &self.scratch.name())
            .field("target", &self.target)
            .finish()
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let Some(target) = self.target.take() else {
            return;
        };
        let scratch = Arc::clone(&self.scratch);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    match target {
                        CleanupTarget::File(path) => cleanup(scratch.as_ref(), &path).await,
                        CleanupTarget::UniqueId(id) => {
                            let removed = cleanup_unique_id(scratch.as_ref(), &id, None).await;
                            if removed > 0 {
                                debug!("Removed {} abandoned files of {}", removed, id);
                            }
                        }
                    }
                });
            }
            Err(_) => debug!("No runtime available to clean up {:?}", target),
        }
    }
}
