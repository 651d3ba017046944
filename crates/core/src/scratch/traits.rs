//! Trait definitions for the scratch module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

use super::error::ScratchError;
use super::types::UniqueId;

/// Readable handle to a scratch file.
pub type ScratchReader = Box<dyn AsyncRead + Send + Unpin>;

/// Suffixes of partial files left behind by an interrupted transfer.
pub(crate) const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp"];

/// A shared, append-only space for in-flight downloads.
///
/// Names are collision free per request, so implementations need no locking
/// beyond what a single operation requires.
#[async_trait]
pub trait ScratchSpace: Send + Sync {
    /// Returns the name of this implementation.
    fn name(&self) -> &str;

    /// Root location of the scratch space.
    fn root(&self) -> &Path;

    /// Output template handed to the provider for a given id.
    ///
    /// `%(title)s` and `%(ext)s` are filled in by the provider.
    fn output_template(&self, unique_id: &UniqueId) -> String {
        self.root()
            .join(format!("%(title)s_{}.%(ext)s", unique_id))
            .to_string_lossy()
            .into_owned()
    }

    /// Writes a file directly under the root and returns its path.
    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ScratchError>;

    /// Finds a file produced for `unique_id`, preferring `preferred_ext`.
    ///
    /// Partial transfer files are ignored. Returns `None` if nothing matches.
    async fn find_by_suffix(
        &self,
        unique_id: &UniqueId,
        preferred_ext: &str,
    ) -> Result<Option<PathBuf>, ScratchError>;

    /// Every file carrying `unique_id`, partial transfer files included.
    async fn find_all_by_suffix(&self, unique_id: &UniqueId) -> Result<Vec<PathBuf>, ScratchError>;

    /// Renames a file to carry `ext` without touching its contents.
    async fn rename_extension(&self, path: &Path, ext: &str) -> Result<PathBuf, ScratchError>;

    /// Opens a file for streaming.
    async fn open(&self, path: &Path) -> Result<ScratchReader, ScratchError>;

    /// Size of a file in bytes.
    async fn size(&self, path: &Path) -> Result<u64, ScratchError>;

    /// Deletes a file.
    async fn delete(&self, path: &Path) -> Result<(), ScratchError>;

    /// Whether a file exists.
    async fn exists(&self, path: &Path) -> bool;
}

/// Whether a name is an incomplete transfer artifact.
pub(crate) fn is_partial(name: &str) -> bool {
    PARTIAL_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Picks the preferred match among candidate names for an id.
///
/// Candidates are sorted first so the choice is deterministic.
pub(crate) fn pick_candidate(
    mut names: Vec<String>,
    unique_id: &UniqueId,
    preferred_ext: &str,
) -> Option<String> {
    names.retain(|n| unique_id.matches_file_name(n) && !is_partial(n));
    names.sort();

    let preferred_suffix = format!(".{}", preferred_ext.to_ascii_lowercase());
    let preferred = names
        .iter()
        .position(|n| n.to_ascii_lowercase().ends_with(&preferred_suffix));

    match preferred {
        Some(i) => Some(names.swap_remove(i)),
        None => names.into_iter().next(),
    }
}

/// Names produced for an id, partial files included, sorted.
pub(crate) fn matching_names(mut names: Vec<String>, unique_id: &UniqueId) -> Vec<String> {
    names.retain(|n| unique_id.matches_file_name(n));
    names.sort();
    names
}
