//! File system scratch space implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::ScratchError;
use super::traits::{matching_names, pick_candidate, ScratchReader, ScratchSpace};
use super::types::UniqueId;

/// Scratch space backed by a single directory on disk.
pub struct FsScratchSpace {
    dir: PathBuf,
}

impl FsScratchSpace {
    /// Creates a scratch space rooted at `dir` without touching the disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the scratch space, creating the directory if absent.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self, ScratchError> {
        let scratch = Self::new(dir);
        fs::create_dir_all(&scratch.dir)
            .await
            .map_err(|source| ScratchError::DirectoryCreationFailed {
                path: scratch.dir.clone(),
                source,
            })?;
        Ok(scratch)
    }

    /// Names of the regular files directly under the root.
    async fn file_names(&self) -> Result<Vec<String>, ScratchError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| Self::not_found_or_io(&self.dir, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn not_found_or_io(path: &Path, e: std::io::Error) -> ScratchError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ScratchError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ScratchError::Io(e)
        }
    }
}

#[async_trait]
impl ScratchSpace for FsScratchSpace {
    fn name(&self) -> &str {
        "fs"
    }

    fn root(&self) -> &Path {
        &self.dir
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ScratchError> {
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
            return Err(ScratchError::InvalidName {
                name: file_name.to_string(),
            });
        }
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).await?;
        Ok(path)
    }

    async fn find_by_suffix(
        &self,
        unique_id: &UniqueId,
        preferred_ext: &str,
    ) -> Result<Option<PathBuf>, ScratchError> {
        let names = self.file_names().await?;
        Ok(pick_candidate(names, unique_id, preferred_ext).map(|n| self.dir.join(n)))
    }

    async fn find_all_by_suffix(&self, unique_id: &UniqueId) -> Result<Vec<PathBuf>, ScratchError> {
        let names = self.file_names().await?;
        Ok(matching_names(names, unique_id)
            .into_iter()
            .map(|n| self.dir.join(n))
            .collect())
    }

    async fn rename_extension(&self, path: &Path, ext: &str) -> Result<PathBuf, ScratchError> {
        let destination = path.with_extension(ext);
        if destination == path {
            return Ok(destination);
        }
        fs::rename(path, &destination).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScratchError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ScratchError::rename_failed(path.to_path_buf(), destination.clone(), e)
            }
        })?;
        Ok(destination)
    }

    async fn open(&self, path: &Path) -> Result<ScratchReader, ScratchError> {
        let file = fs::File::open(path)
            .await
            .map_err(|e| Self::not_found_or_io(path, e))?;
        Ok(Box::new(file))
    }

    async fn size(&self, path: &Path) -> Result<u64, ScratchError> {
        let meta = fs::metadata(path)
            .await
            .map_err(|e| Self::not_found_or_io(path, e))?;
        Ok(meta.len())
    }

    async fn delete(&self, path: &Path) -> Result<(), ScratchError> {
        fs::remove_file(path)
            .await
            .map_err(|e| Self::not_found_or_io(path, e))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }
}
