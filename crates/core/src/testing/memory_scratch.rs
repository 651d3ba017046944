//! In-memory scratch space for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::scratch::{
    matching_names, pick_candidate, ScratchError, ScratchReader, ScratchSpace, UniqueId,
};

/// Scratch space keeping file contents in a map, keyed by virtual path.
#[derive(Debug)]
pub struct MemoryScratchSpace {
    root: PathBuf,
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl Default for MemoryScratchSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScratchSpace {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/memory/downloads"),
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Names of all stored files, sorted.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .keys()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Contents of a stored file.
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        // A panicking test thread must not hide the map from the others.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn not_found(path: &Path) -> ScratchError {
        ScratchError::NotFound {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl ScratchSpace for MemoryScratchSpace {
    fn name(&self) -> &str {
        "memory"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ScratchError> {
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
            return Err(ScratchError::InvalidName {
                name: file_name.to_string(),
            });
        }
        let path = self.root.join(file_name);
        self.lock().insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn find_by_suffix(
        &self,
        unique_id: &UniqueId,
        preferred_ext: &str,
    ) -> Result<Option<PathBuf>, ScratchError> {
        let names = self.file_names();
        Ok(pick_candidate(names, unique_id, preferred_ext).map(|n| self.root.join(n)))
    }

    async fn find_all_by_suffix(&self, unique_id: &UniqueId) -> Result<Vec<PathBuf>, ScratchError> {
        Ok(matching_names(self.file_names(), unique_id)
            .into_iter()
            .map(|n| self.root.join(n))
            .collect())
    }

    async fn rename_extension(&self, path: &Path, ext: &str) -> Result<PathBuf, ScratchError> {
        let destination = path.with_extension(ext);
        let mut files = self.lock();
        let bytes = files.remove(path).ok_or_else(|| Self::not_found(path))?;
        files.insert(destination.clone(), bytes);
        Ok(destination)
    }

    async fn open(&self, path: &Path) -> Result<ScratchReader, ScratchError> {
        let bytes = self.contents(path).ok_or_else(|| Self::not_found(path))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    async fn size(&self, path: &Path) -> Result<u64, ScratchError> {
        self.lock()
            .get(path)
            .map(|b| b.len() as u64)
            .ok_or_else(|| Self::not_found(path))
    }

    async fn delete(&self, path: &Path) -> Result<(), ScratchError> {
        self.lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path))
    }

    async fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_write_find_rename_delete() {
        let scratch = MemoryScratchSpace::new();
        let id = UniqueId::new("0123abcd");
        let path = scratch.write("Song_0123abcd.m4a", b"audio").await.unwrap();
        scratch.write("Song_0123abcd.m4a.part", b"partial").await.unwrap();

        let found = scratch.find_by_suffix(&id, "mp3").await.unwrap();
        assert_eq!(found.as_deref(), Some(path.as_path()));
        assert_eq!(scratch.find_all_by_suffix(&id).await.unwrap().len(), 2);

        let renamed = scratch.rename_extension(&path, "mp3").await.unwrap();
        assert!(!scratch.exists(&path).await);
        assert_eq!(scratch.size(&renamed).await.unwrap(), 5);

        let mut buf = Vec::new();
        scratch.open(&renamed).await.unwrap().read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"audio");

        scratch.delete(&renamed).await.unwrap();
        assert!(matches!(
            scratch.delete(&renamed).await,
            Err(ScratchError::NotFound { .. })
        ));
    }
}
