//! Types for scratch files.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Container every download is normalized to.
pub const TARGET_EXTENSION: &str = "mp3";

/// Length of a unique id in characters.
const UNIQUE_ID_LEN: usize = 8;

/// Short random disambiguator embedded in scratch file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UniqueId(String);

impl UniqueId {
    /// Generates a fresh id from the first 8 hex characters of a v4 UUID.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(UNIQUE_ID_LEN);
        Self(id)
    }

    /// Wraps an existing id, e.g. one parsed back out of a file name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `_<id>.` marker that identifies this id inside a file name.
    pub fn marker(&self) -> String {
        format!("_{}.", self.0)
    }

    /// Whether the given file name was produced for this id.
    pub fn matches_file_name(&self, name: &str) -> bool {
        name.contains(&self.marker())
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file written into the scratch space by a download strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProducedFile {
    pub path: PathBuf,
    pub unique_id: UniqueId,
    /// Current suffix without the leading dot (empty if none).
    pub extension: String,
}

impl ProducedFile {
    pub fn new(path: PathBuf, unique_id: UniqueId) -> Self {
        let extension = extension_of(&path);
        Self {
            path,
            unique_id,
            extension,
        }
    }

    /// File name including extension.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension.eq_ignore_ascii_case(ext)
    }
}

/// Extension of a path without the dot, or empty.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}
