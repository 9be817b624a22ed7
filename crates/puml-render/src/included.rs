//! Included-file metadata for cache invalidation.

use std::path::{Path, PathBuf};

/// Insertion-ordered mapping from included file path to mtime.
///
/// Order is deterministic: each block's contribution arrives sorted by
/// path, and blocks contribute in document order. Inserting a path that is
/// already present updates its mtime but keeps its original position.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IncludedFiles {
    entries: Vec<(PathBuf, f64)>,
}

impl IncludedFiles {
    /// Insert or update a path's mtime.
    pub fn insert(&mut self, path: PathBuf, mtime: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            entry.1 = mtime;
        } else {
            self.entries.push((path, mtime));
        }
    }

    /// Look up a path's mtime.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<f64> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, mtime)| *mtime)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, f64)> {
        self.entries.iter().map(|(p, mtime)| (p.as_path(), *mtime))
    }

    /// Number of tracked files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no files are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
