//! Broken asset tracking

use stagecast_core::QueueEntry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Returns the paths that do not resolve on disk, in input order
pub fn validate_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.exists())
        .map(Path::to_path_buf)
        .collect()
}

/// Set of media paths known to be unreachable
///
/// Fed by path validation and by load errors reported from the output
/// surface. Slideshow playback passes over entries found here.
#[derive(Debug, Clone, Default)]
pub struct BrokenAssets {
    paths: HashSet<PathBuf>,
}

impl BrokenAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a path broken, returning true if it was not already
    pub fn mark(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn clear(&mut self, path: &Path) -> bool {
        self.paths.remove(path)
    }

    pub fn is_broken(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Quick slides have no backing file and are never broken
    pub fn is_entry_broken(&self, entry: &QueueEntry) -> bool {
        entry.path().is_some_and(|p| self.is_broken(p))
    }

    /// Re-checks `paths` on disk, marking missing ones and clearing any that
    /// are back; returns the missing ones
    pub fn revalidate<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<PathBuf> {
        let missing = validate_paths(paths);
        for path in paths {
            self.clear(path.as_ref());
        }
        for path in &missing {
            self.mark(path.clone());
        }
        missing
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
