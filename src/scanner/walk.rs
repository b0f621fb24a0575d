use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::ItemFilter;
use crate::error::ItemError;

/// One admitted directory or file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub name: String,
    /// 1 for the root's children.
    pub depth: usize,
    pub is_dir: bool,
}

impl WalkEntry {
    fn from_dir_entry(entry: &walkdir::DirEntry) -> Self {
        Self {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            depth: entry.depth(),
            is_dir: is_directory(entry),
        }
    }
}

/// Real directories and links that point at one. Links are never descended.
fn is_directory(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

/// Receives the events of one walk, in depth-first, name-sorted order.
pub trait WalkVisitor {
    fn visit_dir(&mut self, _entry: &WalkEntry) {}

    fn visit_file(&mut self, _entry: &WalkEntry) {}

    /// A directory (or entry) at `depth` could not be read. Its subtree is
    /// skipped; the walk continues with its siblings.
    fn visit_error(&mut self, _error: &ItemError, _depth: usize) {}
}

/// Both visitors see every event, first `A` then `B`.
impl<A: WalkVisitor, B: WalkVisitor> WalkVisitor for (A, B) {
    fn visit_dir(&mut self, entry: &WalkEntry) {
        self.0.visit_dir(entry);
        self.1.visit_dir(entry);
    }

    fn visit_file(&mut self, entry: &WalkEntry) {
        self.0.visit_file(entry);
        self.1.visit_file(entry);
    }

    fn visit_error(&mut self, error: &ItemError, depth: usize) {
        self.0.visit_error(error, depth);
        self.1.visit_error(error, depth);
    }
}

/// The single traversal primitive every pass goes through.
///
/// Siblings are visited in byte-wise name order with directories and files
/// interleaved. Entries the filter rejects are pruned before they are
/// visited, so an excluded directory is never descended into. Symbolic links
/// are never followed: a link to a directory is reported as an empty
/// directory, any other link as a file.
pub struct TreeWalker<'a, F: ItemFilter> {
    root: &'a Path,
    filter: &'a F,
    max_depth: Option<usize>,
}

impl<'a, F: ItemFilter> TreeWalker<'a, F> {
    #[must_use]
    pub const fn new(root: &'a Path, filter: &'a F) -> Self {
        Self {
            root,
            filter,
            max_depth: None,
        }
    }

    /// Stop listing below `depth` (the root's children are depth 1).
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn walk<V: WalkVisitor + ?Sized>(&self, visitor: &mut V) {
        let mut walker = WalkDir::new(self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let entries = walker.into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || self
                    .filter
                    .should_include(entry.path(), is_directory(entry))
        });

        for item in entries {
            match item {
                Ok(entry) => {
                    let entry = WalkEntry::from_dir_entry(&entry);
                    if entry.is_dir {
                        visitor.visit_dir(&entry);
                    } else {
                        visitor.visit_file(&entry);
                    }
                }
                Err(err) => {
                    let (error, depth) = self.classify(&err);
                    warn!(path = %error.path().display(), %error, "skipping unreadable entry");
                    visitor.visit_error(&error, depth);
                }
            }
        }
    }

    fn classify(&self, err: &walkdir::Error) -> (ItemError, usize) {
        let path = err.path().unwrap_or(self.root).to_path_buf();
        let depth = path
            .strip_prefix(self.root)
            .map_or_else(|_| err.depth(), |rel| rel.components().count());
        let error = err.io_error().map_or_else(
            || ItemError::ReadFailure {
                path: path.clone(),
                reason: err.to_string(),
            },
            |io| ItemError::from_io(&path, io),
        );
        (error, depth)
    }
}

/// Counts admitted items; the count pass of a scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ItemCounter {
    pub directories: u64,
    pub files: u64,
}

impl ItemCounter {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.directories + self.files
    }
}

impl WalkVisitor for ItemCounter {
    fn visit_dir(&mut self, _entry: &WalkEntry) {
        self.directories += 1;
    }

    fn visit_file(&mut self, _entry: &WalkEntry) {
        self.files += 1;
    }
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
