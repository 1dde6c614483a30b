//! Recursive file enumeration with pruning.
//!
//! The collector is the leaf dependency of every read operation: given a
//! root directory it yields the text files under it, depth-first, skipping
//! version-control and dependency-manager directories entirely (they are
//! pruned, not descended into). Traversal is lazy and restartable —
//! [`Collector::walk`] returns a fresh iterator each call, so callers that
//! stop early (bounded excerpts per file) pay only for what they consume.
//!
//! A root that does not exist yields an empty sequence, not an error:
//! artifact roots are optional, and their absence just means the producing
//! skill has not run yet.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into, at any depth.
const PRUNED_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "target",
    "vendor",
    "__pycache__",
];

/// Recognized text extensions. Binary and unknown formats are out of scope.
const TEXT_EXTENSIONS: &[&str] = &["md", "txt", "json", "yaml", "yml", "toml"];

fn is_pruned(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| PRUNED_DIRS.contains(&name))
            .unwrap_or(false)
}

pub struct Collector {
    include: GlobSet,
}

impl Collector {
    pub fn new() -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for ext in TEXT_EXTENSIONS {
            builder.add(Glob::new(&format!("**/*.{}", ext))?);
        }
        Ok(Self {
            include: builder.build()?,
        })
    }

    /// Walk `root` depth-first, yielding eligible file paths.
    ///
    /// The root entry itself is exempt from pruning so that a project
    /// intentionally rooted at a directory with an excluded name still
    /// enumerates.
    pub fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_pruned(e))
            .filter_map(|e| e.ok())
            .filter(move |e| {
                e.file_type().is_file() && self.include.is_match(e.path())
            })
            .map(|e| e.into_path())
    }
}
