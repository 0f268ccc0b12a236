// src/git/mod.rs

//! Git working tree access
//!
//! The import pipeline only needs three things from version control:
//! create directories, write files with exact permission bits, and add a
//! path to the index. [`Worktree`] is that contract; [`GitWorktree`]
//! implements it over a `git2` repository. Committing and branch creation
//! live in [`commit`].

pub mod commit;
mod worktree;

pub use commit::commit_import;
pub use worktree::GitWorktree;

use crate::error::Result;
use std::path::Path;

/// Mutations the materializer performs on a working tree
///
/// Paths are relative to the tree root.
pub trait Worktree {
    /// Create a directory and any missing parents
    fn create_dir_all(&mut self, path: &Path, mode: u32) -> Result<()>;

    /// Open-or-truncate-create `path`, write all of `contents`, and close it
    fn write_file(&mut self, path: &Path, contents: &[u8], mode: u32) -> Result<()>;

    /// Add `path` to the pending commit
    fn stage(&mut self, path: &Path) -> Result<()>;
}
