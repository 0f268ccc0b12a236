// src/git/worktree.rs

use super::Worktree;
use crate::error::{Error, Result};
use git2::Repository;
use std::fs::{self, DirBuilder, OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A non-bare git repository used as an import target
pub struct GitWorktree {
    repo: Repository,
    root: PathBuf,
}

impl GitWorktree {
    /// Initialize a repository at `path` (or reopen an existing one)
    pub fn init(path: &Path) -> Result<Self> {
        let repo = Repository::init(path)
            .map_err(|e| Error::GitError(format!("could not init git repo at {}: {}", path.display(), e)))?;
        Self::from_repo(repo)
    }

    /// Open an existing repository at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)
            .map_err(|e| Error::GitError(format!("could not open git repo at {}: {}", path.display(), e)))?;
        Self::from_repo(repo)
    }

    fn from_repo(repo: Repository) -> Result<Self> {
        let root = repo
            .workdir()
            .ok_or_else(|| Error::GitError("could not get worktree: repository is bare".to_string()))?
            .to_path_buf();
        debug!("Using git worktree at {}", root.display());
        Ok(Self { repo, root })
    }

    /// Root directory of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Join a tree-relative path onto the root
    ///
    /// Only plain components are accepted, so the result is always inside
    /// the working tree.
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty()
            || !path.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(Error::IoError(format!(
                "refusing path outside the worktree: {}",
                path.display()
            )));
        }
        Ok(self.root.join(path))
    }

    /// Paths currently in the index, sorted
    pub fn staged_paths(&self) -> Result<Vec<String>> {
        let index = self.repo.index()?;
        let mut paths: Vec<String> = index
            .iter()
            .map(|entry| String::from_utf8_lossy(&entry.path).to_string())
            .collect();
        paths.sort();
        Ok(paths)
    }
}

impl Worktree for GitWorktree {
    fn create_dir_all(&mut self, path: &Path, mode: u32) -> Result<()> {
        let full = self.resolve(path)?;
        DirBuilder::new()
            .recursive(true)
            .mode(mode)
            .create(&full)
            .map_err(|e| Error::IoError(format!("could not create {} dir: {}", path.display(), e)))
    }

    fn write_file(&mut self, path: &Path, contents: &[u8], mode: u32) -> Result<()> {
        let full = self.resolve(path)?;
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .mode(mode)
            .open(&full)
            .map_err(|e| Error::IoError(format!("could not create file {}: {}", path.display(), e)))?;

        file.write_all(contents)
            .map_err(|e| Error::IoError(format!("could not write to file {}: {}", path.display(), e)))?;

        // Creation mode is filtered by the umask and ignored for existing files
        fs::set_permissions(&full, Permissions::from_mode(mode))
            .map_err(|e| Error::IoError(format!("could not set mode on {}: {}", path.display(), e)))?;

        file.sync_all()
            .map_err(|e| Error::IoError(format!("could not close file {}: {}", path.display(), e)))
    }

    fn stage(&mut self, path: &Path) -> Result<()> {
        let mut index = self.repo.index()?;
        index
            .add_path(path)
            .map_err(|e| Error::GitError(format!("could not add {}: {}", path.display(), e)))?;
        index.write()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_reopen() {
        let dir = TempDir::new().unwrap();
        let tree = GitWorktree::init(dir.path()).unwrap();
        assert!(tree.root().join(".git").is_dir());
        assert!(tree.staged_paths().unwrap().is_empty());

        assert!(GitWorktree::open(dir.path()).is_ok());
    }

    #[test]
    fn test_open_missing_repo() {
        let dir = TempDir::new().unwrap();
        let result = GitWorktree::open(&dir.path().join("nope"));
        assert!(matches!(result, Err(Error::GitError(_))));
    }

    #[test]
    fn test_write_applies_exact_mode() {
        let dir = TempDir::new().unwrap();
        let mut tree = GitWorktree::init(dir.path()).unwrap();
        tree.create_dir_all(Path::new("SOURCES"), 0o755).unwrap();
        tree.write_file(Path::new("SOURCES/run.sh"), b"#!/bin/sh\n", 0o755).unwrap();
        tree.write_file(Path::new("SOURCES/data"), b"data", 0o666).unwrap();

        let mode = |p: &str| fs::metadata(dir.path().join(p)).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode("SOURCES/run.sh"), 0o755);
        assert_eq!(mode("SOURCES/data"), 0o666);
    }

    #[test]
    fn test_write_truncates_existing() {
        let dir = TempDir::new().unwrap();
        let mut tree = GitWorktree::init(dir.path()).unwrap();
        tree.write_file(Path::new("a"), b"a much longer first version", 0o644).unwrap();
        tree.write_file(Path::new("a"), b"short", 0o600).unwrap();

        assert_eq!(fs::read(dir.path().join("a")).unwrap(), b"short");
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let mut tree = GitWorktree::init(dir.path()).unwrap();
        let result = tree.write_file(Path::new("NOPE/a"), b"x", 0o644);
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_paths_outside_tree_refused() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let mut tree = GitWorktree::init(dir.path()).unwrap();
        let absolute = outside.path().join("escaped.txt");

        for path in [absolute.as_path(), Path::new("../pwn"), Path::new("./a")] {
            let result = tree.write_file(path, b"x", 0o644);
            assert!(matches!(result, Err(Error::IoError(_))), "{}", path.display());
        }
        assert!(matches!(tree.create_dir_all(Path::new("../d"), 0o755), Err(Error::IoError(_))));

        assert!(!absolute.exists());
        assert!(!dir.path().parent().unwrap().join("pwn").exists());
    }

    #[test]
    fn test_stage() {
        let dir = TempDir::new().unwrap();
        let mut tree = GitWorktree::init(dir.path()).unwrap();
        tree.create_dir_all(Path::new("SPECS"), 0o755).unwrap();
        tree.write_file(Path::new("SPECS/foo.spec"), b"Name: foo\n", 0o644).unwrap();
        tree.write_file(Path::new("untracked"), b"x", 0o644).unwrap();
        tree.stage(Path::new("SPECS/foo.spec")).unwrap();

        assert_eq!(tree.staged_paths().unwrap(), vec!["SPECS/foo.spec".to_string()]);
    }

    #[test]
    fn test_stage_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut tree = GitWorktree::init(dir.path()).unwrap();
        let result = tree.stage(Path::new("missing"));
        assert!(matches!(result, Err(Error::GitError(_))));
    }
}
