// src/import/mod.rs

//! SRPM import pipeline
//!
//! An import runs as a strict sequence of stages, each producing an
//! immutable value for the next:
//!
//! 1. Decode the payload (`rpm2cpio` + cpio reader) into [`DecodedEntries`]
//! 2. Read package metadata (sources, patches, file modes)
//! 3. Classify declared sources into tracked and excluded
//! 4. Materialize the entries into a working tree ([`MaterializedTree`])
//! 5. Optionally record lookaside digests and commit
//!
//! Stages 1-3 build an [`ImportPlan`]. Any error stops the run; nothing
//! is retried and nothing already written is undone.

pub mod classify;
pub mod lookaside;
pub mod materialize;

pub use classify::{
    ExcludedSource, classify_sources, destination_for, entry_path, is_archive_like,
};
pub use lookaside::{LookasideRecord, record_lookaside};
pub use materialize::materialize;

use crate::config::ImportConfig;
use crate::error::Result;
use crate::git::{GitWorktree, commit_import};
use crate::packages::payload::{DecodedEntries, decode_package};
use crate::packages::rpm::RpmSourcePackage;
use crate::packages::traits::SourcePackage;
use git2::Oid;
use std::path::{Path, PathBuf};
use tracing::info;

/// The source package to import and the distribution version it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    path: PathBuf,
    version: u32,
}

impl PackageReference {
    pub fn new(path: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            path: path.into(),
            version,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Target distribution version
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Name the import is recorded under (the package file name)
    pub fn import_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Everything known about a package before anything is written
#[derive(Debug, Clone)]
pub struct ImportPlan<P> {
    pub reference: PackageReference,
    pub package: P,
    pub entries: DecodedEntries,
    pub excluded: Vec<ExcludedSource>,
}

impl<P: SourcePackage> ImportPlan<P> {
    /// Combine decoded entries with metadata and classify the sources
    pub fn new(reference: PackageReference, package: P, entries: DecodedEntries) -> Self {
        let excluded = classify_sources(package.sources());
        Self {
            reference,
            package,
            entries,
            excluded,
        }
    }

    /// Whether an entry name is an excluded source
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|source| source.name == name)
    }
}

/// What materialization left in the working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedTree {
    /// Every path written, in write order
    pub written: Vec<PathBuf>,
    /// Paths added to the index, a subset of `written`
    pub staged: Vec<PathBuf>,
    /// Ignore-list file (written, not staged)
    pub ignore_file: PathBuf,
    /// Branches the import should be committed to
    pub branches: Vec<String>,
}

/// Decode, read metadata and classify a source RPM
pub fn prepare(reference: PackageReference, config: &ImportConfig) -> Result<ImportPlan<RpmSourcePackage>> {
    info!("Preparing import of {}", reference.path().display());

    let entries = decode_package(reference.path(), &config.converter)?;
    let package = RpmSourcePackage::parse(reference.path())?;

    Ok(ImportPlan::new(reference, package, entries))
}

/// Optional stages of a full import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Write and stage the lookaside metadata file
    pub lookaside: bool,
    /// Commit the result onto the import branch
    pub commit: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            lookaside: true,
            commit: true,
        }
    }
}

/// Result of a full import run
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub tree: MaterializedTree,
    pub lookaside: Vec<LookasideRecord>,
    pub commit: Option<Oid>,
}

/// Run the remaining stages for a prepared plan against a git worktree
pub fn import_plan<P: SourcePackage>(
    plan: &ImportPlan<P>,
    worktree: &mut GitWorktree,
    config: &ImportConfig,
    options: ImportOptions,
) -> Result<ImportOutcome> {
    let tree = materialize(plan, worktree, config)?;

    let lookaside = if options.lookaside {
        record_lookaside(plan, worktree, config)?
    } else {
        Vec::new()
    };

    let commit = if options.commit {
        let message = format!("import {}", plan.reference.import_name());
        Some(commit_import(worktree, &tree, config, &message)?)
    } else {
        None
    };

    Ok(ImportOutcome {
        tree,
        lookaside,
        commit,
    })
}

/// Import a source RPM into a git repository at `dest`
pub fn run_import(
    reference: PackageReference,
    dest: &Path,
    config: &ImportConfig,
    options: ImportOptions,
) -> Result<ImportOutcome> {
    let plan = prepare(reference, config)?;
    let mut worktree = GitWorktree::init(dest)?;
    import_plan(&plan, &mut worktree, config, options)
}
