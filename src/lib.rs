// src/lib.rs

//! SRPM import
//!
//! Turns an RPM source package into a git working tree so a
//! distribution's spec files and patches can be tracked in history.
//!
//! # Layout
//!
//! - `SPECS/`: every `*.spec` entry
//! - `SOURCES/`: everything else
//! - `.gitignore`: tar-family sources, which are written but not committed
//! - `.<name>.metadata`: SHA-256 of each ignored source
//!
//! The import is committed to a `rocky<version>` branch.

pub mod config;
mod error;
pub mod git;
pub mod hash;
pub mod import;
pub mod packages;

pub use config::ImportConfig;
pub use error::{Error, Result};
pub use git::{GitWorktree, Worktree};
pub use import::{
    ImportOptions, ImportOutcome, ImportPlan, MaterializedTree, PackageReference, materialize,
    prepare, run_import,
};
pub use packages::{DecodedEntries, SourcePackage};
