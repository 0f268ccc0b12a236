// src/import/lookaside.rs

//! Content digests for sources kept out of git
//!
//! Excluded sources are not committed, so the commit records their
//! SHA-256 instead, in a `.<package>.metadata` file at the tree root. The
//! content itself is left for a separate lookaside store.

use super::ImportPlan;
use crate::config::ImportConfig;
use crate::error::Result;
use crate::git::Worktree;
use crate::hash::Hash;
use crate::packages::traits::SourcePackage;
use std::path::PathBuf;
use tracing::{debug, warn};

const METADATA_FILE_MODE: u32 = 0o644;

/// Digest of one excluded source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookasideRecord {
    pub name: String,
    /// Path of the source inside the working tree
    pub path: PathBuf,
    pub sha256: Hash,
    pub size: u64,
}

/// Name of the metadata file for a package
pub fn metadata_file_name(package_name: &str) -> String {
    format!(".{}.metadata", package_name)
}

/// Hash every excluded source that was decoded and record the digests
///
/// Sources declared but missing from the payload are skipped. The
/// metadata file is written and staged even when it ends up empty.
pub fn record_lookaside<P, W>(
    plan: &ImportPlan<P>,
    worktree: &mut W,
    config: &ImportConfig,
) -> Result<Vec<LookasideRecord>>
where
    P: SourcePackage,
    W: Worktree,
{
    let mut records = Vec::with_capacity(plan.excluded.len());

    for source in &plan.excluded {
        let Some(content) = plan.entries.get(&source.name) else {
            warn!("Excluded source {} is not in the package payload", source.name);
            continue;
        };

        let mut hasher = source.hasher.clone();
        hasher.update(content);
        let size = hasher.bytes_consumed();
        let sha256 = hasher.finalize();
        debug!("Lookaside {} {} ({} bytes)", source.name, sha256.to_prefixed_string(), size);

        records.push(LookasideRecord {
            name: source.name.clone(),
            path: PathBuf::from(&config.sources_dir).join(&source.name),
            sha256,
            size,
        });
    }

    let content: String = records
        .iter()
        .map(|r| format!("{} {}\n", r.sha256, r.path.display()))
        .collect();

    let metadata_path = PathBuf::from(metadata_file_name(plan.package.name()));
    worktree.write_file(&metadata_path, content.as_bytes(), METADATA_FILE_MODE)?;
    worktree.stage(&metadata_path)?;

    Ok(records)
}
