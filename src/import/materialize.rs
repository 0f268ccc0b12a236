// src/import/materialize.rs

//! Write decoded entries into a working tree and stage them

use super::classify::destination_path;
use super::{ImportPlan, MaterializedTree};
use crate::config::ImportConfig;
use crate::error::Result;
use crate::git::Worktree;
use crate::packages::traits::SourcePackage;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Mode for the SPECS and SOURCES directories
const DIR_MODE: u32 = 0o755;
/// Mode for the ignore-list file
const IGNORE_FILE_MODE: u32 = 0o644;

/// Populate `worktree` from an import plan
///
/// Each entry is written, then staged unless it is an excluded source.
/// The ignore file is written last and left unstaged. Entry names that
/// would leave their directory fail the whole run before anything is
/// written. Otherwise the first error aborts; entries already written stay
/// on disk.
pub fn materialize<P, W>(
    plan: &ImportPlan<P>,
    worktree: &mut W,
    config: &ImportConfig,
) -> Result<MaterializedTree>
where
    P: SourcePackage,
    W: Worktree,
{
    // Resolve every target before touching the tree
    let targets = plan
        .entries
        .iter()
        .map(|(name, contents)| {
            destination_path(name, &config.specs_dir, &config.sources_dir)
                .map(|path| (name, contents, path))
        })
        .collect::<Result<Vec<_>>>()?;

    let specs_dir = Path::new(&config.specs_dir);
    let sources_dir = Path::new(&config.sources_dir);
    worktree.create_dir_all(specs_dir, DIR_MODE)?;
    worktree.create_dir_all(sources_dir, DIR_MODE)?;

    let modes = plan.package.file_modes();
    let excluded: HashSet<&str> = plan.excluded.iter().map(|s| s.name.as_str()).collect();

    let mut written = Vec::with_capacity(targets.len());
    let mut staged = Vec::with_capacity(targets.len());

    for (name, contents, path) in targets {
        let mode = match modes.get(name) {
            Some(mode) => *mode,
            None => {
                debug!("No metadata for {}, using mode {:o}", name, config.fallback_mode);
                config.fallback_mode
            }
        };

        if let Some(parent) = path.parent()
            && parent != specs_dir
            && parent != sources_dir
        {
            worktree.create_dir_all(parent, DIR_MODE)?;
        }

        worktree.write_file(&path, contents, mode)?;
        written.push(path.clone());

        if excluded.contains(name) {
            debug!("Not staging excluded source {}", path.display());
            continue;
        }

        worktree.stage(&path)?;
        staged.push(path);
    }

    let ignore_file = PathBuf::from(&config.ignore_file);
    let ignore_content = ignore_list(plan, config);
    worktree.write_file(&ignore_file, ignore_content.as_bytes(), IGNORE_FILE_MODE)?;

    let branches = vec![config.branch_name(plan.reference.version())];

    info!(
        "Materialized {} files ({} staged, {} ignored) for branch {}",
        written.len(),
        staged.len(),
        plan.excluded.len(),
        branches[0]
    );

    Ok(MaterializedTree {
        written,
        staged,
        ignore_file,
        branches,
    })
}

/// One `SOURCES/<name>` line per excluded source
pub fn ignore_list<P: SourcePackage>(plan: &ImportPlan<P>, config: &ImportConfig) -> String {
    plan.excluded
        .iter()
        .map(|source| format!("{}/{}\n", config.sources_dir, source.name))
        .collect()
}
