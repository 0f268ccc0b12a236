// src/git/commit.rs

//! Commit a materialized import onto its distribution branch

use super::{GitWorktree, Worktree};
use crate::config::ImportConfig;
use crate::error::{Error, Result};
use crate::import::MaterializedTree;
use git2::{Oid, Signature};
use tracing::info;

/// Commit the staged import and point every import branch at it
///
/// The ignore file is staged here, since the materializer leaves it out
/// of the index. The first branch receives the commit (parented on its
/// current tip when the branch already exists); any further branches are
/// moved to the same commit. HEAD ends up on the first branch.
pub fn commit_import(
    worktree: &mut GitWorktree,
    tree: &MaterializedTree,
    config: &ImportConfig,
    message: &str,
) -> Result<Oid> {
    let (first, rest) = tree
        .branches
        .split_first()
        .ok_or_else(|| Error::GitError("no branch to commit the import to".to_string()))?;

    worktree.stage(&tree.ignore_file)?;

    let repo = worktree.repository();
    let tree_oid = repo.index()?.write_tree()?;
    let git_tree = repo.find_tree(tree_oid)?;
    let signature = Signature::now(&config.author_name, &config.author_email)?;

    let refname = format!("refs/heads/{}", first);
    let parent = match repo.find_reference(&refname) {
        Ok(reference) => Some(reference.peel_to_commit()?),
        Err(e) if e.code() == git2::ErrorCode::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo
        .commit(Some(&refname), &signature, &signature, message, &git_tree, &parents)
        .map_err(|e| Error::GitError(format!("could not commit to {}: {}", first, e)))?;

    let commit = repo.find_commit(oid)?;
    for branch in rest {
        repo.branch(branch, &commit, true)
            .map_err(|e| Error::GitError(format!("could not create branch {}: {}", branch, e)))?;
    }

    repo.set_head(&refname)?;

    info!("Committed {} on {}", oid, first);
    Ok(oid)
}
