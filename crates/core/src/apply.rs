use crate::planner::{lexical_key, RenamePlan};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The two filesystem calls a plan needs.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as taken
        fs::symlink_metadata(path).is_ok()
    }

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplyResult {
    /// Entries whose name changes (or would, in a dry run).
    pub changed: usize,
    pub unchanged: usize,
    pub dry_run: bool,
}

pub fn apply_plan(plan: &RenamePlan, options: &ApplyOptions) -> Result<ApplyResult> {
    apply_plan_with(&mut RealFileSystem, plan, options)
}

/// Checks the plan, then renames each entry once, in plan order.
///
/// A failed rename stops the run. Files renamed before it stay renamed.
pub fn apply_plan_with<F: FileSystem>(
    fs: &mut F,
    plan: &RenamePlan,
    options: &ApplyOptions,
) -> Result<ApplyResult> {
    preflight(fs, plan)?;

    let changed = plan.entries.iter().filter(|entry| entry.changed()).count();
    let result = ApplyResult {
        changed,
        unchanged: plan.entries.len() - changed,
        dry_run: options.dry_run,
    };
    if options.dry_run {
        return Ok(result);
    }

    for entry in &plan.entries {
        fs.rename(&entry.original_path, &entry.target_path)
            .with_context(|| {
                format!(
                    "could not rename {} to {}",
                    entry.original_path.display(),
                    entry.target_path.display()
                )
            })?;
        if entry.changed() {
            log::info!(
                "renamed {} -> {}",
                entry.original_path.display(),
                entry.target_path.display()
            );
        }
    }

    Ok(result)
}

/// Walks the plan in order, tracking which paths earlier entries free up,
/// and refuses any rename that would land on an occupied path.
fn preflight<F: FileSystem>(fs: &F, plan: &RenamePlan) -> Result<()> {
    let mut vacated = HashSet::<PathBuf>::new();
    let mut claimed = HashSet::<PathBuf>::new();

    for entry in &plan.entries {
        let target = lexical_key(&entry.target_path);
        if !claimed.insert(target.clone()) {
            bail!(
                "more than one file would be renamed to {}",
                entry.target_path.display()
            );
        }
        if !entry.changed() {
            continue;
        }
        if fs.exists(&entry.target_path) && !vacated.contains(&target) {
            bail!(
                "{} already exists, refusing to overwrite it with {}",
                entry.target_path.display(),
                entry.original_path.display()
            );
        }
        vacated.remove(&target);
        vacated.insert(lexical_key(&entry.original_path));
    }

    Ok(())
}
