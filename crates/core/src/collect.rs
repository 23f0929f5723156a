use crate::error::MetadataError;
use crate::exif_reader::extract_capture_date;
use crate::metadata::FileDateEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when a directory is expanded. Files named
/// explicitly are always taken.
const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "jpe", "tif", "tiff", "heic", "heif", "avif", "png", "webp", "dng", "nef",
    "nrw", "cr2", "arw", "orf", "pef", "srw", "rw2",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    pub recursive: bool,
    pub include_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub scanned_files: usize,
    pub skipped_hidden: usize,
    pub skipped_unsupported: usize,
}

#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub files: Vec<PathBuf>,
    pub failures: Vec<MetadataError>,
    pub stats: CollectStats,
}

#[derive(Debug, Default)]
pub struct DateScan {
    pub entries: Vec<FileDateEntry>,
    pub failures: Vec<MetadataError>,
}

/// Turns command-line paths into the list of files to date.
pub fn collect_inputs(paths: &[PathBuf], options: &CollectOptions) -> Result<CollectedInputs> {
    let mut out = CollectedInputs::default();
    let mut seen = HashSet::<PathBuf>::new();

    for path in paths {
        if path.is_dir() {
            let found = if options.recursive {
                walk_dir(path, options.include_hidden, &mut out.stats)?
            } else {
                list_dir(path, options.include_hidden, &mut out.stats)?
            };
            for file in found {
                push_unique(&mut out.files, &mut seen, file);
            }
        } else if path.exists() {
            out.stats.scanned_files += 1;
            push_unique(&mut out.files, &mut seen, path.clone());
        } else {
            out.failures.push(MetadataError::NotFound { path: path.clone() });
        }
    }

    Ok(out)
}

/// Reads the capture date of every file, keeping failures apart so the
/// caller can decide whether the batch goes ahead.
pub fn read_capture_dates(files: &[PathBuf]) -> DateScan {
    let mut scan = DateScan::default();
    for path in files {
        match extract_capture_date(path) {
            Ok(captured_at) => scan.entries.push(FileDateEntry::new(path.clone(), captured_at)),
            Err(err) => {
                log::debug!("{}: {:?}", path.display(), err);
                scan.failures.push(err);
            }
        }
    }
    scan
}

fn push_unique(files: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>, path: PathBuf) {
    let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    if seen.insert(key) {
        files.push(path);
    } else {
        log::warn!("{} given more than once, renaming it once", path.display());
    }
}

fn walk_dir(root: &Path, include_hidden: bool, stats: &mut CollectStats) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || include_hidden
                || !entry.file_type().is_dir()
                || !is_hidden(entry.path())
        });

    for entry in walker {
        let entry =
            entry.with_context(|| format!("could not walk directory: {}", root.display()))?;
        // Links to files are taken, as in `list_dir`; linked directories are
        // not descended into.
        if !entry.path().is_file() {
            continue;
        }
        if let Some(path) = accept_file(entry.path(), include_hidden, stats) {
            out.push(path);
        }
    }

    Ok(out)
}

fn list_dir(root: &Path, include_hidden: bool, stats: &mut CollectStats) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("could not read directory: {}", root.display()))?
    {
        let entry =
            entry.with_context(|| format!("could not read entry in: {}", root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(path) = accept_file(&path, include_hidden, stats) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn accept_file(path: &Path, include_hidden: bool, stats: &mut CollectStats) -> Option<PathBuf> {
    stats.scanned_files += 1;
    if is_hidden(path) && !include_hidden {
        stats.skipped_hidden += 1;
        return None;
    }
    if !is_photo(path) {
        log::warn!("skipping {}: not a supported photo type", path.display());
        stats.skipped_unsupported += 1;
        return None;
    }
    Some(path.to_path_buf())
}

fn is_photo(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            PHOTO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
