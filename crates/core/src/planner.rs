use crate::error::PlanError;
use crate::metadata::FileDateEntry;
use crate::sanitize::check_prefix;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "DSC_";
pub const DEFAULT_START_INDEX: usize = 1;
pub const DATE_NAME_FORMAT: &str = "%Y-%m-%d %H.%M.%S";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    /// `<prefix><zero-padded counter>.<ext>`
    #[default]
    Sequential,
    /// `YYYY-MM-DD HH.MM.SS[-n].<ext>`
    DateAsName,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanOptions {
    pub prefix: String,
    pub mode: NamingMode,
    pub start_index: usize,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            mode: NamingMode::Sequential,
            start_index: DEFAULT_START_INDEX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameEntry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub captured_at: NaiveDateTime,
}

impl RenameEntry {
    pub fn changed(&self) -> bool {
        lexical_key(&self.original_path) != lexical_key(&self.target_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub planned: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub options: PlanOptions,
    pub entries: Vec<RenameEntry>,
    pub stats: RenameStats,
}

/// Lazily yields one [`RenameEntry`] per input, oldest capture first.
#[derive(Debug)]
pub struct RenamePlanIter {
    entries: std::vec::IntoIter<FileDateEntry>,
    options: PlanOptions,
    index: usize,
    width: usize,
    current_stamp: Option<String>,
    suffixes: HashMap<(PathBuf, String), usize>,
}

/// Sorts `entries` by capture date and returns the rename sequence.
///
/// The sort is stable, so files captured in the same second keep the order
/// they were given in.
pub fn plan_renames(
    mut entries: Vec<FileDateEntry>,
    options: &PlanOptions,
) -> Result<RenamePlanIter, PlanError> {
    if entries.is_empty() {
        return Err(PlanError::NoEntries);
    }
    if options.mode == NamingMode::Sequential {
        check_prefix(&options.prefix)?;
    }

    let width = match options.mode {
        NamingMode::Sequential => counter_width(options.start_index, entries.len())
            .ok_or(PlanError::StartIndexTooLarge(options.start_index))?,
        NamingMode::DateAsName => 1,
    };

    entries.sort_by_key(|entry| entry.captured_at);

    Ok(RenamePlanIter {
        entries: entries.into_iter(),
        options: options.clone(),
        index: 0,
        width,
        current_stamp: None,
        suffixes: HashMap::new(),
    })
}

pub fn generate_plan(
    entries: Vec<FileDateEntry>,
    options: &PlanOptions,
) -> Result<RenamePlan, PlanError> {
    let entries: Vec<RenameEntry> = plan_renames(entries, options)?.collect();
    let stats = RenameStats {
        planned: entries.len(),
        unchanged: entries.iter().filter(|entry| !entry.changed()).count(),
    };

    Ok(RenamePlan {
        options: options.clone(),
        entries,
        stats,
    })
}

impl Iterator for RenamePlanIter {
    type Item = RenameEntry;

    fn next(&mut self) -> Option<RenameEntry> {
        let entry = self.entries.next()?;
        let dir = parent_dir(&entry.path);

        let base = match self.options.mode {
            // cannot overflow: counter_width checked the last number
            NamingMode::Sequential => format!(
                "{}{:0width$}",
                self.options.prefix,
                self.options.start_index + self.index,
                width = self.width
            ),
            NamingMode::DateAsName => self.date_name(&dir, &entry),
        };
        self.index += 1;

        Some(RenameEntry {
            target_path: dir.join(with_extension(base, &entry.path)),
            original_path: entry.path,
            captured_at: entry.captured_at,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for RenamePlanIter {}

impl RenamePlanIter {
    fn date_name(&mut self, dir: &Path, entry: &FileDateEntry) -> String {
        let stamp = entry.captured_at.format(DATE_NAME_FORMAT).to_string();
        if self.current_stamp.as_deref() != Some(stamp.as_str()) {
            self.suffixes.clear();
            self.current_stamp = Some(stamp.clone());
        }

        // A RAW and its JPEG from the same shot share the name; only files
        // that would land on the same path get a suffix.
        let key = (lexical_key(dir), extension_key(&entry.path));
        let seen = self.suffixes.entry(key).or_insert(0);
        let name = if *seen == 0 {
            stamp
        } else {
            format!("{}-{}", stamp, seen)
        };
        *seen += 1;
        name
    }
}

/// Digits needed for the largest number handed out, or `None` when that
/// number does not fit in a `usize`.
fn counter_width(start_index: usize, count: usize) -> Option<usize> {
    let last = start_index.checked_add(count.saturating_sub(1))?;
    Some(last.checked_ilog10().map_or(1, |digits| digits as usize + 1))
}

/// Drops `.` components so `./a.jpg` and `a.jpg` compare equal.
pub(crate) fn lexical_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn with_extension(base: String, original: &Path) -> OsString {
    let mut name = OsString::from(base);
    if let Some(ext) = original.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

fn extension_key(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
