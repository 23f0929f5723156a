use crate::error::PlanError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file together with the moment its photo was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDateEntry {
    pub path: PathBuf,
    pub captured_at: NaiveDateTime,
}

impl FileDateEntry {
    pub fn new(path: impl Into<PathBuf>, captured_at: NaiveDateTime) -> Self {
        Self {
            path: path.into(),
            captured_at,
        }
    }

    /// Builds an entry from a date that may be missing, so that undated files
    /// are turned away before planning.
    pub fn from_optional(
        path: impl Into<PathBuf>,
        captured_at: Option<NaiveDateTime>,
    ) -> Result<Self, PlanError> {
        let path = path.into();
        match captured_at {
            Some(captured_at) => Ok(Self { path, captured_at }),
            None => Err(PlanError::MissingTimestamp { path }),
        }
    }
}
