use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-file failure while reading a capture date. Collected and reported,
/// never fatal for the batch on its own.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("{}: cannot open file: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: error reading EXIF metadata: {source}", .path.display())]
    Exif {
        path: PathBuf,
        #[source]
        source: exif::Error,
    },
    #[error("{}: no date in EXIF metadata", .path.display())]
    MissingDate { path: PathBuf },
    #[error("{}: empty date", .path.display())]
    EmptyDate { path: PathBuf },
    #[error("{}: incorrect date {value:?}", .path.display())]
    InvalidDate { path: PathBuf, value: String },
    #[error("{}: no such file or directory", .path.display())]
    NotFound { path: PathBuf },
}

impl MetadataError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. }
            | Self::Exif { path, .. }
            | Self::MissingDate { path }
            | Self::EmptyDate { path }
            | Self::InvalidDate { path, .. }
            | Self::NotFound { path } => path,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("no files to rename")]
    NoEntries,
    #[error("{}: no capture date", .path.display())]
    MissingTimestamp { path: PathBuf },
    #[error("prefix {0:?} contains characters not allowed in file names")]
    InvalidPrefix(String),
    #[error("start index {0} is too large to number every file")]
    StartIndexTooLarge(usize),
}
