use crate::error::MetadataError;
use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Date tags in order of preference. `DateTime` is rewritten by editors, so
/// the capture tags win when present.
const DATE_TAGS: &[Tag] = &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Reads the capture date embedded in `path`.
pub fn extract_capture_date(path: &Path) -> Result<NaiveDateTime, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .map_err(|source| MetadataError::Exif {
            path: path.to_path_buf(),
            source,
        })?;

    // A blank or garbled tag falls through to the next one; the first such
    // problem is reported only if no tag holds a usable date.
    let mut problem = None;
    for &tag in DATE_TAGS {
        let Some(raw) = date_value(&exif, tag) else {
            continue;
        };
        log::debug!("{}: {} = {:?}", path.display(), tag, raw);

        if is_blank_date(&raw) {
            problem.get_or_insert_with(|| MetadataError::EmptyDate {
                path: path.to_path_buf(),
            });
            continue;
        }
        match parse_date(&raw) {
            Some(date) => return Ok(date),
            None => {
                problem.get_or_insert_with(|| MetadataError::InvalidDate {
                    path: path.to_path_buf(),
                    value: raw,
                });
            }
        }
    }

    Err(problem.unwrap_or_else(|| MetadataError::MissingDate {
        path: path.to_path_buf(),
    }))
}

fn date_value(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let raw = match &field.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default(),
        _ => field.display_value().to_string(),
    };
    Some(raw)
}

/// EXIF writes unknown dates as blanks with the colons kept.
fn is_blank_date(raw: &str) -> bool {
    raw.trim_matches(|c: char| c == '\0' || c == ':' || c.is_whitespace())
        .is_empty()
}

pub(crate) fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim().trim_end_matches('\0');

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    candidates
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
}
