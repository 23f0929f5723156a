use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;

pub const TAG_DATE_TIME: u16 = 0x0132;
pub const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

/// Writes a little-endian TIFF whose only IFD holds one ASCII field.
pub fn write_tiff(path: &Path, tag: u16, value: &[u8]) {
    write_ifds(path, &[(tag, value.to_vec())], &[]);
}

/// Writes a little-endian TIFF with ASCII fields in IFD0 and, when `exif`
/// is not empty, in an Exif IFD linked from IFD0. Values get their NUL
/// terminator here. Tags must be given in ascending order.
pub fn write_tiff_with_exif(path: &Path, ifd0: &[(u16, &str)], exif: &[(u16, &str)]) {
    let terminated = |fields: &[(u16, &str)]| -> Vec<(u16, Vec<u8>)> {
        fields
            .iter()
            .map(|(tag, value)| {
                let mut bytes = value.as_bytes().to_vec();
                bytes.push(0);
                (*tag, bytes)
            })
            .collect()
    };
    write_ifds(path, &terminated(ifd0), &terminated(exif));
}

fn write_ifds(path: &Path, ifd0: &[(u16, Vec<u8>)], exif: &[(u16, Vec<u8>)]) {
    let ifd_len = |entries: usize| 2 + 12 * entries + 4;
    let ifd0_entries = ifd0.len() + usize::from(!exif.is_empty());
    let exif_offset = 8 + ifd_len(ifd0_entries);
    let exif_len = if exif.is_empty() { 0 } else { ifd_len(exif.len()) };
    let data_offset = exif_offset + exif_len;

    let mut bytes = Vec::new();
    let mut data = Vec::new();
    bytes.extend_from_slice(b"II*\0");
    bytes.extend_from_slice(&8u32.to_le_bytes());

    bytes.extend_from_slice(&(ifd0_entries as u16).to_le_bytes());
    for (tag, value) in ifd0 {
        push_ascii(&mut bytes, &mut data, data_offset, *tag, value);
    }
    if !exif.is_empty() {
        bytes.extend_from_slice(&TAG_EXIF_IFD_POINTER.to_le_bytes());
        bytes.extend_from_slice(&TYPE_LONG.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&(exif_offset as u32).to_le_bytes());
    }
    bytes.extend_from_slice(&0u32.to_le_bytes());

    if !exif.is_empty() {
        bytes.extend_from_slice(&(exif.len() as u16).to_le_bytes());
        for (tag, value) in exif {
            push_ascii(&mut bytes, &mut data, data_offset, *tag, value);
        }
        bytes.extend_from_slice(&0u32.to_le_bytes());
    }

    assert_eq!(bytes.len(), data_offset);
    bytes.extend_from_slice(&data);
    fs::write(path, bytes).expect("write tiff");
}

/// Appends one ASCII entry; values over four bytes go to the data area
/// that starts at `data_offset` in the file.
fn push_ascii(bytes: &mut Vec<u8>, data: &mut Vec<u8>, data_offset: usize, tag: u16, value: &[u8]) {
    bytes.extend_from_slice(&tag.to_le_bytes());
    bytes.extend_from_slice(&TYPE_ASCII.to_le_bytes());
    bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
    if value.len() <= 4 {
        let mut inline = [0u8; 4];
        inline[..value.len()].copy_from_slice(value);
        bytes.extend_from_slice(&inline);
    } else {
        bytes.extend_from_slice(&((data_offset + data.len()) as u32).to_le_bytes());
        data.extend_from_slice(value);
        // offsets stay word aligned
        if data.len() % 2 == 1 {
            data.push(0);
        }
    }
}

pub fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid datetime")
}
