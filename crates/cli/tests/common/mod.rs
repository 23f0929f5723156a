use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// Writes a minimal little-endian TIFF carrying only a `DateTime` tag.
pub fn write_dated_tiff(path: &Path, date: &str) {
    let mut value = date.as_bytes().to_vec();
    value.push(0);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"II*\0");
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0x0132u16.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&26u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&value);

    fs::write(path, bytes).expect("write tiff");
}

/// Three photos whose date order differs from their name order.
pub fn three_photos(dir: &Path) {
    write_dated_tiff(&dir.join("file1.tif"), "2013:05:13 07:32:03");
    write_dated_tiff(&dir.join("file2.tif"), "2015:08:20 08:40:14");
    write_dated_tiff(&dir.join("file3.tif"), "2012:02:02 12:45:42");
}

/// Runs in `dir` with an empty config so the user's own file is never read.
pub fn serpyco(dir: &Path) -> Command {
    let config = dir.join("serpyco-test.toml");
    if !config.exists() {
        fs::write(&config, "").expect("write config");
    }
    let mut cmd = Command::cargo_bin("serpyco").unwrap();
    cmd.current_dir(dir).arg("--config").arg(config);
    cmd
}
