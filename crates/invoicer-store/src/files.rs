//! JSON file helpers shared by every store.
//!
//! Writes go to a sibling temp file first and are renamed over the target,
//! so a crash mid-write never leaves a half-written JSON file behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Outcome of reading a JSON file that may not exist or may be damaged.
#[derive(Debug)]
pub enum JsonRead {
    Missing,
    Parsed(Value),
    /// File exists but is not valid JSON.
    Corrupt(String),
}

pub fn read_json(path: &Path) -> StoreResult<JsonRead> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(JsonRead::Missing),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(JsonRead::Parsed(value)),
        Err(e) => Ok(JsonRead::Corrupt(e.to_string())),
    }
}

/// Pretty-prints `value` to `path`, replacing the whole file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| StoreError::json(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, &json).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;

    debug!(path = %path.display(), bytes = json.len(), "Wrote JSON file");
    Ok(())
}

/// Copies a damaged file aside before it gets overwritten.
pub fn preserve_corrupt(path: &Path) -> StoreResult<PathBuf> {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    let backup = PathBuf::from(name);
    fs::copy(path, &backup).map_err(|e| StoreError::io(&backup, e))?;
    Ok(backup)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let read = read_json(&dir.path().join("nope.json")).unwrap();
        assert!(matches!(read, JsonRead::Missing));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.json");
        write_json(&path, &serde_json::json!({ "a": 1 })).unwrap();

        match read_json(&path).unwrap() {
            JsonRead::Parsed(value) => assert_eq!(value["a"], 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_json(&path).unwrap(), JsonRead::Corrupt(_)));

        let backup = preserve_corrupt(&path).unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
    }
}
