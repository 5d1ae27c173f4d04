//! JSON file helpers
//!
//! Data files are replaced atomically: contents go to a sibling `.tmp` file
//! that is synced and then renamed over the target, so a crash leaves either
//! the old file or the new one.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::HouseholdError;

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> HouseholdError {
    HouseholdError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read a JSON document, or `T::default()` when the file doesn't exist yet
pub fn read_json<T, P>(path: P) -> Result<T, HouseholdError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        tracing::debug!(path = %path.display(), "Data file missing, starting empty");
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Write a JSON document atomically, creating parent directories as needed
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), HouseholdError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let result = write_synced(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| storage_error("replace", path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced<T: Serialize>(path: &Path, data: &T) -> Result<(), HouseholdError> {
    let file = File::create(path).map_err(|e| storage_error("create", path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer.flush().map_err(|e| storage_error("flush", path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Roster {
        names: Vec<String>,
    }

    #[test]
    fn test_read_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let roster: Roster = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(roster, Roster::default());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("roster.json");
        let roster = Roster {
            names: vec!["Ana".into(), "Bruno".into()],
        };

        write_json_atomic(&path, &roster).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join("roster.json.tmp").exists());
        assert_eq!(read_json::<Roster, _>(&path).unwrap(), roster);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("roster.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json::<Roster, _>(&path).unwrap_err();
        assert!(matches!(err, HouseholdError::Storage(_)));
    }
}
