//! YAML Export functionality
//!
//! Exports the complete household to YAML for human-readable backup.

use std::io::Write;

use super::export_error;
use crate::error::HouseholdResult;
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full household to YAML, preceded by a comment header
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> HouseholdResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(
        writer,
        "# household-cli export\n# Generated: {}\n# App Version: {}\n",
        export.exported_at, export.app_version
    )
    .map_err(export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(export_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HouseholdPaths;
    use crate::services::ResidentService;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HouseholdPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        ResidentService::new(&storage)
            .create("Davi", None, Some("davi@pix"))
            .unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# household-cli export"));
        assert!(yaml.contains("schema_version"));
        assert!(yaml.contains("name: Davi"));

        let parsed: FullExport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.residents.len(), 1);
        assert!(parsed.validate().is_ok());
    }
}
