pub mod completions;
pub mod generate;
pub mod man_pages;
pub mod registry;
pub mod render;
pub mod show;
pub mod validate;

use stackmod_schema::{parse_document_file, ClusterDocument};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_OUTPUT_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn load_document(path: &Path) -> Result<ClusterDocument, String> {
    parse_document_file(path).map_err(|e| format!("config error: {e}"))
}

pub fn write_atomic(dest: &Path, content: &str) -> Result<(), String> {
    let dir = dest
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp =
        NamedTempFile::new_in(&dir).map_err(|e| format!("output error: write temp file: {e}"))?;
    use std::io::Write;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("output error: write temp file: {e}"))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("output error: fsync temp file: {e}"))?;
    tmp.persist(dest)
        .map_err(|e| format!("output error: persist {}: {}", dest.display(), e.error))?;
    Ok(())
}

pub fn colorize_status(ok: bool) -> String {
    use console::Style;
    if ok {
        Style::new().green().apply_to("ok").to_string()
    } else {
        Style::new().red().bold().apply_to("FAILED").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_pretty_serializes_object() {
        let val = serde_json::json!({"cluster": "Falcon"});
        let result = json_pretty(&val).unwrap();
        assert!(result.contains("\"cluster\""));
        assert!(result.contains("\"Falcon\""));
    }

    #[test]
    fn load_document_reports_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("missing.yml")).unwrap_err();
        assert!(err.starts_with("config error:"), "{err}");
    }

    #[test]
    fn load_document_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clusters.ini");
        std::fs::write(&path, "[Falcon]\n").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(err.contains("unsupported configuration format"), "{err}");
    }

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("falcon.lua");
        write_atomic(&dest, "first").unwrap();
        write_atomic(&dest, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "second");
    }

    #[test]
    fn write_atomic_missing_dir_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("absent").join("falcon.lua");
        let err = write_atomic(&dest, "x").unwrap_err();
        assert!(err.starts_with("output error:"), "{err}");
    }

    #[test]
    fn colorize_status_keeps_text() {
        assert!(colorize_status(true).contains("ok"));
        assert!(colorize_status(false).contains("FAILED"));
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_SUCCESS, EXIT_FAILURE);
        assert_ne!(EXIT_FAILURE, EXIT_CONFIG_ERROR);
        assert_ne!(EXIT_CONFIG_ERROR, EXIT_OUTPUT_ERROR);
    }
}
