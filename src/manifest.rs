//! Updates the version-bearing file before committing.
//!
//! Three shapes are supported: a JSON manifest with a top-level "version"
//! field (package.json style), a TOML manifest with a `version = "..."`
//! assignment (Cargo.toml style, formatting preserved), and a plain marker
//! file whose whole content is the version.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::domain::Version;
use crate::error::{AutoCommitError, Result};

/// Write the new version into the file at `path`.
pub fn write_version(path: &Path, version: &Version) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => write_json_manifest(path, version),
        Some("toml") => write_toml_manifest(path, version),
        _ => write_marker_file(path, version),
    }
}

fn write_json_manifest(path: &Path, version: &Version) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let mut manifest: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        AutoCommitError::version(format!("Cannot parse '{}': {}", path.display(), e))
    })?;

    let object = manifest.as_object_mut().ok_or_else(|| {
        AutoCommitError::version(format!("'{}' is not a JSON object", path.display()))
    })?;
    object.insert(
        "version".to_string(),
        serde_json::Value::String(version.to_string()),
    );

    let formatted = serde_json::to_string_pretty(&manifest)
        .map_err(|e| AutoCommitError::version(e.to_string()))?;
    fs::write(path, formatted + "\n")?;
    Ok(())
}

fn write_toml_manifest(path: &Path, version: &Version) -> Result<()> {
    let content = fs::read_to_string(path)?;

    // Replace only the first version assignment; dependency tables below
    // keep their own version keys untouched.
    let re = Regex::new(r#"(?m)^version\s*=\s*"[^"]*""#)
        .map_err(|e| AutoCommitError::version(e.to_string()))?;

    if !re.is_match(&content) {
        return Err(AutoCommitError::version(format!(
            "'{}' has no version field to update",
            path.display()
        )));
    }

    let replacement = format!("version = \"{}\"", version);
    let updated = re.replace(&content, replacement.as_str());
    fs::write(path, updated.as_bytes())?;
    Ok(())
}

fn write_marker_file(path: &Path, version: &Version) -> Result<()> {
    fs::write(path, format!("{}\n", version))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_file_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");

        write_version(&path, &Version::new(1, 5, 0)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1.5.0\n");
    }

    #[test]
    fn test_marker_file_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("VERSION");

        fs::write(&path, "1.4.2\n").unwrap();
        write_version(&path, &Version::new(1, 5, 0)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1.5.0\n");
    }

    #[test]
    fn test_json_manifest_updates_version_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");

        fs::write(&path, r#"{"name": "demo", "version": "1.4.2"}"#).unwrap();
        write_version(&path, &Version::new(1, 5, 0)).unwrap();

        let updated: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(updated["version"], "1.5.0");
        assert_eq!(updated["name"], "demo");
    }

    #[test]
    fn test_json_manifest_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        assert!(write_version(&path, &Version::new(1, 0, 0)).is_err());
    }

    #[test]
    fn test_toml_manifest_replaces_first_version_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cargo.toml");

        let content = "[package]\nname = \"demo\"\nversion = \"0.1.0\"\n\n[dependencies]\nserde = { version = \"1.0\" }\n";
        fs::write(&path, content).unwrap();

        write_version(&path, &Version::new(0, 2, 0)).unwrap();
        let updated = fs::read_to_string(&path).unwrap();
        assert!(updated.contains("version = \"0.2.0\""));
        assert!(updated.contains("serde = { version = \"1.0\" }"));
        assert!(updated.contains("name = \"demo\""));
    }

    #[test]
    fn test_toml_manifest_without_version_field_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\nname = \"demo\"\n").unwrap();

        let err = write_version(&path, &Version::new(1, 0, 0)).unwrap_err();
        assert!(err.to_string().contains("no version field"));
    }
}
