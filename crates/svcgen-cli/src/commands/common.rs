//! Helpers shared by commands.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use svcgen_model::declaration::ParsedFile;
use tracing::debug;

/// Reads a parsed declaration from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid
/// declaration.
pub fn load_declaration(path: &Path) -> Result<ParsedFile> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read declaration {}", path.display()))?;
    let file: ParsedFile = serde_json::from_str(&source)
        .with_context(|| format!("invalid declaration {}", path.display()))?;
    debug!(
        path = %path.display(),
        package = %file.package,
        interfaces = file.interfaces.len(),
        "loaded declaration"
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_declaration() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("decl.json");
        fs::write(&path, r#"{"package": "echo", "interfaces": [{"name": "EchoService"}]}"#).unwrap();

        let file = load_declaration(&path).unwrap();
        assert_eq!(file.package, "echo");
        assert_eq!(file.interfaces[0].name, "EchoService");
    }

    #[test]
    fn test_missing_declaration() {
        let err = load_declaration(Path::new("/nonexistent/decl.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read declaration"));
    }

    #[test]
    fn test_malformed_declaration() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("decl.json");
        fs::write(&path, "{not json").unwrap();
        let err = load_declaration(&path).unwrap_err();
        assert!(err.to_string().contains("invalid declaration"));
    }
}
