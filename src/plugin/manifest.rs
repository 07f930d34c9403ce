//! Ghost manifest parsing.
//!
//! A ghost manifest is a `manifest.json` file at the root of a plugin bundle
//! describing the ghost's identity and presentation metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PluginError, PluginResult};

/// Ghost manifest. Every field is optional at the parse level and defaults
/// to an empty string when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostManifest {
    /// Unique identifier of the ghost.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Version string.
    pub version: String,
    /// Description.
    pub description: String,
    /// Author.
    pub author: String,
    /// Shortcut key hint (e.g. "Alt+1").
    pub shortcut: String,
    /// Icon path, relative to the plugin directory or absolute.
    pub icon: String,
}

impl GhostManifest {
    /// Parse a manifest from raw JSON bytes.
    ///
    /// `origin` is only used to label parse errors.
    pub fn from_slice(bytes: &[u8], origin: &Path) -> PluginResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| PluginError::Parse { path: origin.to_path_buf(), message: e.to_string() })
    }

    /// Read and parse a manifest file.
    pub fn from_file(path: &Path) -> PluginResult<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| PluginError::from_io(path, e))?;
        if metadata.is_dir() {
            return Err(PluginError::Parse {
                path: path.to_path_buf(),
                message: "manifest path is a directory".to_string(),
            });
        }

        let bytes = std::fs::read(path).map_err(|e| PluginError::from_io(path, e))?;
        let manifest = Self::from_slice(&bytes, path)?;

        tracing::debug!(path = %path.display(), id = %manifest.id, name = %manifest.name, "Read manifest");
        Ok(manifest)
    }

    /// Whether the manifest declares an icon at all.
    pub fn has_icon(&self) -> bool {
        !self.icon.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_MANIFEST: &str = r#"{
        "id": "sleepy-cat",
        "name": "Sleepy Cat",
        "version": "1.2.0",
        "description": "Naps on your cursor",
        "author": "community",
        "shortcut": "Alt+1",
        "icon": "assets/cat.png"
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest =
            GhostManifest::from_slice(SAMPLE_MANIFEST.as_bytes(), Path::new("manifest.json"))
                .unwrap();

        assert_eq!(manifest.id, "sleepy-cat");
        assert_eq!(manifest.name, "Sleepy Cat");
        assert_eq!(manifest.shortcut, "Alt+1");
        assert!(manifest.has_icon());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let manifest =
            GhostManifest::from_slice(br#"{"id":"a"}"#, Path::new("manifest.json")).unwrap();
        assert_eq!(manifest.id, "a");
        assert!(manifest.name.is_empty());
        assert!(manifest.version.is_empty());
        assert!(!manifest.has_icon());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let manifest = GhostManifest::from_slice(
            br#"{"id":"a","permissions":["clipboard"]}"#,
            Path::new("manifest.json"),
        )
        .unwrap();
        assert_eq!(manifest.id, "a");
    }

    #[test]
    fn test_malformed_manifest_is_parse_error() {
        let result = GhostManifest::from_slice(b"{not json", Path::new("manifest.json"));
        assert!(matches!(result, Err(PluginError::Parse { .. })));
    }

    #[test]
    fn test_from_file_missing() {
        let temp = TempDir::new().unwrap();
        let result = GhostManifest::from_file(&temp.path().join("manifest.json"));
        assert!(matches!(result, Err(PluginError::NotFound(_))));
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        std::fs::write(&path, SAMPLE_MANIFEST).unwrap();

        let manifest = GhostManifest::from_file(&path).unwrap();
        assert_eq!(manifest.version, "1.2.0");
    }
}
