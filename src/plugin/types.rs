//! Core plugin types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::GhostManifest;

/// Manifest file name at the root of every plugin bundle.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory holding fallback icon assets inside a plugin bundle.
pub const ASSETS_DIR: &str = "assets";

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    /// File or directory name.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
}

/// Outcome of validating one plugin directory.
///
/// `is_valid` is always `has_manifest && has_content && has_background`;
/// a missing icon is recorded but never makes a plugin invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub plugin_path: PathBuf,
    pub is_valid: bool,
    pub has_manifest: bool,
    pub has_content: bool,
    pub has_background: bool,
    pub has_icon: bool,
    /// Diagnostics in the order the checks ran.
    pub errors: Vec<String>,
    /// Raw manifest JSON, present when it parsed as an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Box<RawValue>>,
}

impl ValidationResult {
    pub(crate) fn new(plugin_path: &Path) -> Self {
        Self {
            plugin_path: plugin_path.to_path_buf(),
            is_valid: false,
            has_manifest: false,
            has_content: false,
            has_background: false,
            has_icon: false,
            errors: Vec::new(),
            manifest: None,
        }
    }

    /// Decode the retained manifest into a [`GhostManifest`].
    pub fn parsed_manifest(&self) -> Option<GhostManifest> {
        self.manifest.as_ref().and_then(|raw| serde_json::from_str(raw.get()).ok())
    }

    /// Plugin directory name, used for display.
    pub fn dir_name(&self) -> String {
        self.plugin_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.plugin_path.display().to_string())
    }
}
