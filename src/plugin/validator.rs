//! Structural validation of plugin bundles.
//!
//! Validation never fails as a call. Every check runs and records its own
//! diagnostic so one pass can report on many broken plugins at once.

use std::path::Path;

use serde_json::value::RawValue;
use tracing::{debug, info, warn};

use super::locator::plugin_dirs;
use super::{CandidateList, PluginLocator, ValidationResult, MANIFEST_FILE};

const MISSING_MODULES: &str =
    "Neither index.js/ts nor content.js/ts and background.js/ts modules found";
const MISSING_CONTENT: &str =
    "Content module file not found: tried .js and .ts in both dist/ and root directory";
const MISSING_BACKGROUND: &str =
    "Background module file not found: tried .js and .ts in both dist/ and root directory";

/// Validate a single plugin directory.
pub fn validate_plugin(plugin_path: &Path) -> ValidationResult {
    debug!(path = %plugin_path.display(), "Validating plugin");

    let mut result = ValidationResult::new(plugin_path);

    if let Some(manifest) = check_manifest(plugin_path, &mut result) {
        check_icon(plugin_path, &manifest, &mut result);
    }
    check_modules(plugin_path, &mut result);

    result.is_valid = result.has_manifest && result.has_content && result.has_background;

    if result.errors.is_empty() {
        info!(path = %plugin_path.display(), "Plugin validation successful");
    } else {
        for error in &result.errors {
            warn!(path = %plugin_path.display(), "{error}");
        }
    }

    result
}

/// Validate every immediate subdirectory of `root`.
///
/// A missing or unreadable root yields an empty list.
pub fn validate_plugin_directory(root: &Path) -> Vec<ValidationResult> {
    debug!(root = %root.display(), "Validating plugin directory");
    plugin_dirs(root).iter().map(|dir| validate_plugin(dir)).collect()
}

/// Validate every plugin under every existing root of `locator`.
pub fn validate_all(locator: &PluginLocator) -> Vec<ValidationResult> {
    locator.existing_roots().iter().flat_map(|root| validate_plugin_directory(root)).collect()
}

/// Returns the manifest as a JSON object when it is present and well formed.
fn check_manifest(
    plugin_path: &Path,
    result: &mut ValidationResult,
) -> Option<serde_json::Map<String, serde_json::Value>> {
    let manifest_path = plugin_path.join(MANIFEST_FILE);

    match std::fs::metadata(&manifest_path) {
        Err(e) => {
            result.errors.push(format!("Manifest file not found: {e}"));
            return None;
        }
        Ok(meta) if meta.is_dir() => {
            result.errors.push("Manifest is a directory, not a file".to_string());
            return None;
        }
        Ok(_) => {}
    }

    let data = match std::fs::read(&manifest_path) {
        Ok(data) => data,
        Err(e) => {
            result.errors.push(format!("Failed to read manifest: {e}"));
            return None;
        }
    };

    let object = match serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&data)
    {
        Ok(object) => object,
        Err(e) => {
            result.errors.push(format!("Invalid manifest JSON: {e}"));
            return None;
        }
    };

    result.has_manifest = true;
    result.manifest =
        String::from_utf8(data).ok().and_then(|text| RawValue::from_string(text).ok());
    Some(object)
}

/// Icon problems are diagnostics only and never affect validity.
fn check_icon(
    plugin_path: &Path,
    manifest: &serde_json::Map<String, serde_json::Value>,
    result: &mut ValidationResult,
) {
    let Some(icon) = manifest.get("icon").and_then(|v| v.as_str()) else {
        return;
    };
    if icon.trim().is_empty() {
        return;
    }

    // Absolute references point outside the bundle and are not checked.
    let icon_path = Path::new(icon);
    if icon_path.is_absolute() {
        return;
    }

    let mut last_error = None;
    for candidate in CandidateList::icon(icon_path).paths().iter().map(|p| plugin_path.join(p)) {
        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_dir() => {
                result.errors.push("Icon path points to a directory".to_string());
                return;
            }
            Ok(_) => {
                result.has_icon = true;
                return;
            }
            Err(e) => last_error = Some(e),
        }
    }

    if let Some(e) = last_error {
        result.errors.push(format!("Icon file not found: {e}"));
    }
}

fn check_modules(plugin_path: &Path, result: &mut ValidationResult) {
    if let Some(index) = CandidateList::index().first_file(plugin_path) {
        debug!(path = %index.display(), "Found index file");
        result.has_content = true;
        result.has_background = true;
        return;
    }

    let content = CandidateList::legacy("content").first_file(plugin_path);
    let background = CandidateList::legacy("background").first_file(plugin_path);
    result.has_content = content.is_some();
    result.has_background = background.is_some();

    match (content, background) {
        (None, None) => result.errors.push(MISSING_MODULES.to_string()),
        (None, Some(_)) => result.errors.push(MISSING_CONTENT.to_string()),
        (Some(_), None) => result.errors.push(MISSING_BACKGROUND.to_string()),
        (Some(_), Some(_)) => {}
    }
}
