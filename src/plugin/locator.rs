//! Plugin root discovery.
//!
//! Roots are searched in a fixed priority order: the per-user config
//! directory, a system-wide directory, then the per-user ghosts directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{DirectoryEntry, PluginError, PluginResult};
use crate::core::Config;

/// Enumerates plugin roots and their candidate plugin directories.
#[derive(Debug, Clone)]
pub struct PluginLocator {
    roots: Vec<PathBuf>,
}

impl PluginLocator {
    /// Create a locator over an explicit, ordered list of roots.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Build the standard root list from the configuration and the user's
    /// home directory. Without a home directory only the system path and
    /// configured extras remain.
    pub fn from_config(config: &Config) -> Self {
        let app = &config.general.app_name;
        let mut roots = Vec::new();

        match dirs::home_dir() {
            Some(home) => {
                roots.push(home.join(".config").join(app).join("plugins"));
                roots.push(config.plugins.system_dir.clone());
                roots.push(home.join(app).join("ghosts"));
            }
            None => {
                warn!("Could not determine home directory; using system plugin directory only");
                roots.push(config.plugins.system_dir.clone());
            }
        }

        roots.extend(config.plugins.extra_dirs.iter().cloned());
        Self { roots }
    }

    /// All configured roots, whether or not they exist.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Roots that exist and are directories, in priority order.
    pub fn existing_roots(&self) -> Vec<PathBuf> {
        self.roots
            .iter()
            .filter(|root| match std::fs::metadata(root) {
                Ok(meta) if meta.is_dir() => {
                    debug!(root = %root.display(), "Plugin root exists");
                    true
                }
                Ok(_) => {
                    debug!(root = %root.display(), "Plugin root is not a directory");
                    false
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(root = %root.display(), "Plugin root does not exist");
                    false
                }
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "Failed to check plugin root");
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Subdirectories of every existing root, in root priority order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.existing_roots().iter().flat_map(|root| plugin_dirs(root)).collect()
    }
}

/// List the immediate children of `dir` in directory-listing order.
pub fn list_entries(dir: &Path) -> PluginResult<Vec<DirectoryEntry>> {
    let metadata = std::fs::metadata(dir).map_err(|e| PluginError::from_io(dir, e))?;
    if !metadata.is_dir() {
        return Err(PluginError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| PluginError::from_io(dir, e))? {
        let entry = entry?;
        // Follow symlinks so a linked plugin directory counts as a directory.
        let is_directory = entry.path().is_dir();
        entries.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory,
        });
    }

    debug!(dir = %dir.display(), count = entries.len(), "Listed plugin entries");
    Ok(entries)
}

/// Subdirectories of one root. Unreadable roots yield nothing.
pub fn plugin_dirs(root: &Path) -> Vec<PathBuf> {
    match list_entries(root) {
        Ok(entries) => entries
            .into_iter()
            .filter(|entry| entry.is_directory)
            .map(|entry| root.join(entry.name))
            .collect(),
        Err(e) => {
            if !e.is_not_found() {
                warn!(root = %root.display(), error = %e, "Failed to read plugin root");
            }
            Vec::new()
        }
    }
}
