//! Ghost plugin discovery and validation.
//!
//! A ghost plugin is a directory containing a `manifest.json` and one or
//! more JavaScript/TypeScript entry points. This module locates plugin
//! directories under the configured roots, checks their structure, and
//! resolves their module sources and icons.
//!
//! # Bundle layout
//!
//! ```text
//! manifest.json
//! dist/index.js | index.js | dist/index.ts | index.ts
//!   -- or, legacy layout --
//! dist/content.{js,ts} | content.{js,ts}
//! dist/background.{js,ts} | background.{js,ts}
//! assets/<icon-basename>
//! ```
//!
//! Nothing here holds file handles between calls, so every operation is safe
//! to run from a task other than the bridge's polling loops.

mod error;
mod locator;
mod logs;
mod manifest;
mod resolver;
mod types;
mod validator;

pub use error::{PluginError, PluginResult};
pub use locator::{list_entries, plugin_dirs, PluginLocator};
pub use logs::{LogLevel, PluginLogStore};
pub use manifest::GhostManifest;
pub use resolver::{
    icon_file_url, mime_for_path, CandidateList, IconData, IconResolver, ModuleResolver,
};
pub use types::{DirectoryEntry, ValidationResult, ASSETS_DIR, MANIFEST_FILE};
pub use validator::{validate_all, validate_plugin, validate_plugin_directory};
