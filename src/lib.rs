#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

//! # Ghostcursor
//!
//! Desktop ghost companion: a small character that follows the pointer and
//! is driven by third-party ghost plugins.
//!
//! This crate holds the application's logic, separate from the window and
//! the web front end:
//!
//! - **Bridge** ([`bridge`]): polling loops that sample native input state
//!   and deliver changes to the presentation layer as named events
//!   (`mouse-move`, `shortcut-event`, `switch-ghost`, `key-state-changed`).
//! - **Plugins** ([`plugin`]): discovery, validation and resolution of ghost
//!   plugin bundles on disk.
//!
//! ## Quick Start
//!
//! ```bash
//! # Show where plugins are looked up
//! ghostcursor dirs
//!
//! # Check every installed ghost
//! ghostcursor validate
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::redundant_pub_crate)]

pub mod bridge;
pub mod core;
pub mod plugin;

// Re-export commonly used types
pub use bridge::{BridgeEvent, EventDispatcher, MonitorSupervisor, StateSampler};
pub use core::Config;
pub use plugin::{GhostManifest, PluginError, PluginLocator, PluginResult, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "ghostcursor";
