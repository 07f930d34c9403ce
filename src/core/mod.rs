//! Core types for Ghostcursor.
//!
//! Configuration shared by the plugin subsystem and the native-state bridge.

mod config;

pub use config::{Config, GeneralConfig, MonitorConfig, PluginsConfig};
