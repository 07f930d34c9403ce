//! Configuration management for Ghostcursor.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Native-state monitoring settings
    pub monitor: MonitorConfig,

    /// Plugin discovery settings
    pub plugins: PluginsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Application name, used to build plugin and log directory paths
    pub app_name: String,
}

/// Polling periods and event adjustments for the bridge loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Pointer sampling period in milliseconds
    pub pointer_interval_ms: u64,

    /// Shortcut and double-tap sampling period in milliseconds
    pub shortcut_interval_ms: u64,

    /// Selected-ghost sampling period in milliseconds
    pub ghost_interval_ms: u64,

    /// Subtracted from the pointer's y coordinate before emission
    pub pointer_y_offset: f64,
}

/// Plugin discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// System-wide plugin root, searched after the per-user config root
    pub system_dir: PathBuf,

    /// Icon used when a plugin's icon cannot be resolved
    pub default_icon: PathBuf,

    /// Additional roots searched after the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_dirs: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.ghostcursor.toml` in current directory
    /// 2. `~/.config/ghostcursor/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(".ghostcursor.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let app_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        std::fs::create_dir_all(&app_dir)?;

        let content = toml::to_string_pretty(self)?;
        std::fs::write(app_dir.join("config.toml"), content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::APP_NAME))
    }

    /// Directory holding per-plugin log files: `$HOME/.<app>/logs`.
    pub fn log_dir(&self) -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(format!(".{}", self.general.app_name)).join("logs"))
    }
}

impl MonitorConfig {
    pub fn pointer_interval(&self) -> Duration {
        Duration::from_millis(self.pointer_interval_ms.max(1))
    }

    pub fn shortcut_interval(&self) -> Duration {
        Duration::from_millis(self.shortcut_interval_ms.max(1))
    }

    pub fn ghost_interval(&self) -> Duration {
        Duration::from_millis(self.ghost_interval_ms.max(1))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { app_name: crate::APP_NAME.to_string() }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pointer_interval_ms: 20,
            shortcut_interval_ms: 100,
            ghost_interval_ms: 100,
            pointer_y_offset: 40.0,
        }
    }
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            system_dir: PathBuf::from("/opt/ghostcursor/plugins"),
            default_icon: PathBuf::from("frontend/dist/assets/images/ghost.png"),
            extra_dirs: Vec::new(),
        }
    }
}
