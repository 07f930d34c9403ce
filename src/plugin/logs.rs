//! Per-plugin log files.
//!
//! Each plugin gets one append-only text file, `<dir>/<pluginId>.log`,
//! with lines formatted as `[timestamp] [pluginId] [LEVEL] message`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{PluginError, PluginResult};

/// Severity of a plugin log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Store of plugin log files under one directory.
#[derive(Debug, Clone)]
pub struct PluginLogStore {
    dir: PathBuf,
}

impl PluginLogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Append one line to the plugin's log file.
    pub fn write(&self, plugin_id: &str, level: LogLevel, message: &str) -> PluginResult<()> {
        let path = self.log_path(plugin_id)?;
        std::fs::create_dir_all(&self.dir)?;

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("[{timestamp}] [{plugin_id}] [{level}] {message}\n");

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(line.as_bytes())?;

        match level {
            LogLevel::Debug => tracing::debug!(plugin = plugin_id, "{message}"),
            LogLevel::Info => tracing::info!(plugin = plugin_id, "{message}"),
            LogLevel::Warn => tracing::warn!(plugin = plugin_id, "{message}"),
            LogLevel::Error => tracing::error!(plugin = plugin_id, "{message}"),
        }
        Ok(())
    }

    /// Non-empty lines of the plugin's log, the last `max_lines` when non-zero.
    pub fn read(&self, plugin_id: &str, max_lines: usize) -> PluginResult<Vec<String>> {
        let path = self.log_path(plugin_id)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(PluginError::Read { path, source }),
        };

        let lines: Vec<String> =
            content.lines().filter(|l| !l.is_empty()).map(str::to_string).collect();

        if max_lines > 0 && lines.len() > max_lines {
            return Ok(lines[lines.len() - max_lines..].to_vec());
        }
        Ok(lines)
    }

    /// Truncate the plugin's log. A missing file is left missing.
    pub fn clear(&self, plugin_id: &str) -> PluginResult<()> {
        let path = self.log_path(plugin_id)?;
        if !path.exists() {
            return Ok(());
        }
        std::fs::write(&path, b"")?;
        Ok(())
    }

    fn log_path(&self, plugin_id: &str) -> PluginResult<PathBuf> {
        let usable = !plugin_id.is_empty()
            && plugin_id != "."
            && !plugin_id.contains("..")
            && !plugin_id.contains(['/', '\\']);
        if !usable {
            return Err(PluginError::InvalidId(plugin_id.to_string()));
        }
        Ok(self.dir.join(format!("{plugin_id}.log")))
    }
}
