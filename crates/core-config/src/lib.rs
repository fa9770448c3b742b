//! Configuration loading and parsing.
//!
//! Parses `textview.toml` (or an override path provided by the binary).
//! Every field has a default so a missing file, a missing table or a missing
//! key all degrade to the built-in values. Unknown fields are ignored.
//!
//! Parse failures are reported as `ConfigError`, logged at warn level by
//! `load_from`, and replaced by defaults: a broken config must never keep the
//! viewer from opening a file.
//!
//! Effective values are clamped in the `Config` accessors rather than during
//! parsing so the raw file contents stay inspectable.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "textview.toml";
pub const MIN_BLINK_INTERVAL_MS: u64 = 50;
pub const MAX_BLINK_INTERVAL_MS: u64 = 60_000;
/// Upper bound for every pixel-valued layout and scroll setting.
pub const MAX_LAYOUT_EXTENT: u32 = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CursorConfig {
    #[serde(default = "CursorConfig::default_blink_interval_ms")]
    pub blink_interval_ms: u64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            blink_interval_ms: Self::default_blink_interval_ms(),
        }
    }
}

impl CursorConfig {
    const fn default_blink_interval_ms() -> u64 {
        500
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    #[serde(default = "ScrollConfig::default_step")]
    pub step: u32,
    #[serde(default = "ScrollConfig::default_horizontal_big_step")]
    pub horizontal_big_step: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step: Self::default_step(),
            horizontal_big_step: Self::default_horizontal_big_step(),
        }
    }
}

impl ScrollConfig {
    const fn default_step() -> u32 {
        4
    }
    const fn default_horizontal_big_step() -> u32 {
        30
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    #[serde(default = "LayoutConfig::default_padding")]
    pub padding: u32,
    #[serde(default = "LayoutConfig::default_line_height")]
    pub line_height: u32,
    #[serde(default = "LayoutConfig::default_scrollbar_thickness")]
    pub scrollbar_thickness: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: Self::default_padding(),
            line_height: Self::default_line_height(),
            scrollbar_thickness: Self::default_scrollbar_thickness(),
        }
    }
}

impl LayoutConfig {
    const fn default_padding() -> u32 {
        1
    }
    const fn default_line_height() -> u32 {
        1
    }
    const fn default_scrollbar_thickness() -> u32 {
        1
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub path: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path: working directory first, then the platform
/// config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("textview").join(CONFIG_FILE_NAME);
    }
    local
}

/// Strict parse of a config file. A missing file is not an error here; it
/// yields `Ok(None)` so callers can distinguish "absent" from "broken".
pub fn parse_file(path: &Path) -> std::result::Result<Option<(String, ConfigFile)>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let file = toml::from_str::<ConfigFile>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some((content, file)))
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match parse_file(&path) {
        Ok(Some((content, file))) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Ok(None) => Ok(Config::default()),
        Err(err) => {
            warn!(target: "config", error = %err, "config_fallback_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Blink half-period, clamped to `MIN_BLINK_INTERVAL_MS..=MAX_BLINK_INTERVAL_MS`.
    pub fn blink_interval(&self) -> Duration {
        let raw = self.file.cursor.blink_interval_ms;
        let ms = raw.clamp(MIN_BLINK_INTERVAL_MS, MAX_BLINK_INTERVAL_MS);
        if ms != raw {
            info!(target: "config", raw, clamped = ms, "blink_interval_clamped");
        }
        Duration::from_millis(ms)
    }

    pub fn scroll_step(&self) -> u32 {
        self.file.scroll.step.clamp(1, MAX_LAYOUT_EXTENT)
    }

    pub fn horizontal_big_step(&self) -> u32 {
        self.file.scroll.horizontal_big_step.clamp(1, MAX_LAYOUT_EXTENT)
    }

    pub fn padding(&self) -> u32 {
        self.file.layout.padding.min(MAX_LAYOUT_EXTENT)
    }

    pub fn line_height(&self) -> u32 {
        self.file.layout.line_height.clamp(1, MAX_LAYOUT_EXTENT)
    }

    pub fn scrollbar_thickness(&self) -> u32 {
        self.file.layout.scrollbar_thickness.min(MAX_LAYOUT_EXTENT)
    }
}
