//! Settings infrastructure for irfold.
//!
//! This module provides support for loading and parsing `irfold.toml` files
//! that decide which documents are treated as dump logs and how far the dump
//! detection scan reaches.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::fold::DEFAULT_SCAN_LIMIT;

/// Name of the settings file searched for in the workspace.
pub const SETTINGS_FILE: &str = "irfold.toml";

/// Errors raised while reading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root settings structure loaded from irfold.toml.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which documents are dump logs.
    pub files: FileSettings,
    /// Dump detection.
    pub gate: GateSettings,
}

/// Recognition of dump-log documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// File name suffixes, without the leading dot.
    pub extensions: Vec<String>,
    /// LSP language ids.
    pub language_ids: Vec<String>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["log".to_string(), "irdump".to_string()],
            language_ids: vec!["irdump".to_string()],
        }
    }
}

impl FileSettings {
    /// Whether a document with this path and language id should be folded.
    pub fn recognizes(&self, path: &str, language_id: &str) -> bool {
        if self.language_ids.iter().any(|id| id == language_id) {
            return true;
        }
        let Some((_, ext)) = path.rsplit_once('.') else {
            return false;
        };
        self.extensions.iter().any(|e| e == ext)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    /// Leading lines searched for a dump header.
    pub scan_limit: usize,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

/// Parse settings from TOML text.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings, SettingsError> {
    toml::from_str(content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from an irfold.toml file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&content, path)
}

/// Load settings, falling back to defaults with a warning.
fn load_or_default(path: &Path) -> Settings {
    load_settings(path).unwrap_or_else(|e| {
        warn!("{e}; using default settings");
        Settings::default()
    })
}

/// Discover irfold.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)` where `settings_dir` is the directory
/// containing the found irfold.toml. If not found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    // Phase 1: Walk up from start_dir
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            return (load_or_default(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    // Phase 2: Check immediate child directories
    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join(SETTINGS_FILE);
                if candidate.is_file() {
                    return (load_or_default(&candidate), entry.path());
                }
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}
