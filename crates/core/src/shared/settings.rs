use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    CONSOLE_CAPACITY, MAX_TRANSCRIPTION_MB, MIN_ANNOTATION_SECS, PHRASE_MATCH_RATIO,
    SAMPLE_PERIOD_SECS,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tunables for a review session. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sample_period_secs: f64,
    pub min_annotation_secs: f64,
    pub phrase_match_ratio: f64,
    pub console_capacity: usize,
    pub max_transcription_mb: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_period_secs: SAMPLE_PERIOD_SECS,
            min_annotation_secs: MIN_ANNOTATION_SECS,
            phrase_match_ratio: PHRASE_MATCH_RATIO,
            console_capacity: CONSOLE_CAPACITY,
            max_transcription_mb: MAX_TRANSCRIPTION_MB,
        }
    }
}

impl Settings {
    /// Platform config location, e.g. `~/.config/QC Portal/settings.json`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("QC Portal").join("settings.json"))
    }

    /// Loads from the platform config path, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(settings.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(write_err)
    }

    /// Replaces out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.sample_period_secs > 0.0) {
            self.sample_period_secs = defaults.sample_period_secs;
        }
        if !(self.min_annotation_secs >= 0.0) {
            self.min_annotation_secs = defaults.min_annotation_secs;
        }
        if !(self.phrase_match_ratio > 0.0 && self.phrase_match_ratio <= 1.0) {
            self.phrase_match_ratio = defaults.phrase_match_ratio;
        }
        if self.console_capacity == 0 {
            self.console_capacity = defaults.console_capacity;
        }
        if !(self.max_transcription_mb > 0.0) {
            self.max_transcription_mb = defaults.max_transcription_mb;
        }
        self
    }
}
