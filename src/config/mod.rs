// SPDX-License-Identifier: MPL-2.0
//! This module handles the studio configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! Every field is optional; the resolved accessors fall back to the values in
//! [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use magnet_studio::config::{self, Config};
//!
//! let mut config = config::load().unwrap_or_default();
//! config.max_photos = Some(6);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use defaults::{
    ACCEPTED_EXTENSIONS, HISTORY_LIMIT, MAX_FILE_SIZE_BYTES, MAX_PHOTOS, MIN_CROP_SIZE,
};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "MagnetStudio";

/// Order in which a multi-file intake batch lands in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeOrder {
    /// Whichever file finishes validation/conversion first is appended first.
    #[default]
    Completion,
    /// Files are appended in the order they were submitted.
    Submission,
}

impl std::str::FromStr for IntakeOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "completion" => Ok(IntakeOrder::Completion),
            "submission" => Ok(IntakeOrder::Submission),
            other => Err(format!("unknown intake order: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub max_photos: Option<usize>,
    #[serde(default)]
    pub max_file_size_bytes: Option<u64>,
    #[serde(default)]
    pub accepted_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub history_limit: Option<usize>,
    #[serde(default)]
    pub min_crop_size: Option<f32>,
    #[serde(default)]
    pub intake_order: Option<IntakeOrder>,
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    pub jpeg_quality: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_photos: Some(MAX_PHOTOS),
            max_file_size_bytes: Some(MAX_FILE_SIZE_BYTES),
            accepted_extensions: None,
            history_limit: Some(HISTORY_LIMIT),
            min_crop_size: Some(MIN_CROP_SIZE),
            intake_order: Some(IntakeOrder::Completion),
            fetch_timeout_secs: Some(defaults::DEFAULT_FETCH_TIMEOUT_SECS),
            jpeg_quality: Some(defaults::TRANSCODE_JPEG_QUALITY),
        }
    }
}

impl Config {
    /// Photo slot capacity, clamped to the configurable range.
    #[must_use]
    pub fn max_photos(&self) -> usize {
        self.max_photos
            .unwrap_or(MAX_PHOTOS)
            .clamp(defaults::MIN_PHOTOS, defaults::MAX_CONFIGURABLE_PHOTOS)
    }

    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
            .filter(|bytes| *bytes > 0)
            .unwrap_or(MAX_FILE_SIZE_BYTES)
    }

    /// Accepted extensions, lowercased and without leading dots.
    #[must_use]
    pub fn accepted_extensions(&self) -> Vec<String> {
        match &self.accepted_extensions {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            _ => ACCEPTED_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn history_limit(&self) -> usize {
        self.history_limit.unwrap_or(HISTORY_LIMIT).max(1)
    }

    #[must_use]
    pub fn min_crop_size(&self) -> f32 {
        self.min_crop_size
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(MIN_CROP_SIZE)
    }

    #[must_use]
    pub fn intake_order(&self) -> IntakeOrder {
        self.intake_order.unwrap_or_default()
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.fetch_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults::DEFAULT_FETCH_TIMEOUT_SECS),
        )
    }

    /// JPEG quality for transcoded photos, clamped to `1..=100`.
    #[must_use]
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
            .unwrap_or(defaults::TRANSCODE_JPEG_QUALITY)
            .clamp(1, 100)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::warn!("Ignoring invalid config at {}: {}", path.display(), err);
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
