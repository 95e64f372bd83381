//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::ImageCacheConfig;
use crate::domain::entities::{Quality, SizePreset, SizePresets};
use crate::domain::errors::ImageCacheError;
use crate::infrastructure::image::ImageDriver;

const APP_NAME: &str = "pixcache";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory that image paths are resolved against.
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,

    /// Images directory below the web root.
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Fallback image used when the requested one is missing.
    #[serde(default = "default_no_image")]
    pub no_image: String,

    /// Image processing backend.
    #[serde(default)]
    pub driver: ImageDriver,

    /// Encoder quality used when a caller gives none.
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Thumbnail size.
    #[serde(default = "default_thumb")]
    pub thumb: SizePreset,

    /// Middle size.
    #[serde(default = "default_middle")]
    pub middle: SizePreset,

    /// Full size.
    #[serde(default = "default_full")]
    pub full: SizePreset,
}

fn default_web_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_no_image() -> String {
    crate::domain::services::DEFAULT_NO_IMAGE.to_string()
}

fn default_quality() -> u8 {
    Quality::default().value()
}

fn default_thumb() -> SizePreset {
    SizePresets::default().thumb
}

fn default_middle() -> SizePreset {
    SizePresets::default().middle
}

fn default_full() -> SizePreset {
    SizePresets::default().full
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(web_root) = &args.web_root {
            self.web_root = web_root.clone();
        }
        if let Some(images_dir) = &args.images_dir {
            self.images_dir = images_dir.clone();
        }
        if let Some(no_image) = &args.no_image {
            self.no_image = no_image.clone();
        }
        if let Some(driver) = args.driver {
            self.driver = driver;
        }
    }

    /// Returns the size presets.
    #[must_use]
    pub const fn presets(&self) -> SizePresets {
        SizePresets {
            thumb: self.thumb,
            middle: self.middle,
            full: self.full,
        }
    }

    /// Returns the configured default quality.
    ///
    /// # Errors
    /// Returns error if the configured value is above 100.
    pub fn default_quality(&self) -> Result<Quality, ImageCacheError> {
        Quality::new(self.quality)
    }

    /// Returns the image cache configuration.
    #[must_use]
    pub fn image_cache_config(&self) -> ImageCacheConfig {
        ImageCacheConfig {
            web_root: self.web_root.clone(),
            images_dir: self.images_dir.clone(),
            no_image: self.no_image.clone(),
            presets: self.presets(),
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("pixcache.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            web_root: default_web_root(),
            images_dir: default_images_dir(),
            no_image: default_no_image(),
            driver: ImageDriver::default(),
            quality: default_quality(),
            thumb: default_thumb(),
            middle: default_middle(),
            full: default_full(),
        }
    }
}
