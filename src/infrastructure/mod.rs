//! Infrastructure layer with configuration and image backend adapters.

/// Application configuration.
pub mod config;
/// Image processing backend.
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigError, ConfigOrigin, LogLevel, StorageManager};
pub use self::image::{ImageDriver, ImageRsCodec};
