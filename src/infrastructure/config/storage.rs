use super::app_config::AppConfig;
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";
const APP_NAME: &str = "pixcache";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Where the configuration returned by [`StorageManager::load_config`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from an existing file.
    Loaded(PathBuf),
    /// No file existed, so one was written with defaults.
    Created(PathBuf),
    /// The file could not be parsed and defaults are used instead.
    Malformed {
        /// Offending file, left untouched.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

impl ConfigOrigin {
    /// Reports the outcome through `tracing`.
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => debug!(path = %path.display(), "Loaded config file"),
            Self::Created(path) => {
                info!(path = %path.display(), "Config file not found, created default");
            }
            Self::Malformed { path, reason } => {
                warn!(path = %path.display(), %reason, "Failed to parse config file. Using defaults.");
            }
        }
    }
}

pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `StorageManager` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Loads the application configuration.
    ///
    /// A missing file is created with defaults; a malformed one is left
    /// untouched and defaults are used. Nothing is logged here: the returned
    /// [`ConfigOrigin`] is logged by the caller once a subscriber exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or created.
    pub fn load_config(
        &self,
        path_override: Option<&Path>,
    ) -> Result<(AppConfig, ConfigOrigin), ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            std::path::Path::to_path_buf,
        );

        if !config_path.exists() {
            let default_config = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&config_path, &default_config)?;
            return Ok((default_config, ConfigOrigin::Created(config_path)));
        }

        let content = fs::read_to_string(&config_path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => Ok((config, ConfigOrigin::Loaded(config_path))),
            Err(e) => Ok((
                AppConfig::default(),
                ConfigOrigin::Malformed {
                    path: config_path,
                    reason: e.to_string(),
                },
            )),
        }
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SizePreset;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Capture(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_load_config_creates_default_if_missing() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("pixcache");
        let manager = StorageManager::with_dir(config_dir.clone());

        let (config, origin) = manager.load_config(None).unwrap();
        assert_eq!(config, AppConfig::default());

        let config_file = config_dir.join(CONFIG_FILE_NAME);
        assert!(config_file.exists());
        assert_eq!(origin, ConfigOrigin::Created(config_file));
    }

    #[test]
    fn test_load_config_handles_malformed_file() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_file, "invalid_toml = [").unwrap();

        let (config, origin) = manager.load_config(None).unwrap();
        assert_eq!(config.no_image, "noImage.png");
        let content = fs::read_to_string(&config_file).unwrap();
        assert_eq!(content, "invalid_toml = [");

        match origin {
            ConfigOrigin::Malformed { path, reason } => {
                assert_eq!(path, config_file);
                assert!(!reason.is_empty());
            }
            other => panic!("expected malformed origin, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_origin_logs_warning() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let origin = ConfigOrigin::Malformed {
            path: PathBuf::from("/etc/pixcache/config.toml"),
            reason: "expected a value".to_string(),
        };

        tracing::subscriber::with_default(subscriber, || origin.log());

        let output = String::from_utf8(capture.0.lock().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("Failed to parse config file"));
        assert!(output.contains("/etc/pixcache/config.toml"));
    }

    #[test]
    fn test_load_config_from_override_path() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("unused"));
        let custom = dir.path().join("site.toml");
        fs::write(&custom, "images_dir = \"media\"\n[middle]\nwidth = 320\nheight = 240\n").unwrap();

        let (config, origin) = manager.load_config(Some(&custom)).unwrap();

        assert_eq!(config.images_dir, "media");
        assert_eq!(config.middle, SizePreset::new(320, 240));
        assert_eq!(origin, ConfigOrigin::Loaded(custom));
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let mut config = AppConfig::default();
        config.no_image = "placeholder.webp".to_string();
        config.full = SizePreset::new(1024, 768);

        StorageManager::save_to_file(&dir.path().join(CONFIG_FILE_NAME), &config).unwrap();

        let (loaded, _) = manager.load_config(None).unwrap();
        assert_eq!(loaded, config);
    }
}
