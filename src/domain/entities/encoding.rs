//! Output encoding parameters.

use image::ImageFormat;

use crate::domain::errors::ImageCacheError;

/// Default encoder quality.
pub const DEFAULT_QUALITY: u8 = 90;

/// Encoder quality in the range 0..=100.
///
/// Only lossy encoders honour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(u8);

impl Quality {
    /// Creates a quality value.
    ///
    /// # Errors
    /// Returns error if `value` is above 100.
    pub fn new(value: u8) -> Result<Self, ImageCacheError> {
        if value > 100 {
            return Err(ImageCacheError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses an output format from its name or extension (`jpg`, `png`, `webp`).
///
/// # Errors
/// Returns error if the format is not known.
pub fn parse_format(name: &str) -> Result<ImageFormat, ImageCacheError> {
    ImageFormat::from_extension(name.trim_start_matches('.').to_ascii_lowercase())
        .ok_or_else(|| ImageCacheError::UnsupportedFormat(name.to_string()))
}
