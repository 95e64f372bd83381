//! Named size presets.

use serde::{Deserialize, Serialize};

use super::Dimensions;

/// A pre-configured target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePreset {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

impl SizePreset {
    /// Creates a preset.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the preset as resize dimensions.
    #[must_use]
    pub fn dimensions(self) -> Dimensions {
        Dimensions::exact(self.width, self.height)
    }
}

/// Preset selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetKind {
    /// Small gallery thumbnail.
    Thumb,
    /// Listing size.
    Middle,
    /// Detail view size.
    Full,
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Thumb => write!(f, "thumb"),
            Self::Middle => write!(f, "middle"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// The three presets, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePresets {
    /// Thumbnail size.
    pub thumb: SizePreset,
    /// Middle size.
    pub middle: SizePreset,
    /// Full size.
    pub full: SizePreset,
}

impl SizePresets {
    /// Returns the preset for `kind`.
    #[must_use]
    pub const fn get(&self, kind: PresetKind) -> SizePreset {
        match kind {
            PresetKind::Thumb => self.thumb,
            PresetKind::Middle => self.middle,
            PresetKind::Full => self.full,
        }
    }
}

impl Default for SizePresets {
    fn default() -> Self {
        Self {
            thumb: SizePreset::new(100, 100),
            middle: SizePreset::new(200, 200),
            full: SizePreset::new(400, 400),
        }
    }
}
