//! Backend selection.

use std::sync::Arc;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::domain::ports::ImageCodecPort;

use super::codec::ImageRsCodec;

/// Image processing backend, chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageDriver {
    /// `image` crate with Lanczos3 resampling.
    #[default]
    Image,
    /// `image` crate with bilinear resampling; faster, softer.
    Fast,
}

impl ImageDriver {
    /// Builds the codec for this driver.
    #[must_use]
    pub fn create_codec(self) -> Arc<dyn ImageCodecPort> {
        match self {
            Self::Image => Arc::new(ImageRsCodec::new(FilterType::Lanczos3)),
            Self::Fast => Arc::new(ImageRsCodec::new(FilterType::Triangle)),
        }
    }
}

impl std::fmt::Display for ImageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Fast => write!(f, "fast"),
        }
    }
}
