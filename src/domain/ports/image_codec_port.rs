//! Port definition for the image codec backend.

use std::path::Path;

use image::ImageFormat;

use crate::domain::entities::{Dimensions, ImageHandle, Quality};
use crate::domain::errors::ImageCacheError;

/// Decode, fill and encode capability of an image backend.
///
/// Calls are blocking and CPU heavy; async callers must run them on the
/// blocking pool. Implementations must be thread-safe.
pub trait ImageCodecPort: Send + Sync {
    /// Reads and decodes the image at `path`.
    ///
    /// # Errors
    /// Returns `Processing` if the file cannot be read or decoded.
    fn decode(&self, path: &Path) -> Result<ImageHandle, ImageCacheError>;

    /// Scales and crops the image to exactly `dimensions`.
    ///
    /// An absent axis follows the source aspect ratio.
    ///
    /// # Errors
    /// Returns `Processing` if the backend rejects the operation.
    fn fill(&self, handle: ImageHandle, dimensions: Dimensions)
    -> Result<ImageHandle, ImageCacheError>;

    /// Encodes the image to `path`.
    ///
    /// `format` falls back to the extension of `path`, then to the source
    /// format of `handle`.
    ///
    /// # Errors
    /// Returns `Processing` if encoding fails or no format can be determined.
    fn encode(
        &self,
        handle: &ImageHandle,
        path: &Path,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<(), ImageCacheError>;
}
