//! Codec backend built on the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::trace;

use crate::domain::entities::{Dimensions, ImageHandle, Quality};
use crate::domain::errors::ImageCacheError;
use crate::domain::ports::ImageCodecPort;

/// Decodes, fills and encodes with the pure Rust `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageRsCodec {
    filter: FilterType,
}

impl ImageRsCodec {
    /// Creates a codec resampling with `filter`.
    #[must_use]
    pub const fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ImageRsCodec {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl ImageCodecPort for ImageRsCodec {
    fn decode(&self, path: &Path) -> Result<ImageHandle, ImageCacheError> {
        let reader = ImageReader::open(path)
            .map_err(|e| ImageCacheError::filesystem(path, e))?
            .with_guessed_format()
            .map_err(|e| ImageCacheError::filesystem(path, e))?;
        let format = reader.format();
        let image = reader
            .decode()
            .map_err(|e| ImageCacheError::processing(path, e.to_string()))?;

        trace!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Decoded image"
        );
        Ok(ImageHandle::new(image, format))
    }

    fn fill(
        &self,
        handle: ImageHandle,
        dimensions: Dimensions,
    ) -> Result<ImageHandle, ImageCacheError> {
        let (src_width, src_height) = (handle.width(), handle.height());
        if src_width == 0 || src_height == 0 {
            return Ok(handle);
        }

        let image = match (dimensions.width(), dimensions.height()) {
            (None, None) => return Ok(handle),
            (Some(width), Some(height)) => handle.image().resize_to_fill(width, height, self.filter),
            (Some(width), None) => {
                let height = scale_axis(src_height, width, src_width);
                handle.image().resize_exact(width, height, self.filter)
            }
            (None, Some(height)) => {
                let width = scale_axis(src_width, height, src_height);
                handle.image().resize_exact(width, height, self.filter)
            }
        };
        Ok(handle.with_image(image))
    }

    fn encode(
        &self,
        handle: &ImageHandle,
        path: &Path,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<(), ImageCacheError> {
        let format = format
            .or_else(|| ImageFormat::from_path(path).ok())
            .or(handle.format())
            .ok_or_else(|| ImageCacheError::processing(path, "cannot determine output format"))?;

        match format {
            ImageFormat::Jpeg => {
                let file = File::create(path).map_err(|e| ImageCacheError::filesystem(path, e))?;
                let mut writer = BufWriter::new(file);
                // JPEG has no alpha channel.
                let rgb = DynamicImage::ImageRgb8(handle.image().to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality.value()))
                    .map_err(|e| ImageCacheError::processing(path, e.to_string()))?;
                writer
                    .flush()
                    .map_err(|e| ImageCacheError::filesystem(path, e))?;
            }
            _ => handle
                .image()
                .save_with_format(path, format)
                .map_err(|e| ImageCacheError::processing(path, e.to_string()))?,
        }

        trace!(path = %path.display(), ?format, %quality, "Encoded image");
        Ok(())
    }
}

/// Scales `axis` by `target / reference`, never below one pixel.
fn scale_axis(axis: u32, target: u32, reference: u32) -> u32 {
    let scaled = (u64::from(axis) * u64::from(target) + u64::from(reference) / 2) / u64::from(reference);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}
