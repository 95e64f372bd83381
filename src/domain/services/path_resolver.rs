//! Deterministic naming of source and resized images.
//!
//! `/<images_dir>/<name>.<ext>` is the source, `/<images_dir>/<name>-<W>x<H>.<ext>`
//! a resized variant. Only the extension is lower-cased so that `IMG.JPG` and
//! `IMG.jpg` land on the same file on case-sensitive filesystems.

use crate::domain::entities::{Dimensions, ImagePath, ImageReference};
use crate::domain::errors::ImageCacheError;

/// Default fallback image filename.
pub const DEFAULT_NO_IMAGE: &str = "noImage.png";

/// Maps image references to web paths. Performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    images_dir: String,
    no_image: String,
}

impl PathResolver {
    /// Creates a resolver for images stored under `/<images_dir>/`.
    #[must_use]
    pub fn new(images_dir: impl Into<String>, no_image: impl Into<String>) -> Self {
        let images_dir: String = images_dir.into();
        Self {
            images_dir: images_dir.trim_matches('/').to_string(),
            no_image: no_image.into(),
        }
    }

    /// Builds the source path for `reference`, substituting the fallback
    /// image when the reference is absent.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn source_path(&self, reference: &ImageReference) -> Result<ImagePath, ImageCacheError> {
        let name = reference.as_deref().unwrap_or(&self.no_image);
        let (base, ext) =
            split_extension(name).ok_or_else(|| ImageCacheError::invalid_reference(name))?;
        let name = format!("{base}.{}", ext.to_lowercase());

        if self.images_dir.is_empty() {
            Ok(ImagePath::new(format!("/{name}")))
        } else {
            Ok(ImagePath::new(format!("/{}/{name}", self.images_dir)))
        }
    }

    /// Builds the source path of the fallback image.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the fallback name has no extension.
    pub fn fallback_source_path(&self) -> Result<ImagePath, ImageCacheError> {
        self.source_path(&ImageReference::none())
    }

    /// Builds the destination path for `source` resized to `dimensions`.
    ///
    /// Returns `source` unchanged when no dimension is set.
    ///
    /// # Errors
    /// Returns `InvalidReference` if `source` has no extension.
    pub fn destination_path(
        &self,
        source: &ImagePath,
        dimensions: Dimensions,
    ) -> Result<ImagePath, ImageCacheError> {
        if dimensions.is_unconstrained() {
            return Ok(source.clone());
        }
        let (base, ext) = split_extension(source.as_str())
            .ok_or_else(|| ImageCacheError::invalid_reference(source.as_str()))?;

        Ok(ImagePath::new(format!(
            "{base}{}.{}",
            dimensions.suffix(),
            ext.to_lowercase()
        )))
    }

    /// Source path followed by destination path.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn path(
        &self,
        reference: &ImageReference,
        dimensions: Dimensions,
    ) -> Result<ImagePath, ImageCacheError> {
        let source = self.source_path(reference)?;
        self.destination_path(&source, dimensions)
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new("images", DEFAULT_NO_IMAGE)
    }
}

/// Splits on the last dot of the final path segment.
fn split_extension(name: &str) -> Option<(&str, &str)> {
    let (base, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some((base, ext))
}
