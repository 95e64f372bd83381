//! Name table for invoking cache operations from a template host.
//!
//! Names are stable; templates refer to them directly.

use std::str::FromStr;

use image::ImageFormat;

use crate::domain::entities::{Dimensions, ImageReference, PresetKind, Quality};
use crate::domain::errors::ImageCacheError;

use super::image_cache::ImageCache;

/// Name under which the operations are registered with a template host.
pub const EXTENSION_NAME: &str = "images";

/// An operation reachable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Resize and render an `<img>` tag.
    Render,
    /// Resize to explicit dimensions.
    Resize,
    /// Resize to the thumb preset.
    ResizeThumb,
    /// Resize to the middle preset.
    ResizeMiddle,
    /// Resize to the full preset.
    ResizeFull,
    /// Path for explicit dimensions.
    Path,
    /// Path for the thumb preset.
    PathThumb,
    /// Path for the middle preset.
    PathMiddle,
    /// Path for the full preset.
    PathFull,
}

impl Operation {
    /// Every operation, in registration order.
    pub const ALL: [Self; 9] = [
        Self::Render,
        Self::Resize,
        Self::ResizeThumb,
        Self::ResizeMiddle,
        Self::ResizeFull,
        Self::Path,
        Self::PathThumb,
        Self::PathMiddle,
        Self::PathFull,
    ];

    /// Returns the registered name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Render => "imageRender",
            Self::Resize => "imageResize",
            Self::ResizeThumb => "imageResizeThumb",
            Self::ResizeMiddle => "imageResizeMiddle",
            Self::ResizeFull => "imageResizeFull",
            Self::Path => "imagePath",
            Self::PathThumb => "imagePathThumb",
            Self::PathMiddle => "imagePathMiddle",
            Self::PathFull => "imagePathFull",
        }
    }

    /// Returns the [`ImageCache`] method the name is bound to.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Resize => "resize",
            Self::ResizeThumb => "resize_thumb",
            Self::ResizeMiddle => "resize_middle",
            Self::ResizeFull => "resize_full",
            Self::Path => "path",
            Self::PathThumb => "path_thumb",
            Self::PathMiddle => "path_middle",
            Self::PathFull => "path_full",
        }
    }

    /// Returns the `(name, method)` table.
    #[must_use]
    pub fn methods() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|op| (op.name(), op.method())).collect()
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ImageCacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| ImageCacheError::UnknownOperation(s.to_string()))
    }
}

/// Arguments of a named invocation. Operations ignore what they do not use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationRequest {
    /// Image to resolve.
    pub reference: ImageReference,
    /// Explicit size for `imageResize`, `imageRender` and `imagePath`.
    pub dimensions: Dimensions,
    /// Title and alt text for `imageRender`.
    pub title: Option<String>,
    /// Extra attributes for `imageRender`, in output order.
    pub attributes: Vec<(String, String)>,
    /// Output format; the source format when absent.
    pub format: Option<ImageFormat>,
    /// Encoder quality.
    pub quality: Quality,
}

impl OperationRequest {
    /// Creates a request for `reference` with default arguments.
    #[must_use]
    pub fn new(reference: impl Into<ImageReference>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }

    /// Sets the explicit size.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

impl ImageCache {
    /// Runs `operation` and returns its output as a string: a path, or
    /// markup for `imageRender`.
    ///
    /// # Errors
    /// Propagates the error of the underlying operation.
    pub async fn invoke(
        &self,
        operation: Operation,
        request: &OperationRequest,
    ) -> Result<String, ImageCacheError> {
        let reference = request.reference.clone();
        let (format, quality) = (request.format, request.quality);

        let path = match operation {
            Operation::Render => {
                let attributes = request.attributes.iter().map(|(k, v)| (k, v));
                return self
                    .render(
                        reference,
                        request.dimensions,
                        request.title.as_deref(),
                        attributes,
                        format,
                        quality,
                    )
                    .await;
            }
            Operation::Resize => {
                self.resize(reference, request.dimensions, format, quality)
                    .await?
            }
            Operation::ResizeThumb => {
                self.resize_preset(PresetKind::Thumb, reference, format, quality)
                    .await?
            }
            Operation::ResizeMiddle => {
                self.resize_preset(PresetKind::Middle, reference, format, quality)
                    .await?
            }
            Operation::ResizeFull => {
                self.resize_preset(PresetKind::Full, reference, format, quality)
                    .await?
            }
            Operation::Path => self.path(reference, request.dimensions)?,
            Operation::PathThumb => self.path_preset(PresetKind::Thumb, reference)?,
            Operation::PathMiddle => self.path_preset(PresetKind::Middle, reference)?,
            Operation::PathFull => self.path_preset(PresetKind::Full, reference)?,
        };

        Ok(path.into())
    }
}
