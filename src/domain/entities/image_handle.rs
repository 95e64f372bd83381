use image::{DynamicImage, ImageFormat};

/// A decoded image together with the format it was read from.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl ImageHandle {
    /// Creates a handle.
    #[must_use]
    pub const fn new(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self { image, format }
    }

    /// Returns the pixel data.
    #[must_use]
    pub const fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Returns the format of the source file, if it could be determined.
    #[must_use]
    pub const fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Returns the width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Returns the height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Replaces the pixel data, keeping the source format.
    #[must_use]
    pub fn with_image(self, image: DynamicImage) -> Self {
        Self {
            image,
            format: self.format,
        }
    }
}
