//! Domain error types.

mod image_cache_error;

pub use image_cache_error::ImageCacheError;
