pub mod image_cache;
pub mod markup;
pub mod operations;
mod path_locks;

pub use image_cache::{ImageCache, ImageCacheConfig};
pub use operations::{EXTENSION_NAME, Operation, OperationRequest};
