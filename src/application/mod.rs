//! Application layer with the image cache pipeline.

/// Application services.
pub mod services;

pub use services::{ImageCache, ImageCacheConfig, Operation, OperationRequest};
