//! Domain layer with core entities, naming rules and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure domain services.
pub mod services;

pub use entities::{Dimensions, ImagePath, ImageReference, Quality, SizePreset, SizePresets};
pub use errors::ImageCacheError;
pub use ports::ImageCodecPort;
pub use services::PathResolver;
