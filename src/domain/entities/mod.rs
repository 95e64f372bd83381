//! Domain entity definitions.

mod dimensions;
mod encoding;
mod image_handle;
mod image_path;
mod image_reference;
mod preset;

pub use dimensions::Dimensions;
pub use encoding::{Quality, parse_format};
pub use image_handle::ImageHandle;
pub use image_path::ImagePath;
pub use image_reference::ImageReference;
pub use preset::{PresetKind, SizePreset, SizePresets};
