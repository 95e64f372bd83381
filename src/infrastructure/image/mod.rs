//! Image processing infrastructure.
//!
//! This module provides:
//! - A codec backend on top of the `image` crate
//! - Driver selection from configuration

pub mod codec;
pub mod driver;

pub use codec::ImageRsCodec;
pub use driver::ImageDriver;
