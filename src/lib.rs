//! Pixcache - on-demand, cached image resizing for web delivery.
//!
//! Resized variants are derived from a source image reference and a target
//! size, named deterministically, and generated lazily the first time they
//! are requested. The file on disk is the cache entry.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the cache pipeline and markup rendering.
pub mod application;
/// Domain layer containing entities, errors, ports and naming rules.
pub mod domain;
/// Infrastructure layer containing configuration and the image backend.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "pixcache";
