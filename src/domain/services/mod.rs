//! Pure domain services.

mod path_resolver;

pub use path_resolver::{DEFAULT_NO_IMAGE, PathResolver};
