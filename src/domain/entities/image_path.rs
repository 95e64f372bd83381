use std::path::{Path, PathBuf};

/// Web-root relative path of an image, e.g. `/images/dir/image-100x100.jpg`.
///
/// This is the value emitted into `<img src>` and, joined onto the web root,
/// the location of the file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(String);

impl ImagePath {
    /// Wraps an already formed web path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the file location under `web_root`.
    #[must_use]
    pub fn on_disk(&self, web_root: &Path) -> PathBuf {
        web_root.join(self.0.trim_start_matches('/'))
    }
}

impl std::fmt::Display for ImagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ImagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for ImagePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<ImagePath> for String {
    fn from(path: ImagePath) -> Self {
        path.0
    }
}
