/// Relative image filename as supplied by a caller, e.g. `dir/image.JPG`.
///
/// An empty name is stored as absent so that the fallback image is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ImageReference(Option<String>);

impl ImageReference {
    /// Creates a reference from any string-like input.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self(None)
        } else {
            Self(Some(name))
        }
    }

    /// Creates an absent reference.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Returns the filename, if any.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_deref().unwrap_or_default())
    }
}

impl From<&str> for ImageReference {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageReference {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for ImageReference {
    fn from(s: &String) -> Self {
        Self::new(s.as_str())
    }
}

impl<T: Into<Self>> From<Option<T>> for ImageReference {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::none, Into::into)
    }
}
