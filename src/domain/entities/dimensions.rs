/// Target size of a resized image.
///
/// Either axis may be absent, meaning unconstrained. Zero is treated the same
/// as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: Option<u32>,
    height: Option<u32>,
}

impl Dimensions {
    /// Creates dimensions, normalising zero to absent.
    #[must_use]
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: width.filter(|w| *w > 0),
            height: height.filter(|h| *h > 0),
        }
    }

    /// Creates dimensions with both axes set.
    #[must_use]
    pub fn exact(width: u32, height: u32) -> Self {
        Self::new(Some(width), Some(height))
    }

    /// Creates dimensions with neither axis set.
    #[must_use]
    pub const fn unconstrained() -> Self {
        Self {
            width: None,
            height: None,
        }
    }

    /// Returns the target width.
    #[must_use]
    pub const fn width(&self) -> Option<u32> {
        self.width
    }

    /// Returns the target height.
    #[must_use]
    pub const fn height(&self) -> Option<u32> {
        self.height
    }

    /// Returns true if neither axis is constrained.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Returns the filename suffix for these dimensions, e.g. `-100x200`,
    /// `-100x` or `-x200`.
    #[must_use]
    pub fn suffix(&self) -> String {
        let axis = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
        format!("-{}x{}", axis(self.width), axis(self.height))
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let axis = |value: Option<u32>| value.map_or_else(|| "auto".to_string(), |v| v.to_string());
        write!(f, "{}x{}", axis(self.width), axis(self.height))
    }
}
