//! `<img>` tag rendering.
//!
//! Values are written verbatim. Callers must escape untrusted titles and
//! attribute values themselves.

use std::fmt::Display;

use crate::domain::entities::ImagePath;

/// Renders an image tag with `title` as both title and alt text, followed by
/// `attributes` as `key="value"` pairs in iteration order.
pub fn img_tag<K, V>(
    src: &ImagePath,
    title: Option<&str>,
    attributes: impl IntoIterator<Item = (K, V)>,
) -> String
where
    K: Display,
    V: Display,
{
    let title = title.unwrap_or_default();
    let attributes = attributes
        .into_iter()
        .map(|(key, value)| format!("{key}=\"{value}\""))
        .collect::<Vec<_>>()
        .join(" ");

    format!("<img src=\"{src}\" title=\"{title}\" alt=\"{title}\" {attributes}/>")
}
