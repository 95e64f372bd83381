//! Lazily generated, size-encoded image variants.
//!
//! A variant is generated the first time it is requested and kept on disk
//! forever. The presence of the file is the cache entry; there is no index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;
use tokio::fs;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{
    Dimensions, ImagePath, ImageReference, PresetKind, Quality, SizePresets,
};
use crate::domain::errors::ImageCacheError;
use crate::domain::ports::ImageCodecPort;
use crate::domain::services::{DEFAULT_NO_IMAGE, PathResolver};

use super::markup::img_tag;
use super::path_locks::PathLocks;

/// Immutable configuration of an [`ImageCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCacheConfig {
    /// Directory that web paths are resolved against.
    pub web_root: PathBuf,
    /// Images directory below the web root.
    pub images_dir: String,
    /// Fallback image filename inside the images directory.
    pub no_image: String,
    /// Thumb, middle and full sizes.
    pub presets: SizePresets,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            web_root: PathBuf::from("."),
            images_dir: "images".to_string(),
            no_image: DEFAULT_NO_IMAGE.to_string(),
            presets: SizePresets::default(),
        }
    }
}

/// Resolves image paths and materialises resized variants on demand.
pub struct ImageCache {
    web_root: PathBuf,
    resolver: PathResolver,
    presets: SizePresets,
    codec: Arc<dyn ImageCodecPort>,
    locks: PathLocks,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("web_root", &self.web_root)
            .field("resolver", &self.resolver)
            .field("presets", &self.presets)
            .finish_non_exhaustive()
    }
}

impl ImageCache {
    /// Creates a cache backed by `codec`.
    #[must_use]
    pub fn new(config: ImageCacheConfig, codec: Arc<dyn ImageCodecPort>) -> Self {
        Self {
            web_root: config.web_root,
            resolver: PathResolver::new(config.images_dir, config.no_image),
            presets: config.presets,
            codec,
            locks: PathLocks::default(),
        }
    }

    /// Returns the web root.
    #[must_use]
    pub fn web_root(&self) -> &Path {
        &self.web_root
    }

    /// Builds the source path for `reference`.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn resolve_source_path(
        &self,
        reference: impl Into<ImageReference>,
    ) -> Result<ImagePath, ImageCacheError> {
        self.resolver.source_path(&reference.into())
    }

    /// Builds the size-encoded destination path for `source`.
    ///
    /// # Errors
    /// Returns `InvalidReference` if `source` has no extension.
    pub fn resolve_destination_path(
        &self,
        source: &ImagePath,
        dimensions: Dimensions,
    ) -> Result<ImagePath, ImageCacheError> {
        self.resolver.destination_path(source, dimensions)
    }

    /// Returns the path a resized variant would have, without generating it.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn path(
        &self,
        reference: impl Into<ImageReference>,
        dimensions: Dimensions,
    ) -> Result<ImagePath, ImageCacheError> {
        self.resolver.path(&reference.into(), dimensions)
    }

    /// [`Self::path`] with the dimensions of a preset.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn path_preset(
        &self,
        kind: PresetKind,
        reference: impl Into<ImageReference>,
    ) -> Result<ImagePath, ImageCacheError> {
        self.path(reference, self.presets.get(kind).dimensions())
    }

    /// Path of the thumbnail variant.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn path_thumb(
        &self,
        reference: impl Into<ImageReference>,
    ) -> Result<ImagePath, ImageCacheError> {
        self.path_preset(PresetKind::Thumb, reference)
    }

    /// Path of the middle variant.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn path_middle(
        &self,
        reference: impl Into<ImageReference>,
    ) -> Result<ImagePath, ImageCacheError> {
        self.path_preset(PresetKind::Middle, reference)
    }

    /// Path of the full variant.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the name has no extension.
    pub fn path_full(
        &self,
        reference: impl Into<ImageReference>,
    ) -> Result<ImagePath, ImageCacheError> {
        self.path_preset(PresetKind::Full, reference)
    }

    /// Returns the destination path, generating the file first if it does
    /// not exist yet.
    ///
    /// A missing source falls back to the configured fallback image. If that
    /// is missing as well, nothing is written and the returned path dangles.
    ///
    /// # Errors
    /// Returns `InvalidReference` for names without extension, `Processing`
    /// if the codec fails and `Filesystem` if the destination cannot be
    /// written.
    pub async fn resize(
        &self,
        reference: impl Into<ImageReference>,
        dimensions: Dimensions,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<ImagePath, ImageCacheError> {
        let reference = reference.into();
        let source = self.resolver.source_path(&reference)?;
        let destination = self.resolver.destination_path(&source, dimensions)?;

        self.materialize(&source, destination, dimensions, format, quality)
            .await
    }

    /// [`Self::resize`] with the dimensions of a preset.
    ///
    /// # Errors
    /// See [`Self::resize`].
    pub async fn resize_preset(
        &self,
        kind: PresetKind,
        reference: impl Into<ImageReference>,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<ImagePath, ImageCacheError> {
        let dimensions = self.presets.get(kind).dimensions();
        self.resize(reference, dimensions, format, quality).await
    }

    /// Generates the thumbnail variant.
    ///
    /// # Errors
    /// See [`Self::resize`].
    pub async fn resize_thumb(
        &self,
        reference: impl Into<ImageReference>,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<ImagePath, ImageCacheError> {
        self.resize_preset(PresetKind::Thumb, reference, format, quality)
            .await
    }

    /// Generates the middle variant.
    ///
    /// # Errors
    /// See [`Self::resize`].
    pub async fn resize_middle(
        &self,
        reference: impl Into<ImageReference>,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<ImagePath, ImageCacheError> {
        self.resize_preset(PresetKind::Middle, reference, format, quality)
            .await
    }

    /// Generates the full variant.
    ///
    /// # Errors
    /// See [`Self::resize`].
    pub async fn resize_full(
        &self,
        reference: impl Into<ImageReference>,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<ImagePath, ImageCacheError> {
        self.resize_preset(PresetKind::Full, reference, format, quality)
            .await
    }

    /// Resizes, then renders an `<img>` tag pointing at the variant.
    ///
    /// `title` and attribute values are not escaped.
    ///
    /// # Errors
    /// See [`Self::resize`].
    pub async fn render<K, V>(
        &self,
        reference: impl Into<ImageReference>,
        dimensions: Dimensions,
        title: Option<&str>,
        attributes: impl IntoIterator<Item = (K, V)>,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<String, ImageCacheError>
    where
        K: std::fmt::Display,
        V: std::fmt::Display,
    {
        let destination = self.resize(reference, dimensions, format, quality).await?;
        Ok(img_tag(&destination, title, attributes))
    }

    async fn materialize(
        &self,
        source: &ImagePath,
        destination: ImagePath,
        dimensions: Dimensions,
        format: Option<ImageFormat>,
        quality: Quality,
    ) -> Result<ImagePath, ImageCacheError> {
        let target = destination.on_disk(&self.web_root);
        if exists(&target).await {
            trace!(%destination, "Image cache hit");
            return Ok(destination);
        }
        // The destination is the source itself; never write a placeholder there.
        if dimensions.is_unconstrained() {
            warn!(%destination, "Source image missing and no size requested");
            return Ok(destination);
        }

        let _guard = self.locks.acquire(&target).await;
        if exists(&target).await {
            trace!(%destination, "Image generated by concurrent request");
            return Ok(destination);
        }

        let mut source_file = source.on_disk(&self.web_root);
        if !exists(&source_file).await {
            let fallback = self.resolver.fallback_source_path()?;
            debug!(%source, %fallback, "Source image missing, using fallback");
            source_file = fallback.on_disk(&self.web_root);
        }
        if !exists(&source_file).await {
            warn!(%source, %destination, "No source or fallback image, nothing generated");
            return Ok(destination);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ImageCacheError::filesystem(parent, e))?;
        }

        debug!(
            source = %source_file.display(),
            target = %target.display(),
            %dimensions,
            "Generating resized image"
        );

        let codec = Arc::clone(&self.codec);
        let task_target = target.clone();
        tokio::task::spawn_blocking(move || {
            generate(
                codec.as_ref(),
                &source_file,
                &task_target,
                dimensions,
                format,
                quality,
            )
        })
        .await
        .map_err(|e| ImageCacheError::processing(&target, format!("resize task failed: {e}")))??;

        info!(%destination, %dimensions, "Stored resized image");
        Ok(destination)
    }
}

/// Decodes, fills and writes the variant through a temporary sibling file
/// that is renamed into place, so readers never observe a partial file.
fn generate(
    codec: &dyn ImageCodecPort,
    source: &Path,
    target: &Path,
    dimensions: Dimensions,
    format: Option<ImageFormat>,
    quality: Quality,
) -> Result<(), ImageCacheError> {
    let handle = codec.decode(source)?;
    let handle = codec.fill(handle, dimensions)?;

    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let suffix = target
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut builder = tempfile::Builder::new();
    builder.prefix(".pixcache-").suffix(&suffix);
    // Same mode as `File::create`: 0o666 minus umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let temp = builder
        .tempfile_in(dir)
        .map_err(|e| ImageCacheError::filesystem(dir, e))?;

    codec.encode(&handle, temp.path(), format, quality)?;

    temp.persist(target)
        .map_err(|e| ImageCacheError::filesystem(target, e.error))?;
    Ok(())
}

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SizePreset;
    use crate::domain::ports::mocks::MockImageCodec;
    use tempfile::TempDir;

    fn create_test_cache(codec: Arc<MockImageCodec>) -> (ImageCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = ImageCacheConfig {
            web_root: temp_dir.path().to_path_buf(),
            images_dir: "images".to_string(),
            no_image: "noImage.png".to_string(),
            presets: SizePresets {
                thumb: SizePreset::new(100, 100),
                middle: SizePreset::new(200, 200),
                full: SizePreset::new(400, 400),
            },
        };
        (ImageCache::new(config, codec), temp_dir)
    }

    fn touch(root: &TempDir, relative: &str) -> PathBuf {
        let path = root.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"source").unwrap();
        path
    }

    fn size(width: u32, height: u32) -> Dimensions {
        Dimensions::exact(width, height)
    }

    #[test]
    fn test_path() {
        let (cache, _temp) = create_test_cache(Arc::new(MockImageCodec::new()));

        assert_eq!(
            cache.path("image.jpg", Dimensions::unconstrained()).unwrap(),
            "/images/image.jpg"
        );
        assert_eq!(
            cache.path("image.JPG", Dimensions::unconstrained()).unwrap(),
            "/images/image.jpg"
        );
        assert_eq!(
            cache.path(None::<&str>, Dimensions::unconstrained()).unwrap(),
            "/images/noImage.png"
        );
        assert_eq!(
            cache
                .path("image.jpg", Dimensions::new(None, Some(200)))
                .unwrap(),
            "/images/image-x200.jpg"
        );
        assert_eq!(
            cache
                .path("image.jpg", Dimensions::new(Some(100), None))
                .unwrap(),
            "/images/image-100x.jpg"
        );
        assert_eq!(
            cache.path("image.jpg", size(100, 200)).unwrap(),
            "/images/image-100x200.jpg"
        );
    }

    #[test]
    fn test_preset_paths() {
        let (cache, _temp) = create_test_cache(Arc::new(MockImageCodec::new()));

        assert_eq!(cache.path_thumb("image.jpg").unwrap(), "/images/image-100x100.jpg");
        assert_eq!(cache.path_middle("image.jpg").unwrap(), "/images/image-200x200.jpg");
        assert_eq!(cache.path_full("image.jpg").unwrap(), "/images/image-400x400.jpg");
    }

    #[test]
    fn test_resolve_destination_without_size_is_source() {
        let (cache, _temp) = create_test_cache(Arc::new(MockImageCodec::new()));
        let source = cache.resolve_source_path("a/B.PNG").unwrap();

        let destination = cache
            .resolve_destination_path(&source, Dimensions::unconstrained())
            .unwrap();

        assert_eq!(destination, source);
        assert_eq!(destination, "/images/a/B.png");
    }

    #[tokio::test]
    async fn test_cache_hit_skips_codec() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/image.jpg");
        let existing = touch(&temp, "images/image-100x100.jpg");

        let path = cache
            .resize("image.jpg", size(100, 100), None, Quality::default())
            .await
            .unwrap();

        assert_eq!(path, "/images/image-100x100.jpg");
        assert_eq!(codec.calls(), 0);
        assert_eq!(std::fs::read(existing).unwrap(), b"source");
    }

    #[tokio::test]
    async fn test_resize_generates_variant() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        let source = touch(&temp, "images/image.jpg");

        let path = cache
            .resize("image.JPG", size(100, 50), None, Quality::default())
            .await
            .unwrap();

        assert_eq!(path, "/images/image-100x50.jpg");
        assert!(temp.path().join("images/image-100x50.jpg").exists());
        assert_eq!(codec.decoded(), vec![source]);

        let encoded = codec.encoded();
        assert_eq!(encoded.len(), 1);
        assert_eq!((encoded[0].width, encoded[0].height), (100, 50));
        assert_eq!(encoded[0].format, Some(ImageFormat::Jpeg));
        assert_eq!(encoded[0].quality, 90);
    }

    #[tokio::test]
    async fn test_resize_passes_format_and_quality() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/image.jpg");

        cache
            .resize(
                "image.jpg",
                size(10, 10),
                Some(ImageFormat::Png),
                Quality::new(75).unwrap(),
            )
            .await
            .unwrap();

        let encoded = codec.encoded();
        assert_eq!(encoded[0].format, Some(ImageFormat::Png));
        assert_eq!(encoded[0].quality, 75);
    }

    #[tokio::test]
    async fn test_second_resize_is_cached() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/image.jpg");

        for _ in 0..3 {
            cache
                .resize("image.jpg", size(20, 20), None, Quality::default())
                .await
                .unwrap();
        }

        assert_eq!(codec.decoded().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_source_uses_fallback() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        let fallback = touch(&temp, "images/noImage.png");

        let path = cache
            .resize("missing.jpg", size(50, 50), None, Quality::default())
            .await
            .unwrap();

        assert_eq!(path, "/images/missing-50x50.jpg");
        assert!(temp.path().join("images/missing-50x50.jpg").exists());
        assert_eq!(codec.decoded(), vec![fallback]);
    }

    #[tokio::test]
    async fn test_missing_source_and_fallback_leaves_dangling_path() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());

        let path = cache
            .resize("image.png", size(100, 200), None, Quality::default())
            .await
            .unwrap();

        assert_eq!(path, "/images/image-100x200.png");
        assert!(!temp.path().join("images/image-100x200.png").exists());
        assert_eq!(codec.calls(), 0);
    }

    #[tokio::test]
    async fn test_unconstrained_resize_never_writes() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/noImage.png");

        let path = cache
            .resize("image.jpg", Dimensions::unconstrained(), None, Quality::default())
            .await
            .unwrap();

        assert_eq!(path, "/images/image.jpg");
        assert!(!temp.path().join("images/image.jpg").exists());
        assert_eq!(codec.calls(), 0);
    }

    #[tokio::test]
    async fn test_destination_subdirectories_are_created() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/noImage.png");

        let path = cache
            .resize("dir/sub/a.jpg", size(10, 10), None, Quality::default())
            .await
            .unwrap();

        assert_eq!(path, "/images/dir/sub/a-10x10.jpg");
        assert!(temp.path().join("images/dir/sub/a-10x10.jpg").is_file());
    }

    #[tokio::test]
    async fn test_directory_creation_failure_is_reported() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/noImage.png");
        touch(&temp, "images/dir");

        let result = cache
            .resize("dir/a.jpg", size(10, 10), None, Quality::default())
            .await;

        assert!(matches!(result, Err(ImageCacheError::Filesystem { .. })));
        assert_eq!(codec.calls(), 0);
    }

    #[tokio::test]
    async fn test_processing_error_propagates_without_partial_file() {
        let codec = Arc::new(MockImageCodec::failing());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/image.jpg");

        let result = cache
            .resize("image.jpg", size(10, 10), None, Quality::default())
            .await;

        assert!(matches!(result, Err(ImageCacheError::Processing { .. })));
        let entries = std::fs::read_dir(temp.path().join("images")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_generated_variant_has_regular_file_mode() {
        use crate::infrastructure::image::ImageRsCodec;
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let config = ImageCacheConfig {
            web_root: temp.path().to_path_buf(),
            ..ImageCacheConfig::default()
        };
        let cache = ImageCache::new(config, Arc::new(ImageRsCodec::default()));

        let source = temp.path().join("images/image.png");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        image::RgbImage::new(40, 20).save(&source).unwrap();
        let plain = temp.path().join("plain.txt");
        std::fs::File::create(&plain).unwrap();

        let path = cache
            .resize("image.png", size(10, 10), None, Quality::default())
            .await
            .unwrap();

        let generated = path.on_disk(temp.path());
        assert_eq!(image::image_dimensions(&generated).unwrap(), (10, 10));
        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&generated), mode(&plain));
    }

    #[tokio::test]
    async fn test_invalid_reference_is_rejected() {
        let (cache, _temp) = create_test_cache(Arc::new(MockImageCodec::new()));

        let result = cache
            .resize("image", size(10, 10), None, Quality::default())
            .await;

        assert!(matches!(
            result,
            Err(ImageCacheError::InvalidReference { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_requests_generate_once() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/image.jpg");

        let (a, b) = tokio::join!(
            cache.resize("image.jpg", size(30, 30), None, Quality::default()),
            cache.resize("image.jpg", size(30, 30), None, Quality::default()),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(codec.decoded().len(), 1);
    }

    #[tokio::test]
    async fn test_preset_resizes() {
        let codec = Arc::new(MockImageCodec::new());
        let (cache, temp) = create_test_cache(codec.clone());
        touch(&temp, "images/image.jpg");

        let full = cache
            .resize_full("image.jpg", None, Quality::default())
            .await
            .unwrap();
        let middle = cache
            .resize_middle("image.jpg", None, Quality::default())
            .await
            .unwrap();
        let thumb = cache
            .resize_thumb("image.jpg", None, Quality::default())
            .await
            .unwrap();

        assert_eq!(full, "/images/image-400x400.jpg");
        assert_eq!(middle, "/images/image-200x200.jpg");
        assert_eq!(thumb, "/images/image-100x100.jpg");

        let sizes: Vec<_> = codec
            .encoded()
            .iter()
            .map(|call| (call.width, call.height))
            .collect();
        assert_eq!(sizes, vec![(400, 400), (200, 200), (100, 100)]);
    }

    #[tokio::test]
    async fn test_render() {
        let (cache, _temp) = create_test_cache(Arc::new(MockImageCodec::new()));

        let html = cache
            .render(
                "image.jpg",
                size(100, 100),
                Some("Image"),
                Vec::<(String, String)>::new(),
                None,
                Quality::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            html,
            r#"<img src="/images/image-100x100.jpg" title="Image" alt="Image" />"#
        );
    }

    #[tokio::test]
    async fn test_render_attributes() {
        let (cache, _temp) = create_test_cache(Arc::new(MockImageCodec::new()));

        let html = cache
            .render(
                "dir/image.jpg",
                size(100, 100),
                Some("Image"),
                [("width", 100), ("height", 100)],
                None,
                Quality::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            html,
            r#"<img src="/images/dir/image-100x100.jpg" title="Image" alt="Image" width="100" height="100"/>"#
        );
    }
}
