use super::app_config::LogLevel;
use crate::application::Operation;
use crate::infrastructure::image::ImageDriver;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pixcache",
    version,
    about = "On-demand, cached image resizing for web delivery",
    long_about = None
)]
pub struct CliArgs {
    /// Operation name: imagePath, imagePathThumb, imagePathMiddle,
    /// imagePathFull, imageResize, imageResizeThumb, imageResizeMiddle,
    /// imageResizeFull or imageRender.
    pub operation: Operation,

    /// Image filename below the images directory. The fallback image is used
    /// when omitted.
    pub reference: Option<String>,

    /// Target width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Title and alt text for imageRender.
    #[arg(long)]
    pub title: Option<String>,

    /// Extra imageRender attribute as key=value. Repeatable; order is kept.
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Output format (jpg, png, webp). Defaults to the source format.
    #[arg(long)]
    pub format: Option<String>,

    /// Encoder quality, 0-100.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub quality: Option<u8>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Directory that image paths are resolved against.
    #[arg(long, value_name = "PATH", env = "PIXCACHE_WEB_ROOT")]
    pub web_root: Option<PathBuf>,

    /// Images directory below the web root.
    #[arg(long)]
    pub images_dir: Option<String>,

    /// Fallback image filename.
    #[arg(long)]
    pub no_image: Option<String>,

    /// Image processing backend.
    #[arg(long, value_enum)]
    pub driver: Option<ImageDriver>,
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}
