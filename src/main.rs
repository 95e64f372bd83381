use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pixcache::application::{ImageCache, OperationRequest};
use pixcache::domain::entities::{Dimensions, ImageReference, Quality, parse_format};
use pixcache::infrastructure::{AppConfig, CliArgs, ConfigOrigin, StorageManager};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<(AppConfig, ConfigOrigin)> {
    let storage = StorageManager::new()?;
    let (mut config, origin) = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok((config, origin))
}

fn build_request(args: CliArgs, config: &AppConfig) -> Result<OperationRequest> {
    let quality = match args.quality {
        Some(value) => Quality::new(value)?,
        None => config.default_quality()?,
    };
    let format = args.format.as_deref().map(parse_format).transpose()?;

    Ok(OperationRequest {
        reference: ImageReference::from(args.reference),
        dimensions: Dimensions::new(args.width, args.height),
        title: args.title,
        attributes: args.attributes,
        format,
        quality,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let (config, origin) = load_config(&args)?;

    init_logging(&config)?;
    origin.log();

    let cache = ImageCache::new(config.image_cache_config(), config.driver.create_codec());
    info!(
        version = pixcache::VERSION,
        driver = %config.driver,
        web_root = %cache.web_root().display(),
        "Starting pixcache"
    );
    let operation = args.operation;
    let request = build_request(args, &config)?;

    debug!(%operation, reference = %request.reference, "Invoking operation");
    let output = cache.invoke(operation, &request).await?;

    println!("{output}");
    Ok(())
}
