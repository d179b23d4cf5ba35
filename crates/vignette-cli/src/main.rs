//! Vignette CLI: store images and their thumbnails from the command line.
//!
//! Storage and codec settings come from the environment (see `Config`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use vignette_cli::{init_tracing, parse_dimensions, StoreReport};
use vignette_core::{log_error, Config};
use vignette_processing::{plan_thumbnail, ThumbnailPipeline, UploadedFile};
use vignette_storage::{create_store, original_key, thumbnail_key};

#[derive(Parser)]
#[command(name = "vignette", about = "Store images with center-cropped thumbnails")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an image and its thumbnail under a timestamped name
    Store {
        /// Path to the image
        file: PathBuf,
        /// Thumbnail width (defaults to THUMBNAIL_WIDTH)
        #[arg(long)]
        width: Option<u32>,
        /// Thumbnail height (defaults to THUMBNAIL_HEIGHT)
        #[arg(long)]
        height: Option<u32>,
    },
    /// Create only the thumbnail, under an explicit name
    Thumbnail {
        /// Path to the image
        file: PathBuf,
        /// Stored name; the thumbnail goes to images/thumbnails/<name>
        #[arg(long)]
        name: String,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Show the resize and crop chosen for an image size, without touching files
    Plan {
        /// Source size as WIDTHxHEIGHT
        #[arg(long)]
        natural: String,
        /// Thumbnail size as WIDTHxHEIGHT
        #[arg(long)]
        target: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn build_pipeline(config: &Config) -> anyhow::Result<ThumbnailPipeline> {
    let store = create_store(config)
        .await
        .context("Failed to initialize storage backend")?;
    Ok(ThumbnailPipeline::from_config(store, config))
}

async fn read_upload(file: &Path) -> anyhow::Result<UploadedFile> {
    UploadedFile::from_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    match cli.command {
        Commands::Store {
            file,
            width,
            height,
        } => {
            let width = width.unwrap_or(config.thumbnail_width);
            let height = height.unwrap_or(config.thumbnail_height);
            let pipeline = build_pipeline(&config).await?;
            let upload = read_upload(&file).await?;

            let name = pipeline.generate_filename(&upload);
            let verified = pipeline
                .store_and_thumbnail_as(&upload, &name, width, height)
                .await;

            print_json(&StoreReport {
                original_key: original_key(&name),
                thumbnail_key: thumbnail_key(&name),
                name,
                verified,
            })?;

            if !verified {
                anyhow::bail!("Image and thumbnail were not both stored");
            }
        }
        Commands::Thumbnail {
            file,
            name,
            width,
            height,
        } => {
            let width = width.unwrap_or(config.thumbnail_width);
            let height = height.unwrap_or(config.thumbnail_height);
            let pipeline = build_pipeline(&config).await?;
            let upload = read_upload(&file).await?;

            if let Err(e) = pipeline.create_thumbnail(&upload, width, height, &name).await {
                log_error(&e, "Thumbnail generation failed");
                return Err(e).context(format!("Failed to create thumbnail for {}", name));
            }

            print_json(&serde_json::json!({
                "name": name,
                "thumbnail_key": thumbnail_key(&name),
            }))?;
        }
        Commands::Plan { natural, target } => {
            let (natural_width, natural_height) = parse_dimensions(&natural)?;
            let (target_width, target_height) = parse_dimensions(&target)?;
            if natural_width == 0 || natural_height == 0 {
                anyhow::bail!("Source dimensions must be positive, got {}", natural);
            }
            let plan = plan_thumbnail(natural_width, natural_height, target_width, target_height)?;
            print_json(&plan)?;
        }
    }

    Ok(())
}
