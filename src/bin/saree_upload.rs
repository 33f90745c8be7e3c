//! Command-line admin uploader.
//!
//! Runs the same pipeline as the upload form: every picture is re-encoded
//! locally and only the converted blobs are sent.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use saree_catalog::{
    client::{
        api::CatalogClient,
        upload_form::{SlotTarget, SubmitStatus, UploadFormEvent, UploadFormState},
        ClientError,
    },
    entities::saree::Category,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "saree_upload", about = "Upload a saree listing to the catalog")]
struct Cli {
    /// Backend base URL, e.g. http://localhost:5000
    #[arg(long, env = "APP_PUBLIC_BASE_URL")]
    backend: String,

    #[arg(long, env = "APP_ADMIN_API_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    #[arg(long)]
    name: String,

    #[arg(long)]
    description: String,

    /// One of Synthetic, Cotton, Shalu, Zari, Fancy
    #[arg(long, value_parser = parse_category)]
    category: Category,

    /// Main picture
    #[arg(long)]
    image: PathBuf,

    /// Additional pictures, repeat the flag for each
    #[arg(long = "thumbnail")]
    thumbnails: Vec<PathBuf>,

    #[arg(long, env = "APP_MAX_SECONDARY_IMAGES", default_value_t = 5)]
    max_secondary: usize,
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn load_into(form: &mut UploadFormState, target: SlotTarget, path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    form.load_file(target, &display_name(path), &bytes)
        .with_context(|| format!("Failed to prepare {}", path.display()))?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let client = CatalogClient::new(&cli.backend)?.with_admin_key(cli.admin_key);

    let mut form = UploadFormState::new(cli.max_secondary);
    form.apply(UploadFormEvent::NameChanged(cli.name))?;
    form.apply(UploadFormEvent::DescriptionChanged(cli.description))?;
    form.apply(UploadFormEvent::CategoryChanged(Some(cli.category)))?;

    load_into(&mut form, SlotTarget::Primary, &cli.image).await?;
    for path in &cli.thumbnails {
        load_into(&mut form, SlotTarget::Secondary, path).await?;
    }

    form.apply(UploadFormEvent::SubmitStarted)?;
    let submission = form.submission()?;

    let progress = Arc::new(|percent: u8| tracing::info!(percent, "upload progress"));

    match client.upload_saree(&submission, progress).await {
        Ok(created) => {
            form.apply(UploadFormEvent::SubmitSucceeded)?;
            tracing::info!(id = %created.saree.id, url = %created.saree.image_url, "{}", created.message);
        }
        Err(e) => {
            let message = match &e {
                ClientError::Server { message, .. } => message.clone(),
                _ => None,
            };
            form.apply(UploadFormEvent::SubmitFailed(message))?;
            tracing::debug!("upload error: {}", e);
        }
    }

    if form.status == SubmitStatus::Failed {
        anyhow::bail!(form.error.unwrap_or_default());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
