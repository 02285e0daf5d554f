use clap::Parser;
use dotenvy::dotenv;
use photo_upload::client::{AcceptHint, HttpTransport, LocalFile, PhotoUploader, short_name};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about = "Upload photos to a photo-upload server", long_about = None)]
struct Args {
    /// Upload endpoint
    #[arg(short, long, default_value = "http://127.0.0.1:3000/api/upload")]
    server: Url,

    /// Multipart field name the server reads files from
    #[arg(long, default_value = "files")]
    field: String,

    /// Accept filter applied to the selected files
    #[arg(long, default_value = "image/*")]
    accept: String,

    /// Files to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upload=info,photo_upload=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let accept = AcceptHint::new(&args.accept);
    let mut selected = Vec::new();
    for path in &args.files {
        let file = LocalFile::from_path(path).await?;
        if !accept.accepts(&file.content_type) {
            warn!(
                "⏭️  Skipping {} ({} does not match '{}')",
                path.display(),
                file.content_type,
                args.accept
            );
            continue;
        }
        selected.push(file);
    }

    let transport = HttpTransport::new(args.server.clone()).field_name(args.field);
    let mut uploader = PhotoUploader::new(transport);
    uploader.select_files(selected);

    info!(
        "📸 Selected Photos ({}) -> {}",
        uploader.staged().len(),
        args.server
    );
    for staged in uploader.staged() {
        info!(
            "   {} [{} bytes, {}]",
            short_name(&staged.file.name),
            staged.file.size(),
            staged.preview
        );
    }

    let notice = uploader.upload_batch().await;
    if notice.is_error() {
        error!("❌ {}: {}", notice.title, notice.description);
        std::process::exit(1);
    }

    info!("✅ {}: {}", notice.title, notice.description);
    for file in uploader.uploaded() {
        info!("   {} -> {}", short_name(&file.name), file.path);
    }

    Ok(())
}
