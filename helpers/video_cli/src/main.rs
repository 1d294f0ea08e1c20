use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use video_client::display::{format_duration, format_size};
use video_client::download::download_video;
use video_client::{
    ClientConfig, DownloadError, HttpTransport, UploadFile, UploadRequest, UploadState, UploadWorkflow, Video,
    VideoListClient,
};

#[derive(Debug, Parser)]
#[command(name = "video-cli", about = "Upload, list and download videos")]
struct Cli {
    /// Base URL of the video site
    #[arg(long, env = "VIDEO_SITE_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Give up on a request after this many seconds
    #[arg(long, default_value_t = 600)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a video file
    Upload {
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List all videos, newest first
    List,
    /// Download the full video with the given id
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::new(cli.server);
    config.request_timeout = Duration::from_secs(cli.timeout_secs);
    let http = config.http_client().context("failed to build http client")?;

    match cli.command {
        Command::Upload { file, title, description } => {
            let file = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            upload(&config, http, UploadRequest { file, title, description }).await
        }
        Command::List => {
            tracing::debug!("Fetching videos from {}", config.base_url);
            let videos = VideoListClient::new(http, &config).fetch().await?;
            print_videos(&videos);
            Ok(())
        }
        Command::Download { id, out } => {
            tracing::debug!("Looking up video {} on {}", id, config.base_url);
            let videos = VideoListClient::new(http.clone(), &config).fetch().await?;
            let (title, url) = download_target(videos, &id)?;

            tracing::debug!("Downloading {} into {}", url, out.display());
            let path = download_video(&http, &url, &out, &title).await?;
            println!("Saved {}", path.display());
            Ok(())
        }
    }
}

async fn upload(config: &ClientConfig, http: video_client::reqwest::Client, request: UploadRequest) -> anyhow::Result<()> {
    let mut workflow = UploadWorkflow::new(HttpTransport::new(http.clone(), config));

    let mut state = workflow.subscribe();
    let printer = tokio::spawn(async move {
        while state.changed().await.is_ok() {
            if let UploadState::Transferring { percent } = *state.borrow_and_update() {
                print!("\rUploading... {:>3}%", percent);
                let _ = std::io::stdout().flush();
            }
        }
    });

    let result = workflow.submit(request).await;
    println!();

    let receipt = result?;
    println!("Video uploaded successfully! Redirecting...");
    println!("  {} ({} -> {})", receipt.video.title,
        format_size(receipt.video.original_size.max(0) as u64),
        format_size(receipt.video.compressed_size.max(0) as u64));

    workflow.wait_for_redirect().await;
    drop(workflow);
    let _ = printer.await;

    let videos = VideoListClient::new(http, config).fetch().await?;
    print_videos(&videos);
    Ok(())
}

/// Title and download URL of the listed video with the given id.
fn download_target(videos: Vec<Video>, id: &str) -> Result<(String, String), DownloadError> {
    let video = videos
        .into_iter()
        .find(|video| video.id == id)
        .ok_or_else(|| DownloadError::NotFound(id.to_string()))?;
    match video.download_url {
        Some(url) => Ok((video.title, url)),
        None => {
            tracing::warn!("Video {} is listed without a download url", id);
            Err(DownloadError::NoDownloadUrl(id.to_string()))
        }
    }
}

fn print_videos(videos: &[Video]) {
    if videos.is_empty() {
        println!("No videos yet");
        return;
    }

    println!("{} video{}", videos.len(), if videos.len() == 1 { "" } else { "s" });
    for video in videos {
        let saved = video
            .compression_percentage
            .map(|percent| format!("{}% saved", percent))
            .unwrap_or_default();
        println!(
            "{}  {}  [{}]  {} -> {}  {}  uploaded {}",
            video.id,
            video.title,
            format_duration(video.duration),
            format_size(video.original_size.max(0) as u64),
            format_size(video.compressed_size.max(0) as u64),
            saved,
            video.created_at.format("%Y-%m-%d %H:%M"),
        );
        println!("    {}", video.description.as_deref().unwrap_or("No description"));
    }
}
