use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;

/// `{title}.mp4`, with characters that would escape the directory replaced.
pub fn download_file_name(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    let stem = stem.trim_start_matches('.');
    if stem.is_empty() {
        "video.mp4".to_string()
    } else {
        format!("{}.mp4", stem)
    }
}

/// Stream the full asset at `url` into `dest_dir`.
///
/// # Returns
/// The path of the written file
pub async fn download_video(
    client: &reqwest::Client,
    url: &str,
    dest_dir: &Path,
    title: &str,
) -> Result<PathBuf, DownloadError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(DownloadError::Status(response.status().as_u16()));
    }

    let output_path = dest_dir.join(download_file_name(title));
    let mut output_file = tokio::fs::File::create(&output_path).await?;

    match write_body(response, &mut output_file).await {
        Ok(written) => {
            tracing::info!("Downloaded {} bytes to {}", written, output_path.display());
            Ok(output_path)
        }
        Err(err) => {
            drop(output_file);
            if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                tracing::warn!("Failed to remove partial download {}: {}", output_path.display(), remove_err);
            }
            Err(err)
        }
    }
}

async fn write_body(response: reqwest::Response, output_file: &mut tokio::fs::File) -> Result<u64, DownloadError> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        written += chunk.len() as u64;
        output_file.write_all(&chunk).await?;
    }
    output_file.flush().await?;
    Ok(written)
}
