use serde::{Deserialize, Serialize};

use video_store::VideoRecord;

use crate::urls::MediaUrls;

/// A stored video as returned by the listing, with the URLs and numbers the
/// dashboard needs to render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(flatten)]
    pub record: VideoRecord,
    pub thumbnail_url: String,
    pub preview_url: String,
    pub download_url: String,
    pub compression_percentage: i64,
}

impl Video {
    pub fn new(record: VideoRecord, urls: &MediaUrls) -> Self {
        Video {
            thumbnail_url: urls.thumbnail(&record.public_id),
            preview_url: urls.preview(&record.public_id),
            download_url: urls.full(&record.public_id),
            compression_percentage: compression_percentage(record.original_size, record.compressed_size),
            record,
        }
    }
}

/// Share of the original size saved by compression, in whole percent.
/// Negative when the compressed file came out larger.
pub fn compression_percentage(original_size: i64, compressed_size: i64) -> i64 {
    if original_size <= 0 {
        return 0;
    }
    ((1.0 - compressed_size as f64 / original_size as f64) * 100.0).round() as i64
}
