//! Playback and thumbnail URLs derived from a video's public id.
//!
//! Every URL is a pure function of the public id and the constants below, no
//! request to the media service is made when a listing is rendered.

pub const THUMBNAIL_WIDTH: u32 = 400;
pub const THUMBNAIL_HEIGHT: u32 = 225;

pub const PREVIEW_DURATION_SECONDS: u32 = 15;
pub const PREVIEW_MAX_SEGMENTS: u32 = 9;
pub const PREVIEW_MIN_SEGMENT_SECONDS: u32 = 1;

pub const FULL_WIDTH: u32 = 1920;
pub const FULL_HEIGHT: u32 = 1080;

pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

#[derive(Debug, Clone)]
pub struct MediaUrls {
    base: String,
}

impl MediaUrls {
    pub fn new(cloud_name: &str) -> Self {
        Self::with_delivery_base(DEFAULT_DELIVERY_BASE, cloud_name)
    }

    pub fn with_delivery_base(delivery_base: &str, cloud_name: &str) -> Self {
        MediaUrls {
            base: format!("{}/{}/video/upload", delivery_base.trim_end_matches('/'), cloud_name),
        }
    }

    /// Cropped still frame for the video grid.
    pub fn thumbnail(&self, public_id: &str) -> String {
        format!(
            "{}/c_fill,g_auto,h_{},w_{}/f_jpg,q_auto/{}",
            self.base, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH, public_id
        )
    }

    /// Short silent clip shown on hover.
    pub fn preview(&self, public_id: &str) -> String {
        format!(
            "{}/e_preview:duration_{}:max_seg_{}:min_seg_dur_{}/ac_none/c_limit,h_{},w_{}/{}",
            self.base,
            PREVIEW_DURATION_SECONDS,
            PREVIEW_MAX_SEGMENTS,
            PREVIEW_MIN_SEGMENT_SECONDS,
            THUMBNAIL_HEIGHT,
            THUMBNAIL_WIDTH,
            public_id
        )
    }

    pub fn full(&self, public_id: &str) -> String {
        format!("{}/c_limit,h_{},w_{}/{}", self.base, FULL_HEIGHT, FULL_WIDTH, public_id)
    }
}
