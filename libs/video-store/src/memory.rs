use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::{NewVideoRecord, StoreError, VideoRecord, VideoStore};

// newest first
#[derive(Debug, Default)]
pub struct MemoryVideoStore {
    records: RwLock<Vec<VideoRecord>>,
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VideoStore for MemoryVideoStore {
    fn insert_video(&self, new_video: NewVideoRecord) -> Result<VideoRecord, StoreError> {
        new_video.validate()?;

        let record = VideoRecord {
            id: Uuid::new_v4(),
            title: new_video.title,
            description: new_video.description,
            public_id: new_video.public_id,
            original_size: new_video.original_size,
            compressed_size: new_video.compressed_size,
            duration: new_video.duration,
            created_at: Utc::now(),
        };

        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, record.clone());
        Ok(record)
    }

    fn list_videos(&self) -> Result<Vec<VideoRecord>, StoreError> {
        let mut videos = self.records.read().unwrap_or_else(PoisonError::into_inner).clone();
        // stable, so records sharing a timestamp keep newest-inserted first
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }
}
