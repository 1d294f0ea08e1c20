use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StoreError;
use crate::schema::video;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = video)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64, // seconds
    pub created_at: DateTime<Utc>,
}

/// Everything needed to create a record, the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideoRecord {
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64,
}

impl NewVideoRecord {
    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        if self.public_id.trim().is_empty() {
            return Err(StoreError::InvalidRecord("public id must not be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(StoreError::InvalidRecord("title must not be empty".to_string()));
        }
        if self.original_size < 0 || self.compressed_size < 0 {
            return Err(StoreError::InvalidRecord("sizes must not be negative".to_string()));
        }
        Ok(())
    }
}

// insert shape, `created_at` comes from the column default
#[derive(Insertable)]
#[diesel(table_name = video)]
pub(crate) struct InsertVideo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64,
}

impl From<NewVideoRecord> for InsertVideo {
    fn from(new_video: NewVideoRecord) -> Self {
        InsertVideo {
            id: Uuid::new_v4(),
            title: new_video.title,
            description: new_video.description,
            public_id: new_video.public_id,
            original_size: new_video.original_size,
            compressed_size: new_video.compressed_size,
            duration: new_video.duration,
        }
    }
}
