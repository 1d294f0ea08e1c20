mod error;
mod memory;
mod model;
mod pg;
pub mod schema;

use std::sync::Arc;

pub use error::StoreError;
pub use memory::MemoryVideoStore;
pub use model::{NewVideoRecord, VideoRecord};
pub use pg::PgVideoStore;

/// Persistence for uploaded video metadata.
///
/// Records are written once and never updated. Implementations are blocking,
/// async callers go through [`insert_video`] and [`list_videos`].
pub trait VideoStore: Send + Sync {
    /// Persist a new record in a single write. The record is not visible to
    /// [`VideoStore::list_videos`] unless this returns `Ok`.
    fn insert_video(&self, new_video: NewVideoRecord) -> Result<VideoRecord, StoreError>;

    /// All records, newest `created_at` first.
    fn list_videos(&self) -> Result<Vec<VideoRecord>, StoreError>;
}

pub type SharedStore = Arc<dyn VideoStore>;

pub async fn insert_video(store: &SharedStore, new_video: NewVideoRecord) -> Result<VideoRecord, StoreError> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || store.insert_video(new_video))
        .await
        .map_err(|err| StoreError::Blocking(err.to_string()))?
}

pub async fn list_videos(store: &SharedStore) -> Result<Vec<VideoRecord>, StoreError> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || store.list_videos())
        .await
        .map_err(|err| StoreError::Blocking(err.to_string()))?
}
