use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::model::InsertVideo;
use crate::schema::video;
use crate::{NewVideoRecord, StoreError, VideoRecord, VideoStore};

/// PostgreSQL store backed by an r2d2 connection pool. The pool is acquired in
/// [`PgVideoStore::connect`] and released when the store is dropped.
pub struct PgVideoStore {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PgVideoStore {
    pub fn connect(database_url: &str, pool_size: u32) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder().max_size(pool_size).build(manager)?;
        tracing::info!("Database pool ready with {} connections", pool_size);
        Ok(PgVideoStore { pool })
    }
}

impl VideoStore for PgVideoStore {
    fn insert_video(&self, new_video: NewVideoRecord) -> Result<VideoRecord, StoreError> {
        new_video.validate()?;
        let mut conn = self.pool.get()?;

        let row = InsertVideo::from(new_video);
        let record = diesel::insert_into(video::table)
            .values(&row)
            .returning(VideoRecord::as_returning())
            .get_result(&mut conn)?;

        tracing::info!("Inserted video {} with public id {}", record.id, record.public_id);
        Ok(record)
    }

    fn list_videos(&self) -> Result<Vec<VideoRecord>, StoreError> {
        let mut conn = self.pool.get()?;

        let videos = video::table
            .order(video::created_at.desc())
            .select(VideoRecord::as_select())
            .load::<VideoRecord>(&mut conn)?;

        Ok(videos)
    }
}

impl Drop for PgVideoStore {
    fn drop(&mut self) {
        let state = self.pool.state();
        tracing::info!("Releasing database pool ({} connections)", state.connections);
    }
}
