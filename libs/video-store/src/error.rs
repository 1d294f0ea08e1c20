use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("invalid video record: {0}")]
    InvalidRecord(String),
    #[error("store task failed: {0}")]
    Blocking(String),
}
