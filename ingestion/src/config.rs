use std::time::Duration;

use service_common::config::{env_lookup, or_default, parsed, required};

pub use service_common::ConfigError;

use crate::gateway::CloudinaryConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_pool_size: u32,
    pub gateway: CloudinaryConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Config {
            port: parsed(&lookup, "PORT", 3000)?,
            database_url: required(&lookup, "DATABASE_URL")?,
            database_pool_size: parsed(&lookup, "DATABASE_POOL_SIZE", 10)?,
            gateway: CloudinaryConfig {
                cloud_name: required(&lookup, "CLOUDINARY_CLOUD_NAME")?,
                api_key: required(&lookup, "CLOUDINARY_API_KEY")?,
                api_secret: required(&lookup, "CLOUDINARY_API_SECRET")?,
                upload_folder: or_default(&lookup, "CLOUDINARY_UPLOAD_FOLDER", "video-uploads"),
                api_base: or_default(&lookup, "CLOUDINARY_API_BASE", "https://api.cloudinary.com"),
                timeout: Duration::from_secs(parsed(&lookup, "GATEWAY_TIMEOUT_SECONDS", 600)?),
            },
        })
    }
}
