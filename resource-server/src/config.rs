use service_common::config::{env_lookup, or_default, parsed, required};

pub use service_common::ConfigError;

use crate::urls::DEFAULT_DELIVERY_BASE;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_pool_size: u32,
    pub cloud_name: String,
    pub delivery_base: String,
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
            cloud_name: required(&lookup, "CLOUDINARY_CLOUD_NAME")?,
            delivery_base: or_default(&lookup, "CLOUDINARY_DELIVERY_BASE", DEFAULT_DELIVERY_BASE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_name_is_required() {
        let err = Config::from_lookup(|name| match name {
            "DATABASE_URL" => Some("postgres://localhost/videos".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("CLOUDINARY_CLOUD_NAME")));
    }

    #[test]
    fn pool_size_must_be_numeric() {
        let err = Config::from_lookup(|name| match name {
            "DATABASE_URL" => Some("postgres://localhost/videos".to_string()),
            "CLOUDINARY_CLOUD_NAME" => Some("demo".to_string()),
            "DATABASE_POOL_SIZE" => Some("many".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DATABASE_POOL_SIZE", .. }));
    }
}
