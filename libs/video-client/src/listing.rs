use crate::error::{server_message, QueryError};
use crate::{ClientConfig, Video};

pub const LIST_PATH: &str = "/api/videos";

/// Reads the full video listing, newest first as ordered by the server.
pub struct VideoListClient {
    client: reqwest::Client,
    list_url: String,
}

impl VideoListClient {
    pub fn new(client: reqwest::Client, config: &ClientConfig) -> Self {
        VideoListClient {
            client,
            list_url: config.url(LIST_PATH),
        }
    }

    /// An empty listing is `Ok(vec![])`. Anything that is not a JSON array of
    /// videos is an error, never coerced to empty.
    pub async fn fetch(&self) -> Result<Vec<Video>, QueryError> {
        let response = self.client.get(&self.list_url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = server_message(&body)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            tracing::error!("Listing failed with {}: {}", status, message);
            return Err(QueryError::Server { status: status.as_u16(), message });
        }

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|err| {
            tracing::error!("Listing response is not JSON: {}", err);
            QueryError::UnexpectedFormat
        })?;
        if !value.is_array() {
            tracing::error!("Listing response is not an array");
            return Err(QueryError::UnexpectedFormat);
        }

        serde_json::from_value(value).map_err(|err| {
            tracing::error!("Listing contains malformed videos: {}", err);
            QueryError::UnexpectedFormat
        })
    }
}
