use anyhow::{ensure, Context};
use reqwest::Client;
use std::time::Duration;

use crate::config::Config;

const IMAGE_WIDTH: u32 = 1024;
const IMAGE_HEIGHT: u32 = 768;

/// Client for the image-by-description service: the image URL is a function
/// of the description plus size and a cache-busting seed, and the service
/// renders it on first fetch.
#[derive(Clone)]
pub struct ImageService {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ImageService {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            base_url: config.image_service_url.clone(),
            timeout: Duration::from_secs(config.image_timeout_secs),
        }
    }

    /// Build the image URL for a prompt description and verify it renders.
    /// Returns the fetchable URL on success. Failures (including timeout)
    /// are plain errors for the caller to drop: a missing illustration never
    /// fails exam generation.
    pub async fn fetch_illustration(&self, description: &str) -> anyhow::Result<String> {
        let url = self.illustration_url(description, rand::random::<u32>());

        let res = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .context("Failed to reach image service")?;
        ensure!(
            res.status().is_success(),
            "Image service returned {}",
            res.status()
        );

        Ok(url)
    }

    fn illustration_url(&self, description: &str, seed: u32) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(description.as_bytes()).collect();
        format!(
            "{}/{}?width={}&height={}&seed={}",
            self.base_url, encoded, IMAGE_WIDTH, IMAGE_HEIGHT, seed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ImageService {
        ImageService {
            client: Client::new(),
            base_url: "https://image.example/prompt".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn url_encodes_description_and_carries_seed() {
        let url = service().illustration_url("a deserted pier in fog", 42);
        assert_eq!(
            url,
            "https://image.example/prompt/a+deserted+pier+in+fog?width=1024&height=768&seed=42"
        );
    }

    #[test]
    fn distinct_seeds_bust_caching() {
        let svc = service();
        assert_ne!(
            svc.illustration_url("same scene", 1),
            svc.illustration_url("same scene", 2)
        );
    }
}
