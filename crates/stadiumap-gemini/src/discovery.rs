use stadiumap_core::{Bounds, Stadium};
use stadiumap_discovery::{DiscoveryClient, DiscoveryError};

use crate::client::GeminiClient;
use crate::error::GeminiError;

impl DiscoveryClient for GeminiClient {
    async fn scan_area(&self, bounds: Bounds) -> Result<Vec<Stadium>, DiscoveryError> {
        self.stadiums_in_area(bounds).await.map_err(|err| match err {
            GeminiError::MissingApiKey => {
                DiscoveryError::NotConfigured("GEMINI_API_KEY is not set".to_owned())
            }
            other => DiscoveryError::from_source(other),
        })
    }
}
