//! Image retrieval.

use std::{future::Future, pin::Pin, time::Duration};

use tracing::{debug, error};
use vision_llm_service::error_handler::{make_snippet, strip_query};

use crate::error::EnrichError;

/// Source of raw image bytes.
///
/// Implement this to plug in a different retrieval path (or a stub in tests).
pub trait ImageSource: Send + Sync {
    /// Retrieves the bytes at `address`.
    fn fetch<'a>(
        &'a self,
        address: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, EnrichError>> + Send + 'a>>;
}

/// Default image fetch timeout, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Unauthenticated HTTP GET fetcher. The SAS token in the address is the only credential.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// # Errors
    /// Returns [`EnrichError::Config`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(vision_llm_service::VisionLlmError::from)?;
        Ok(Self { client })
    }

    async fn get(&self, address: &str) -> Result<Vec<u8>, EnrichError> {
        let shown = strip_query(address);
        debug!(address = %shown, "GET image");

        let fail = |reason: String| {
            error!(address = %shown, %reason, "image fetch failed");
            EnrichError::Fetch {
                address: shown.to_string(),
                reason,
            }
        };

        let resp = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| fail(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(fail(format!("HTTP {status}: {}", make_snippet(&text))));
        }

        let bytes = resp.bytes().await.map_err(|e| fail(e.without_url().to_string()))?;
        debug!(address = %shown, size = bytes.len(), "image fetched");
        Ok(bytes.to_vec())
    }
}

impl ImageSource for HttpImageFetcher {
    fn fetch<'a>(
        &'a self,
        address: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, EnrichError>> + Send + 'a>> {
        Box::pin(self.get(address))
    }
}
