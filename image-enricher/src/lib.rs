//! Image captioning core of the custom enrichment skill.
//!
//! For every record of a batch, strictly in order: fetch the image at
//! `url + queryString`, inline it as a base64 data URI, ask the vision model
//! for `{"description", "entity"}`, validate the answer and echo the
//! `recordId`. The batch is all-or-nothing: the first failing record aborts
//! it and nothing partial is returned.
//!
//! ```no_run
//! # use image_enricher::{ImageEnricher, EnrichmentRequest};
//! # async fn run(req: EnrichmentRequest) -> Result<(), image_enricher::EnrichError> {
//! let enricher = ImageEnricher::from_env()?;
//! let resp = enricher.enrich(req).await?;
//! println!("{} results", resp.values.len());
//! # Ok(()) }
//! ```

mod caption;
mod captioner;
mod cfg;
mod encode;
mod error;
mod fetch;
mod models;
mod prompt;

pub use caption::{ImageCaption, parse_caption};
pub use captioner::ImageCaptioner;
pub use cfg::EnricherConfig;
pub use encode::{encode_base64, image_data_uri};
pub use error::EnrichError;
pub use fetch::{DEFAULT_FETCH_TIMEOUT_SECS, HttpImageFetcher, ImageSource};
pub use models::{EnrichedRecord, EnrichmentRequest, EnrichmentResponse, Record, RecordData};
pub use prompt::{IMAGE_MIME, PromptSettings, SYSTEM_PROMPT};

use std::{sync::Arc, time::Instant};

use tracing::{debug, info, instrument, warn};
use vision_llm_service::VisionChatService;

pub use vision_llm_service::{EnvLookup, process_env};

/// Stateless batch processor; the only state is the injected collaborators.
pub struct ImageEnricher {
    source: Arc<dyn ImageSource>,
    captioner: Arc<dyn ImageCaptioner>,
    settings: PromptSettings,
}

impl ImageEnricher {
    pub fn new(
        source: Arc<dyn ImageSource>,
        captioner: Arc<dyn ImageCaptioner>,
        settings: PromptSettings,
    ) -> Self {
        Self {
            source,
            captioner,
            settings,
        }
    }

    /// Wires the HTTP fetcher and the vision chat client from a resolved config.
    ///
    /// # Errors
    /// [`EnrichError::Config`] if either HTTP client cannot be built.
    pub fn from_config(cfg: EnricherConfig) -> Result<Self, EnrichError> {
        let source = HttpImageFetcher::new(cfg.fetch_timeout_secs)?;
        let captioner = VisionChatService::new(cfg.model)?;
        Ok(Self::new(Arc::new(source), Arc::new(captioner), cfg.prompt))
    }

    /// Same as [`ImageEnricher::from_config`] with [`EnricherConfig::from_env`].
    pub fn from_env() -> Result<Self, EnrichError> {
        Self::from_config(EnricherConfig::from_env()?)
    }

    /// Enriches every record of `request`, preserving order and record ids.
    ///
    /// # Errors
    /// The first [`EnrichError`] raised by any record; earlier results are dropped.
    #[instrument(name = "enrich_batch", skip_all, fields(records = request.values.len()))]
    pub async fn enrich(
        &self,
        request: EnrichmentRequest,
    ) -> Result<EnrichmentResponse, EnrichError> {
        let started = Instant::now();
        let total = request.values.len();
        let mut values = Vec::with_capacity(total);

        for (idx, record) in request.values.into_iter().enumerate() {
            match self.enrich_record(&record).await {
                Ok(caption) => values.push(EnrichedRecord {
                    record_id: record.record_id,
                    data: caption,
                }),
                Err(e) => {
                    warn!(
                        record_id = %record.record_id,
                        index = idx,
                        total,
                        code = e.code(),
                        error = %e,
                        "record failed; aborting batch"
                    );
                    return Err(e);
                }
            }
        }

        info!(
            total,
            latency_ms = started.elapsed().as_millis(),
            "batch enriched"
        );
        Ok(EnrichmentResponse { values })
    }

    async fn enrich_record(&self, record: &Record) -> Result<ImageCaption, EnrichError> {
        info!(record_id = %record.record_id, url = %record.data.url, "processing record");

        let address = record.data.fetch_address();
        let bytes = self.source.fetch(&address).await?;
        let data_uri = image_data_uri(&bytes);

        let raw = self.captioner.caption(&data_uri, &self.settings).await?;
        debug!(record_id = %record.record_id, %raw, "model response");

        let caption = parse_caption(&raw)?;
        info!(
            record_id = %record.record_id,
            description = %caption.description,
            entity = %caption.entity,
            "record enriched"
        );
        Ok(caption)
    }
}
