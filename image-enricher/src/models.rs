//! Wire types of the custom enrichment skill contract.
//!
//! The indexing pipeline posts `{"values": [{"recordId", "data": {"url", "queryString"}}]}`
//! and expects `{"values": [{"recordId", "data": {"description", "entity"}}]}` back,
//! one result per record, in the same order.

use serde::{Deserialize, Serialize};

use crate::caption::ImageCaption;

/// Batch posted by the indexing pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnrichmentRequest {
    pub values: Vec<Record>,
}

/// One unit of work. `record_id` is opaque and echoed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_id: String,
    pub data: RecordData,
}

/// Image location as supplied by the pipeline (blob path + SAS token).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordData {
    pub url: String,
    #[serde(default)]
    pub query_string: String,
}

impl RecordData {
    /// `url` and `queryString` concatenated verbatim: no encoding, no validation.
    pub fn fetch_address(&self) -> String {
        format!("{}{}", self.url, self.query_string)
    }
}

/// Batch returned to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnrichmentResponse {
    pub values: Vec<EnrichedRecord>,
}

/// One result, correlated to its input by `record_id` alone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    pub record_id: String,
    pub data: ImageCaption,
}
