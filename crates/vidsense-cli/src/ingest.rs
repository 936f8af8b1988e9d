//! Bulk loading of video documents from a JSON file.

use serde::{Deserialize, Serialize};
use vidsense_core::VideoDocument;
use vidsense_store::StoreClient;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngestPayload {
    Many(Vec<VideoDocument>),
    One(Box<VideoDocument>),
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestReport {
    pub indexed: Vec<String>,
    pub skipped_without_id: usize,
    pub failed: Vec<IngestFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestFailure {
    pub video_id: String,
    pub error: String,
}

/// Accepts either a single document object or an array of documents.
pub(crate) fn parse_documents(raw: &str) -> serde_json::Result<Vec<VideoDocument>> {
    Ok(match serde_json::from_str::<IngestPayload>(raw)? {
        IngestPayload::Many(documents) => documents,
        IngestPayload::One(document) => vec![*document],
    })
}

/// Upserts each document under its `videoId`. Failures are collected, not fatal.
pub(crate) async fn ingest(store: &StoreClient, documents: Vec<VideoDocument>) -> IngestReport {
    let mut report = IngestReport::default();
    for document in documents {
        let Some(video_id) = document
            .video_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
        else {
            report.skipped_without_id += 1;
            continue;
        };

        match store.upsert(&video_id, &document).await {
            Ok(()) => report.indexed.push(video_id),
            Err(e) => {
                tracing::warn!(video_id, error = %e, "failed to index document");
                report.failed.push(IngestFailure {
                    video_id,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        indexed = report.indexed.len(),
        skipped = report.skipped_without_id,
        failed = report.failed.len(),
        "ingest finished"
    );
    report
}
