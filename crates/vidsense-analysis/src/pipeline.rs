//! Analysis orchestration: fetch → extract → join → dispatch.

use std::future::Future;
use std::time::Duration;

use vidsense_store::{query::MAX_RESULTS, StoreClient};

use crate::dispatcher::{build_request_text, ScoringClient};
use crate::error::AnalysisError;
use crate::extractor::{extract_all, extract_matching};
use crate::retry::retry_with_backoff;
use crate::types::{KeywordAnalysis, VideoAnalysis};

/// Runs the two analysis flows against an injected store and scorer.
///
/// Holds only read-only handles, so one instance is cloned into every
/// request. Transient failures are retried only when the caller opts in
/// with [`Analyzer::with_retry`]; the optional deadline bounds the whole
/// request, retries and back-off included.
#[derive(Debug, Clone)]
pub struct Analyzer {
    store: StoreClient,
    scorer: ScoringClient,
    search_max_results: usize,
    deadline: Option<Duration>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl Analyzer {
    #[must_use]
    pub fn new(store: StoreClient, scorer: ScoringClient) -> Self {
        Self {
            store,
            scorer,
            search_max_results: MAX_RESULTS,
            deadline: None,
            max_retries: 0,
            backoff_base_ms: 0,
        }
    }

    /// Cap on documents pulled by a keyword search (clamped to `1..=1000`).
    #[must_use]
    pub fn with_search_max_results(mut self, max_results: usize) -> Self {
        self.search_max_results = max_results.clamp(1, MAX_RESULTS);
        self
    }

    /// Bound each analysis request by `deadline`, retries included.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Retry transient store and scoring failures up to `max_retries` times.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Score the comments of one video.
    ///
    /// 1. Fetch the document; a missing id is [`AnalysisError::NotFound`].
    /// 2. Extract comment texts; none is [`AnalysisError::NoComments`] and no
    ///    scoring call is made.
    /// 3. Join and dispatch; scorer failures propagate unchanged.
    ///
    /// # Errors
    ///
    /// Returns the [`AnalysisError`] variant for whichever step failed, or
    /// [`AnalysisError::DeadlineExceeded`].
    pub async fn analyze_by_id(&self, video_id: &str) -> Result<VideoAnalysis, AnalysisError> {
        self.within_deadline(retry_with_backoff(
            self.max_retries,
            self.backoff_base_ms,
            || self.score_video(video_id),
        ))
        .await
    }

    /// Score every comment, across all videos, that contains `keyword`.
    ///
    /// The store search is a full-text match, so it can return documents
    /// whose comments only match after analysis (e.g. stemming or case).
    /// Those are then narrowed by the literal, case-sensitive
    /// [`extract_matching`] filter.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::NoMatches`] if the search returns no documents,
    /// [`AnalysisError::NoComments`] if none of their comments contain
    /// `keyword`, otherwise store or scorer failures.
    pub async fn analyze_by_keyword(&self, keyword: &str) -> Result<KeywordAnalysis, AnalysisError> {
        self.within_deadline(retry_with_backoff(
            self.max_retries,
            self.backoff_base_ms,
            || self.score_keyword(keyword),
        ))
        .await
    }

    async fn score_video(&self, video_id: &str) -> Result<VideoAnalysis, AnalysisError> {
        tracing::info!(video_id, "fetching document for analysis");
        let document = self.store.get_by_id(video_id).await?;

        let comments = extract_all(&document);
        if comments.is_empty() {
            tracing::info!(video_id, "no usable comments extracted");
            return Err(AnalysisError::NoComments);
        }
        tracing::info!(
            video_id,
            comment_count = comments.len(),
            "comments extracted"
        );

        let result = self.scorer.dispatch(&build_request_text(&comments)).await?;
        Ok(VideoAnalysis {
            video_id: video_id.to_owned(),
            prediction: result.prediction,
        })
    }

    async fn score_keyword(&self, keyword: &str) -> Result<KeywordAnalysis, AnalysisError> {
        tracing::info!(keyword, "searching comments for keyword");
        let documents = self
            .store
            .search_by_keyword_in_comments(keyword, self.search_max_results)
            .await?;
        if documents.is_empty() {
            tracing::info!(keyword, "no documents matched keyword");
            return Err(AnalysisError::NoMatches);
        }

        let comments = extract_matching(&documents, keyword);
        if comments.is_empty() {
            tracing::info!(
                keyword,
                document_count = documents.len(),
                "matched documents had no comments containing keyword"
            );
            return Err(AnalysisError::NoComments);
        }
        tracing::info!(
            keyword,
            document_count = documents.len(),
            comment_count = comments.len(),
            "keyword comments extracted"
        );

        let result = self.scorer.dispatch(&build_request_text(&comments)).await?;
        Ok(KeywordAnalysis {
            keyword: keyword.to_owned(),
            prediction: result.prediction,
        })
    }

    async fn within_deadline<T, Fut>(&self, work: Fut) -> Result<T, AnalysisError>
    where
        Fut: Future<Output = Result<T, AnalysisError>>,
    {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, work).await.unwrap_or_else(|_| {
                tracing::warn!(deadline_secs = limit.as_secs_f64(), "analysis deadline exceeded");
                Err(AnalysisError::DeadlineExceeded(limit))
            }),
            None => work.await,
        }
    }
}
