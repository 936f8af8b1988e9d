//! HTTP client for the Elasticsearch document API.
//!
//! Wraps `reqwest` with index-scoped URL building, status mapping, and typed
//! response deserialization. Document ids are percent-encoded into the path.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use vidsense_core::VideoDocument;

use crate::error::StoreError;
use crate::query;
use crate::types::{CountResponse, GetResponse, Hit, SearchResponse};

/// Longest store error body echoed back inside [`StoreError::Rejected`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Gateway to one Elasticsearch index.
///
/// Cloning is cheap: the inner `reqwest::Client` is reference-counted, so a
/// single instance built at startup is shared by every request handler.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: Client,
    base_url: Url,
    index: String,
}

impl StoreClient {
    /// Creates a client for `index` on the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL or `index` is empty, and [`StoreError::Unavailable`] if
    /// the underlying `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, index: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vidsense/0.1 (comment-analysis)")
            .build()?;
        Self::with_client(client, base_url, index)
    }

    /// Creates a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL or `index` is empty.
    pub fn with_client(client: Client, base_url: &str, index: &str) -> Result<Self, StoreError> {
        let invalid = |reason: String| StoreError::InvalidUrl {
            url: base_url.to_owned(),
            reason,
        };

        // Normalise to exactly one trailing slash so a path prefix (e.g. a
        // reverse proxy mount) is kept when segments are appended.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(invalid("expected an http(s) URL".to_owned()));
        }
        if index.trim().is_empty() {
            return Err(invalid("index name is empty".to_owned()));
        }

        Ok(Self {
            client,
            base_url: base,
            index: index.to_owned(),
        })
    }

    /// Checks that the cluster answers on its root endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on network failure or 5xx, and
    /// [`StoreError::Rejected`] on any other non-2xx status.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        expect_success(response).await?;
        Ok(())
    }

    /// Fetches one document by id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the store reports no document for `id`.
    /// - [`StoreError::Unavailable`] on network failure or 5xx.
    /// - [`StoreError::Deserialize`] if the envelope or `_source` does not
    ///   match the expected shape.
    pub async fn get_by_id(&self, id: &str) -> Result<VideoDocument, StoreError> {
        let url = self.url(&["_doc", id])?;
        tracing::debug!(index = %self.index, video_id = id, "fetching document");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found_or_rejected(response, "found", &Value::Bool(false)).await);
        }
        let body = read_json(expect_success(response).await?, || format!("get(id={id})")).await?;

        let envelope: GetResponse =
            serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
                context: format!("get(id={id})"),
                source: e,
            })?;
        if !envelope.found {
            return Err(StoreError::NotFound);
        }

        let source = envelope.source.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        serde_json::from_value(source).map_err(|e| StoreError::Deserialize {
            context: format!("get(id={})._source", envelope.id),
            source: e,
        })
    }

    /// Exact-term search on a single field.
    ///
    /// Returns an empty vector when nothing matches. `max_results` is capped
    /// at [`query::MAX_RESULTS`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on network failure or 5xx,
    /// [`StoreError::Rejected`] on other non-2xx, and
    /// [`StoreError::Deserialize`] if the envelope is malformed.
    pub async fn search_by_term(
        &self,
        field: &str,
        value: &str,
        max_results: usize,
    ) -> Result<Vec<VideoDocument>, StoreError> {
        let body = query::term(field, value, max_results);
        let response = self.search(&body, &format!("term({field}={value})")).await?;
        Ok(documents_from_hits(response.hits.hits))
    }

    /// Search requiring every `(field, value)` pair to match exactly.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::search_by_term`].
    pub async fn search_by_terms(
        &self,
        terms: &[(&str, &str)],
        max_results: usize,
    ) -> Result<Vec<VideoDocument>, StoreError> {
        let body = query::all_terms(terms, max_results);
        let response = self.search(&body, &format!("terms({terms:?})")).await?;
        Ok(documents_from_hits(response.hits.hits))
    }

    /// Full-text match of `keyword` against the comment display text of every
    /// document in the index.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::search_by_term`].
    pub async fn search_by_keyword_in_comments(
        &self,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<VideoDocument>, StoreError> {
        let body = query::comment_keyword(keyword, max_results);
        let response = self
            .search(&body, &format!("comment_keyword({keyword})"))
            .await?;
        Ok(documents_from_hits(response.hits.hits))
    }

    /// Ids of up to `max_results` documents, in store order.
    ///
    /// # Errors
    ///
    /// Same as [`StoreClient::search_by_term`].
    pub async fn list_ids(&self, max_results: usize) -> Result<Vec<String>, StoreError> {
        let body = query::match_all_ids(max_results);
        let response = self.search(&body, "match_all").await?;
        Ok(response.hits.hits.into_iter().map(|hit| hit.id).collect())
    }

    /// Deletes one document by id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the store has no document for `id`.
    /// - [`StoreError::Unavailable`] on network failure or 5xx.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let url = self.url(&["_doc", id])?;
        let response = self.client.delete(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(
                not_found_or_rejected(response, "result", &Value::from("not_found")).await,
            );
        }
        expect_success(response).await?;
        tracing::info!(index = %self.index, video_id = id, "document deleted");
        Ok(())
    }

    /// Indexes `document` under `id`, replacing any existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on network failure or 5xx, and
    /// [`StoreError::Rejected`] if the store refuses the document.
    pub async fn upsert(&self, id: &str, document: &VideoDocument) -> Result<(), StoreError> {
        let url = self.url(&["_doc", id])?;
        let response = self.client.put(url).json(document).send().await?;
        expect_success(response).await?;
        tracing::info!(
            index = %self.index,
            video_id = id,
            comment_count = document.comment_entries().len(),
            "document indexed"
        );
        Ok(())
    }

    /// Number of documents in the index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on network failure or 5xx,
    /// [`StoreError::Rejected`] on other non-2xx, and
    /// [`StoreError::Deserialize`] if `count` is missing.
    pub async fn count_all(&self) -> Result<u64, StoreError> {
        let url = self.url(&["_count"])?;
        let response = self.client.get(url).send().await?;
        let body = read_json(expect_success(response).await?, || "count".to_owned()).await?;
        let parsed: CountResponse =
            serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
                context: "count".to_owned(),
                source: e,
            })?;
        Ok(parsed.count)
    }

    async fn search(&self, body: &Value, context: &str) -> Result<SearchResponse, StoreError> {
        let url = self.url(&["_search"])?;
        tracing::debug!(index = %self.index, query = context, "searching documents");

        let response = self.client.post(url).json(body).send().await?;
        let json = read_json(expect_success(response).await?, || {
            format!("search({context})")
        })
        .await?;
        serde_json::from_value(json).map_err(|e| StoreError::Deserialize {
            context: format!("search({context})"),
            source: e,
        })
    }

    /// Builds `{base}/{index}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .push(&self.index)
            .extend(segments);
        Ok(url)
    }
}

fn documents_from_hits(hits: Vec<Hit>) -> Vec<VideoDocument> {
    hits.into_iter()
        .filter_map(|hit| {
            let source = hit.source?;
            match serde_json::from_value::<VideoDocument>(source) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(id = %hit.id, error = %e, "skipping unparseable search hit");
                    None
                }
            }
        })
        .collect()
}

/// Passes 2xx responses through; maps 5xx to `Unavailable` and anything else
/// to `Rejected`.
async fn expect_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.is_server_error() {
        response.error_for_status_ref()?;
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

/// A 404 means "no such document" only when the body says so; a missing
/// index also answers 404 but with an `error` object instead.
async fn not_found_or_rejected(response: Response, key: &str, expected: &Value) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let is_missing_doc = serde_json::from_str::<Value>(&body)
        .ok()
        .is_some_and(|json| json.get(key) == Some(expected));
    if is_missing_doc {
        StoreError::NotFound
    } else {
        StoreError::Rejected {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

async fn read_json<F>(response: Response, context: F) -> Result<Value, StoreError>
where
    F: FnOnce() -> String,
{
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
        context: context(),
        source: e,
    })
}
