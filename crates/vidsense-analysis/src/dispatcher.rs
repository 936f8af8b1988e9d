//! Client for the external scoring backend.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::AnalysisError;
use crate::types::{AnalysisResult, NormalizedCommentSet};

/// Join comment texts with single spaces, preserving order.
#[must_use]
pub fn build_request_text(comments: &NormalizedCommentSet) -> String {
    comments.as_slice().join(" ")
}

#[derive(Serialize)]
struct ScoringRequest<'a> {
    text: &'a str,
}

/// Scoring backend HTTP client.
///
/// One instance serves both analysis flows; the endpoint is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    client: Client,
    endpoint: Url,
}

impl ScoringClient {
    /// Create a client posting to `endpoint` (e.g. `http://127.0.0.1:5000/predict`).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidEndpoint`] if `endpoint` is not an
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, AnalysisError> {
        let invalid = |reason: String| AnalysisError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason,
        };
        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) URL".to_owned()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vidsense/0.1 (comment-analysis)")
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: url,
        })
    }

    /// Send `request_text` for scoring. Exactly one outbound request, no retry.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::ScoringUnavailable`] on connection failure, timeout,
    ///   or a non-2xx status.
    /// - [`AnalysisError::ScoringResponseMalformed`] if a 2xx body is not a
    ///   JSON object with a `prediction` field.
    pub async fn dispatch(&self, request_text: &str) -> Result<AnalysisResult, AnalysisError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            text_len = request_text.len(),
            "dispatching scoring request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ScoringRequest { text: request_text })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(AnalysisError::ScoringUnavailable)?;

        let body = response
            .text()
            .await
            .map_err(AnalysisError::ScoringUnavailable)?;

        let prediction = parse_prediction(&body)?;
        tracing::info!(endpoint = %self.endpoint, "received prediction");
        Ok(AnalysisResult { prediction })
    }
}

fn parse_prediction(body: &str) -> Result<Value, AnalysisError> {
    let json: Value = serde_json::from_str(body).map_err(|e| {
        AnalysisError::ScoringResponseMalformed(format!("response is not JSON: {e}"))
    })?;
    match json {
        Value::Object(mut fields) => fields.remove("prediction").ok_or_else(|| {
            AnalysisError::ScoringResponseMalformed("response has no `prediction` field".to_owned())
        }),
        _ => Err(AnalysisError::ScoringResponseMalformed(
            "response is not a JSON object".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ScoringClient {
        ScoringClient::new(&format!("{}/predict", server.uri()), 5).expect("client")
    }

    #[test]
    fn build_request_text_joins_with_single_spaces() {
        let set = NormalizedCommentSet::from_texts(["a", "b"]);
        assert_eq!(build_request_text(&set), "a b");
    }

    #[test]
    fn build_request_text_of_empty_set_is_empty() {
        assert_eq!(build_request_text(&NormalizedCommentSet::default()), "");
    }

    #[test]
    fn build_request_text_keeps_inner_whitespace() {
        let set = NormalizedCommentSet::from_texts(["great  video", "loved it "]);
        assert_eq!(build_request_text(&set), "great  video loved it ");
    }

    #[test]
    fn parse_prediction_passes_value_through() {
        let value = parse_prediction(r#"{"prediction": {"label": "pos", "score": 0.91}}"#).unwrap();
        assert_eq!(value, json!({ "label": "pos", "score": 0.91 }));
    }

    #[test]
    fn parse_prediction_keeps_explicit_null() {
        assert_eq!(parse_prediction(r#"{"prediction": null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn parse_prediction_rejects_non_object() {
        assert!(matches!(
            parse_prediction("[1, 2]"),
            Err(AnalysisError::ScoringResponseMalformed(_))
        ));
        assert!(matches!(
            parse_prediction("<html>"),
            Err(AnalysisError::ScoringResponseMalformed(_))
        ));
    }

    #[test]
    fn new_rejects_non_http_endpoint() {
        assert!(matches!(
            ScoringClient::new("unix:///tmp/score.sock", 5),
            Err(AnalysisError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn dispatch_posts_text_and_returns_prediction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_json(json!({ "text": "great video loved it" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "prediction": "positive" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .dispatch("great video loved it")
            .await
            .expect("dispatch should succeed");
        assert_eq!(result.prediction, json!("positive"));
    }

    #[tokio::test]
    async fn dispatch_maps_500_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).dispatch("text").await.unwrap_err();
        assert!(matches!(err, AnalysisError::ScoringUnavailable(_)), "got {err:?}");
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn dispatch_maps_missing_prediction_to_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).dispatch("text").await.unwrap_err();
        assert!(
            matches!(err, AnalysisError::ScoringResponseMalformed(_)),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn dispatch_maps_connection_refused_to_unavailable() {
        let client = ScoringClient::new("http://127.0.0.1:1/predict", 5).unwrap();
        let err = client.dispatch("text").await.unwrap_err();
        assert!(matches!(err, AnalysisError::ScoringUnavailable(_)), "got {err:?}");
        assert!(err.is_transient());
    }
}
