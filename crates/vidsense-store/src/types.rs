//! Response envelopes returned by the Elasticsearch REST API.

use serde::Deserialize;
use serde_json::Value;

/// `GET /{index}/_doc/{id}`
#[derive(Debug, Deserialize)]
pub struct GetResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_source")]
    pub source: Option<Value>,
}

/// `POST /{index}/_search`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: HitsEnvelope,
}

/// Only the hit list is read; `total` is ignored because its shape differs
/// between 6.x (bare integer) and 7.x (`{ "value", "relation" }`).
#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

/// `GET /{index}/_count`
#[derive(Debug, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_response_ignores_object_total() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "took": 2,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{ "_index": "videos", "_id": "abc", "_source": { "videoId": "abc" } }]
            }
        }))
        .unwrap();
        assert_eq!(resp.hits.hits.len(), 1);
        assert_eq!(resp.hits.hits[0].id, "abc");
    }

    #[test]
    fn search_response_ignores_legacy_total_and_accepts_missing_source() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "hits": { "total": 3, "hits": [{ "_id": "a" }] }
        }))
        .unwrap();
        assert_eq!(resp.hits.hits.len(), 1);
        assert!(resp.hits.hits[0].source.is_none());
    }
}
