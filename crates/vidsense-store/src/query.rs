//! Query DSL bodies for the `_search` endpoint.
//!
//! Kept as pure functions so the shapes can be asserted without a server.

use serde_json::{json, Value};

/// Nested path of a comment's display text inside a video document.
pub const COMMENT_TEXT_FIELD: &str = "comments.snippet.topLevelComment.snippet.textDisplay";

/// Upper bound on `size` for any search issued by the gateway.
pub const MAX_RESULTS: usize = 1000;

pub(crate) fn clamp_size(max_results: usize) -> usize {
    max_results.min(MAX_RESULTS)
}

/// All documents, ids only.
#[must_use]
pub fn match_all_ids(max_results: usize) -> Value {
    json!({
        "size": clamp_size(max_results),
        "_source": false,
        "query": { "match_all": {} }
    })
}

/// Exact-term match on a single field.
#[must_use]
pub fn term(field: &str, value: &str, max_results: usize) -> Value {
    json!({
        "size": clamp_size(max_results),
        "query": { "term": { field: value } }
    })
}

/// Conjunction of exact-term matches, evaluated in filter context.
///
/// An empty `terms` slice degrades to `match_all`.
#[must_use]
pub fn all_terms(terms: &[(&str, &str)], max_results: usize) -> Value {
    if terms.is_empty() {
        return json!({
            "size": clamp_size(max_results),
            "query": { "match_all": {} }
        });
    }
    let filters: Vec<Value> = terms
        .iter()
        .map(|(field, value)| json!({ "term": { *field: *value } }))
        .collect();
    json!({
        "size": clamp_size(max_results),
        "query": { "bool": { "filter": filters } }
    })
}

/// Full-text match of `keyword` against every comment's display text.
#[must_use]
pub fn comment_keyword(keyword: &str, max_results: usize) -> Value {
    json!({
        "size": clamp_size(max_results),
        "query": {
            "bool": {
                "must": { "match": { COMMENT_TEXT_FIELD: keyword } }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_all_ids_disables_source() {
        let body = match_all_ids(1000);
        assert_eq!(body["_source"], json!(false));
        assert_eq!(body["size"], json!(1000));
        assert!(body["query"]["match_all"].is_object());
    }

    #[test]
    fn term_uses_field_as_key() {
        let body = term("videoCategory", "music", 25);
        assert_eq!(body["query"]["term"]["videoCategory"], json!("music"));
        assert_eq!(body["size"], json!(25));
    }

    #[test]
    fn size_is_capped() {
        assert_eq!(term("videoCategory", "music", 50_000)["size"], json!(1000));
        assert_eq!(comment_keyword("x", 5_000)["size"], json!(1000));
    }

    #[test]
    fn all_terms_builds_bool_filter_in_order() {
        let body = all_terms(&[("videoCategory", "brand"), ("brandName", "Acme")], 10);
        let filters = body["query"]["bool"]["filter"]
            .as_array()
            .expect("filter array");
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0]["term"]["videoCategory"], json!("brand"));
        assert_eq!(filters[1]["term"]["brandName"], json!("Acme"));
    }

    #[test]
    fn all_terms_without_terms_matches_everything() {
        let body = all_terms(&[], 10);
        assert!(body["query"]["match_all"].is_object());
    }

    #[test]
    fn comment_keyword_targets_nested_text_field() {
        let body = comment_keyword("love", 1000);
        assert_eq!(
            body["query"]["bool"]["must"]["match"][COMMENT_TEXT_FIELD],
            json!("love")
        );
    }
}
