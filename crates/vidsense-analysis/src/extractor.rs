//! Comment text extraction. Pure, no I/O.
//!
//! Each comment's text lives at `snippet.topLevelComment.snippet.textDisplay`.
//! A comment missing any segment of that path, or whose text is empty, is
//! skipped on its own; it never fails the extraction.

use vidsense_core::{CommentEntry, Comments, VideoDocument};

use crate::types::NormalizedCommentSet;

/// All usable comment texts of one document, in stored order.
///
/// A document whose `comments` attribute is absent or not an array yields
/// an empty set.
#[must_use]
pub fn extract_all(document: &VideoDocument) -> NormalizedCommentSet {
    let video_id = document.video_id.as_deref().unwrap_or_default();
    match &document.comments {
        None => tracing::debug!(video_id, "document has no comments attribute"),
        Some(Comments::Other(_)) => tracing::debug!(video_id, "comments attribute is not an array"),
        Some(Comments::List(_)) => {}
    }
    NormalizedCommentSet::from_texts(comment_texts(document))
}

/// Comment texts across `documents` that contain `keyword`.
///
/// Matching is a literal, case-sensitive substring test: `"Love"` does not
/// match `"love it"`. Callers wanting case-insensitive matching must
/// normalise both sides themselves. Results keep document order, then
/// comment order within each document.
#[must_use]
pub fn extract_matching(documents: &[VideoDocument], keyword: &str) -> NormalizedCommentSet {
    NormalizedCommentSet::from_texts(
        documents
            .iter()
            .flat_map(comment_texts)
            .filter(|text| text.contains(keyword)),
    )
}

fn comment_texts(document: &VideoDocument) -> impl Iterator<Item = &str> {
    document
        .comment_entries()
        .iter()
        .filter_map(CommentEntry::text_display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn comment(text: &str) -> Value {
        json!({ "snippet": { "topLevelComment": { "snippet": { "textDisplay": text } } } })
    }

    fn doc(value: Value) -> VideoDocument {
        serde_json::from_value(value).expect("valid document")
    }

    #[test]
    fn extract_all_returns_texts_in_order() {
        let d = doc(json!({
            "videoId": "v1",
            "comments": [comment("great video"), comment("loved it")]
        }));
        assert_eq!(extract_all(&d).as_slice(), ["great video", "loved it"]);
    }

    #[test]
    fn extract_all_on_missing_or_empty_comments_is_empty() {
        assert!(extract_all(&doc(json!({ "videoId": "v1" }))).is_empty());
        assert!(extract_all(&doc(json!({ "videoId": "v1", "comments": [] }))).is_empty());
        assert!(extract_all(&doc(json!({ "videoId": "v1", "comments": null }))).is_empty());
    }

    #[test]
    fn extract_all_skips_broken_paths_and_keeps_going() {
        let d = doc(json!({
            "comments": [
                comment("first"),
                {},
                { "snippet": {} },
                { "snippet": { "topLevelComment": {} } },
                { "snippet": { "topLevelComment": { "snippet": {} } } },
                { "snippet": { "topLevelComment": { "snippet": { "textDisplay": 5 } } } },
                "not an object",
                comment(""),
                comment("last")
            ]
        }));
        assert_eq!(extract_all(&d).as_slice(), ["first", "last"]);
    }

    #[test]
    fn extract_matching_is_case_sensitive_substring() {
        let docs = vec![
            doc(json!({ "comments": [comment("I love this"), comment("Love it"), comment("meh")] })),
            doc(json!({ "comments": [comment("lovely"), comment("glove")] })),
        ];
        let out = extract_matching(&docs, "love");
        assert_eq!(out.as_slice(), ["I love this", "lovely", "glove"]);
        assert!(out.as_slice().iter().all(|t| t.contains("love")));
    }

    #[test]
    fn extract_matching_preserves_document_then_comment_order() {
        let docs = vec![
            doc(json!({ "comments": [comment("b x"), comment("a x")] })),
            doc(json!({ "videoId": "no-comments" })),
            doc(json!({ "comments": [comment("c x")] })),
        ];
        assert_eq!(
            extract_matching(&docs, "x").as_slice(),
            ["b x", "a x", "c x"]
        );
    }

    #[test]
    fn extract_matching_without_hits_is_empty() {
        let docs = vec![doc(json!({ "comments": [comment("nothing here")] }))];
        assert!(extract_matching(&docs, "absent").is_empty());
        assert!(extract_matching(&[], "absent").is_empty());
    }
}
