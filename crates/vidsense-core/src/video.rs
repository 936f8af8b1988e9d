//! Schemas for the video documents held in the document store.
//!
//! Documents are owned by the store and only read here. Attributes the schema
//! does not name are kept in `extra` maps so a document survives a
//! read/re-index round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category value marking a brand video; such documents also carry `brandName`.
pub const BRAND_CATEGORY: &str = "brand";

/// A stored video document.
///
/// The named attributes are read leniently: a value of the wrong JSON type
/// leaves the typed field `None` and stays in `extra` untouched, so neither
/// reading nor re-indexing ever rejects a document over its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct VideoDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    /// `None` only when the attribute is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Comments>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoDocument {
    /// Comment entries in stored order; empty unless `comments` is an array.
    #[must_use]
    pub fn comment_entries(&self) -> &[CommentEntry] {
        match &self.comments {
            Some(Comments::List(entries)) => entries,
            Some(Comments::Other(_)) | None => &[],
        }
    }
}

impl From<Map<String, Value>> for VideoDocument {
    fn from(mut extra: Map<String, Value>) -> Self {
        let video_id = take_string(&mut extra, "videoId");
        let video_category = take_string(&mut extra, "videoCategory");
        let brand_name = take_string(&mut extra, "brandName");
        let comments = extra.remove("comments").map(Comments::from);
        Self {
            video_id,
            video_category,
            brand_name,
            comments,
            extra,
        }
    }
}

/// Remove `key` when it holds a string; any other value is left in place.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            map.insert(key.to_owned(), other);
            None
        }
    }
}

/// The `comments` attribute as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Comments {
    List(Vec<CommentEntry>),
    /// `null` or any non-array value, kept verbatim.
    Other(Value),
}

impl From<Value> for Comments {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Comments::List(
                items
                    .into_iter()
                    .map(|item| {
                        CommentEntry::deserialize(&item).unwrap_or(CommentEntry::Opaque(item))
                    })
                    .collect(),
            ),
            other => Comments::Other(other),
        }
    }
}

/// One element of a document's `comments` array.
///
/// Entries that match the comment-thread shape parse as [`CommentEntry::Thread`];
/// anything else (a bare string, a non-string `textDisplay`, a `snippet` that is
/// not an object) is kept verbatim as [`CommentEntry::Opaque`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentEntry {
    Thread(CommentThread),
    Opaque(Value),
}

impl CommentEntry {
    /// Resolve `snippet.topLevelComment.snippet.textDisplay`.
    ///
    /// Returns `None` if the entry is opaque or any path segment is absent.
    #[must_use]
    pub fn text_display(&self) -> Option<&str> {
        match self {
            CommentEntry::Thread(thread) => thread
                .snippet
                .as_ref()?
                .top_level_comment
                .as_ref()?
                .snippet
                .as_ref()?
                .text_display
                .as_deref(),
            CommentEntry::Opaque(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<ThreadSnippet>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_level_comment: Option<TopLevelComment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<CommentSnippet>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_display: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
