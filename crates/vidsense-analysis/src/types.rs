use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered, non-empty comment strings drawn from one or more documents.
///
/// Only constructed through [`NormalizedCommentSet::from_texts`], which drops
/// empty strings, so every entry is guaranteed non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCommentSet(Vec<String>);

impl NormalizedCommentSet {
    /// Collects `texts` in order, skipping empty strings.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            texts
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Scoring backend response. `prediction` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub prediction: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub video_id: String,
    pub prediction: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordAnalysis {
    pub keyword: String,
    pub prediction: Value,
}
