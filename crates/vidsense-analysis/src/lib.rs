//! Comment extraction and analysis dispatch.
//!
//! Pulls comment text out of video documents, joins it into a single scoring
//! request, and forwards it to an external prediction service. The
//! [`Analyzer`] composes the document store, the [`extractor`], and the
//! [`ScoringClient`] into the by-id and by-keyword analysis flows.

pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod retry;
pub mod types;

pub use dispatcher::{build_request_text, ScoringClient};
pub use error::AnalysisError;
pub use extractor::{extract_all, extract_matching};
pub use pipeline::Analyzer;
pub use retry::retry_with_backoff;
pub use types::{AnalysisResult, KeywordAnalysis, NormalizedCommentSet, VideoAnalysis};
