//! Elasticsearch gateway for video documents.
//!
//! [`StoreClient`] is a cheap-to-clone handle bound to one index. It issues
//! get/search/delete/upsert/count requests over the Elasticsearch REST API and
//! maps store responses onto [`StoreError`] variants.

pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::StoreClient;
pub use error::StoreError;
pub use query::COMMENT_TEXT_FIELD;
