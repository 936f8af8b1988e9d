//! Shared configuration and document schemas for the vidsense services.

pub mod app_config;
pub mod config;
pub mod video;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use video::{CommentEntry, CommentThread, Comments, VideoDocument, BRAND_CATEGORY};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
