use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub elasticsearch_url: String,
    pub elasticsearch_index: String,
    pub scoring_url: String,
    pub store_timeout_secs: u64,
    pub scoring_timeout_secs: u64,
    pub analyze_deadline_secs: Option<u64>,
    pub search_max_results: usize,
    pub analyze_max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub allowed_origins: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "elasticsearch_url",
                &redact_userinfo(&self.elasticsearch_url),
            )
            .field("elasticsearch_index", &self.elasticsearch_index)
            .field("scoring_url", &redact_userinfo(&self.scoring_url))
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("scoring_timeout_secs", &self.scoring_timeout_secs)
            .field("analyze_deadline_secs", &self.analyze_deadline_secs)
            .field("search_max_results", &self.search_max_results)
            .field("analyze_max_retries", &self.analyze_max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

/// Replace any `user:password@` segment of a URL with `[redacted]@`.
///
/// Elasticsearch URLs commonly embed basic-auth credentials.
pub(crate) fn redact_userinfo(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://[redacted]@{}", &rest[at + 1..]),
        None => url.to_string(),
    }
}
