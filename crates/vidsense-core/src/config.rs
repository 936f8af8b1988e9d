use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Scoring endpoint used in development when `VIDSENSE_SCORING_URL` is unset.
pub const DEV_SCORING_URL: &str = "http://127.0.0.1:5000/predict";

/// Hard ceiling on documents returned by a single search.
pub const SEARCH_MAX_RESULTS_CAP: usize = 1000;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:9000,\
http://youtubeanalysistech.com,http://www.youtubeanalysistech.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("VIDSENSE_ENV", "development"))?;

    let elasticsearch_url = require("ELASTICSEARCH_URL")?;
    let elasticsearch_index = require("ELASTICSEARCH_MAIN_INDEX")?;

    let scoring_url = match require("VIDSENSE_SCORING_URL") {
        Ok(url) => url,
        Err(_) if env == Environment::Development => DEV_SCORING_URL.to_string(),
        Err(e) => return Err(e),
    };
    for (var, url) in [
        ("ELASTICSEARCH_URL", &elasticsearch_url),
        ("VIDSENSE_SCORING_URL", &scoring_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(var, format!("'{url}' is not an http(s) URL")));
        }
    }

    let bind_addr = parse_addr("VIDSENSE_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("VIDSENSE_LOG_LEVEL", "info");

    let store_timeout_secs = parse_u64("VIDSENSE_STORE_TIMEOUT_SECS", "30")?;
    let scoring_timeout_secs = parse_u64("VIDSENSE_SCORING_TIMEOUT_SECS", "60")?;
    let analyze_deadline_secs = match lookup("VIDSENSE_ANALYZE_DEADLINE_SECS") {
        Ok(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("VIDSENSE_ANALYZE_DEADLINE_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let search_max_results = or_default("VIDSENSE_SEARCH_MAX_RESULTS", "1000")
        .parse::<usize>()
        .map_err(|e| invalid("VIDSENSE_SEARCH_MAX_RESULTS", e.to_string()))?
        .clamp(1, SEARCH_MAX_RESULTS_CAP);

    let analyze_max_retries = parse_u32("VIDSENSE_ANALYZE_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("VIDSENSE_RETRY_BACKOFF_BASE_MS", "500")?;

    let allowed_origins = parse_origins(&or_default(
        "VIDSENSE_ALLOWED_ORIGINS",
        DEFAULT_ALLOWED_ORIGINS,
    ));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        elasticsearch_url,
        elasticsearch_index,
        scoring_url,
        store_timeout_secs,
        scoring_timeout_secs,
        analyze_deadline_secs,
        search_max_results,
        analyze_max_retries,
        retry_backoff_base_ms,
        allowed_origins,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VIDSENSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_owned())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
