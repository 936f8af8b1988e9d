use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("ELASTICSEARCH_URL", "http://localhost:9200");
    m.insert("ELASTICSEARCH_MAIN_INDEX", "videos");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "VIDSENSE_ENV"));
}

#[test]
fn build_app_config_fails_without_elasticsearch_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ELASTICSEARCH_URL"),
        "expected MissingEnvVar(ELASTICSEARCH_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_index() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("ELASTICSEARCH_URL", "http://localhost:9200");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ELASTICSEARCH_MAIN_INDEX"),
        "expected MissingEnvVar(ELASTICSEARCH_MAIN_INDEX), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_required_var_as_missing() {
    let mut map = full_env();
    map.insert("ELASTICSEARCH_MAIN_INDEX", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ELASTICSEARCH_MAIN_INDEX"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.elasticsearch_url, "http://localhost:9200");
    assert_eq!(cfg.elasticsearch_index, "videos");
    assert_eq!(cfg.scoring_url, DEV_SCORING_URL);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.store_timeout_secs, 30);
    assert_eq!(cfg.scoring_timeout_secs, 60);
    assert!(cfg.analyze_deadline_secs.is_none());
    assert_eq!(cfg.search_max_results, 1000);
    assert_eq!(cfg.analyze_max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.allowed_origins.len(), 4);
    assert!(cfg
        .allowed_origins
        .contains(&"http://localhost:3000".to_string()));
}

#[test]
fn build_app_config_requires_scoring_url_in_production() {
    let mut map = full_env();
    map.insert("VIDSENSE_ENV", "production");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "VIDSENSE_SCORING_URL"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_uses_explicit_scoring_url() {
    let mut map = full_env();
    map.insert("VIDSENSE_ENV", "production");
    map.insert("VIDSENSE_SCORING_URL", "http://scorer.internal:5000/predict");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scoring_url, "http://scorer.internal:5000/predict");
}

#[test]
fn build_app_config_rejects_non_http_store_url() {
    let mut map = full_env();
    map.insert("ELASTICSEARCH_URL", "localhost:9200");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ELASTICSEARCH_URL"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("VIDSENSE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VIDSENSE_BIND_ADDR"),
        "expected InvalidEnvVar(VIDSENSE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn analyze_deadline_secs_override() {
    let mut map = full_env();
    map.insert("VIDSENSE_ANALYZE_DEADLINE_SECS", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.analyze_deadline_secs, Some(15));
}

#[test]
fn analyze_deadline_secs_invalid() {
    let mut map = full_env();
    map.insert("VIDSENSE_ANALYZE_DEADLINE_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VIDSENSE_ANALYZE_DEADLINE_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn search_max_results_is_clamped_to_cap() {
    let mut map = full_env();
    map.insert("VIDSENSE_SEARCH_MAX_RESULTS", "50000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_max_results, SEARCH_MAX_RESULTS_CAP);

    map.insert("VIDSENSE_SEARCH_MAX_RESULTS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_max_results, 1);
}

#[test]
fn store_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("VIDSENSE_STORE_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VIDSENSE_STORE_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn allowed_origins_override_is_trimmed() {
    let mut map = full_env();
    map.insert(
        "VIDSENSE_ALLOWED_ORIGINS",
        " https://app.example.com/ , ,http://localhost:5173",
    );
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.allowed_origins,
        vec![
            "https://app.example.com".to_string(),
            "http://localhost:5173".to_string()
        ]
    );
}
