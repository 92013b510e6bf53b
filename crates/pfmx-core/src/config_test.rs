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
    m.insert("PFMX_API_URL", "https://api.example.com/get-report");
    m
}

#[test]
fn build_app_config_ignores_unrelated_deployment_vars() {
    let mut map = full_env();
    map.insert("PFMX_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[test]
fn build_app_config_fails_without_api_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PFMX_API_URL"),
        "expected MissingEnvVar(PFMX_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("PFMX_API_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PFMX_API_URL"),
        "expected MissingEnvVar(PFMX_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_api_url_without_scheme() {
    let mut map = HashMap::new();
    map.insert("PFMX_API_URL", "api.example.com/get-report");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.api_url, "https://api.example.com/get-report");
    assert!(cfg.live_url.is_none());
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.report_timeout_secs, 30);
    assert_eq!(cfg.live_timeout_secs, 15);
    assert_eq!(cfg.user_agent, "pfmx/0.1 (retail-kpi)");
    assert!(cfg.cache_negotiation);
}

#[test]
fn build_app_config_reads_live_url_override() {
    let mut map = full_env();
    map.insert("PFMX_LIVE_URL", "/report/live-inside");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.live_url.as_deref(), Some("/report/live-inside"));
}

#[test]
fn build_app_config_blank_live_url_is_none() {
    let mut map = full_env();
    map.insert("PFMX_LIVE_URL", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.live_url.is_none());
}

#[test]
fn report_timeout_override() {
    let mut map = full_env();
    map.insert("PFMX_REPORT_TIMEOUT_SECS", "90");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.report_timeout_secs, 90);
}

#[test]
fn report_timeout_invalid() {
    let mut map = full_env();
    map.insert("PFMX_REPORT_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PFMX_REPORT_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PFMX_REPORT_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn live_timeout_zero_is_rejected() {
    let mut map = full_env();
    map.insert("PFMX_LIVE_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PFMX_LIVE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PFMX_LIVE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn cache_negotiation_can_be_disabled() {
    let mut map = full_env();
    map.insert("PFMX_CACHE_NEGOTIATION", "false");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.cache_negotiation);
}

#[test]
fn cache_negotiation_invalid() {
    let mut map = full_env();
    map.insert("PFMX_CACHE_NEGOTIATION", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PFMX_CACHE_NEGOTIATION"),
        "expected InvalidEnvVar(PFMX_CACHE_NEGOTIATION), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = full_env();
    map.insert("PFMX_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}
