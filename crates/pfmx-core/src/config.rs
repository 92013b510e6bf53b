use crate::app_config::AppConfig;
use crate::ConfigError;

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
/// Empty values are treated exactly like unset ones, so `PFMX_API_URL=` in a
/// `.env` file still fails fast at startup instead of on the first request.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let get = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        get(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { get(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{other}\""),
            }),
        }
    };

    let api_url = require("PFMX_API_URL")?;
    if !api_url.contains("://") {
        return Err(ConfigError::InvalidUrl {
            url: api_url,
            reason: "missing scheme (expected e.g. https://host)".to_string(),
        });
    }
    let live_url = get("PFMX_LIVE_URL");

    let log_level = or_default("PFMX_LOG_LEVEL", "info");

    let report_timeout_secs = parse_u64("PFMX_REPORT_TIMEOUT_SECS", "30")?;
    let live_timeout_secs = parse_u64("PFMX_LIVE_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("PFMX_USER_AGENT", "pfmx/0.1 (retail-kpi)");
    let cache_negotiation = parse_bool("PFMX_CACHE_NEGOTIATION", "true")?;

    Ok(AppConfig {
        log_level,
        api_url,
        live_url,
        report_timeout_secs,
        live_timeout_secs,
        user_agent,
        cache_negotiation,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
