use std::env::VarError;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// guest-mode configuration with AI features disabled.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("STADIUMAP_ENV", "development"))?;
    let log_level = or_default("STADIUMAP_LOG_LEVEL", "info");
    let data_dir = or_default("STADIUMAP_DATA_DIR", "./.stadiumap").into();

    let gemini_api_key = lookup("GEMINI_API_KEY")
        .or_else(|_| lookup("API_KEY"))
        .ok()
        .filter(|k| !k.trim().is_empty());
    let gemini_base_url = or_default(
        "STADIUMAP_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_model = or_default("STADIUMAP_GEMINI_MODEL", "gemini-2.5-flash");
    let gemini_timeout_secs = parse_var(&lookup, "STADIUMAP_GEMINI_TIMEOUT_SECS", "30")?;
    let gemini_max_retries = parse_var(&lookup, "STADIUMAP_GEMINI_MAX_RETRIES", "2")?;
    let gemini_retry_backoff_base_ms =
        parse_var(&lookup, "STADIUMAP_GEMINI_RETRY_BACKOFF_BASE_MS", "500")?;

    let scan_max_results = parse_var(&lookup, "STADIUMAP_SCAN_MAX_RESULTS", "15")?;
    let scan_min_zoom = parse_var(&lookup, "STADIUMAP_SCAN_MIN_ZOOM", "6")?;
    let scan_debounce_ms = parse_var(&lookup, "STADIUMAP_SCAN_DEBOUNCE_MS", "1000")?;
    let lod_min_zoom = parse_var(&lookup, "STADIUMAP_LOD_MIN_ZOOM", "5")?;
    let dedup_radius_meters: f64 = parse_var(&lookup, "STADIUMAP_DEDUP_RADIUS_METERS", "1000")?;

    if !dedup_radius_meters.is_finite() || dedup_radius_meters < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STADIUMAP_DEDUP_RADIUS_METERS".to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
        gemini_timeout_secs,
        gemini_max_retries,
        gemini_retry_backoff_base_ms,
        scan_max_results,
        scan_min_zoom,
        scan_debounce_ms,
        lod_min_zoom,
        dedup_radius_meters,
    })
}

fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STADIUMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
