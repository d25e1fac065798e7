use uuid::Uuid;

use crate::app_config::{AppConfig, DEFAULT_TENANT_ID};
use crate::ConfigError;

/// Load backfill configuration from environment variables.
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

/// Load backfill configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let supabase_url = require("SUPABASE_URL")?
        .trim_end_matches('/')
        .to_string();
    let supabase_service_key = require("SUPABASE_SERVICE_KEY")?;
    let supabase_bearer_token = lookup("SUPABASE_BEARER_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| supabase_service_key.clone());

    let tenant_raw = or_default("BACKFILL_TENANT_ID", DEFAULT_TENANT_ID);
    let tenant_id = Uuid::parse_str(tenant_raw.trim())
        .map_err(|e| invalid("BACKFILL_TENANT_ID", e.to_string()))?;

    let log_level = or_default("BACKFILL_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("BACKFILL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("BACKFILL_USER_AGENT", "engagement-backfill/0.1");

    let progress_every = parse_u32("BACKFILL_PROGRESS_EVERY", "10")?;
    if progress_every == 0 {
        return Err(invalid(
            "BACKFILL_PROGRESS_EVERY",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        supabase_url,
        supabase_service_key,
        supabase_bearer_token,
        tenant_id,
        log_level,
        request_timeout_secs,
        user_agent,
        progress_every,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
