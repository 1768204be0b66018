use crate::app_config::{AppConfig, CategoryIds};
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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("SHOPDATA_LOG_LEVEL", "info");
    let api_base_url = or_default("API_BASE_URL", "http://localhost:8080");
    let api_bearer_token = lookup("API_BEARER_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let request_timeout_secs = parse_u64("SHOPDATA_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHOPDATA_USER_AGENT", "shopdata/0.1 (catalog-upload)");

    Ok(AppConfig {
        log_level,
        api_base_url,
        api_bearer_token,
        request_timeout_secs,
        user_agent,
    })
}

/// Load the catalog category ids from `CATEGORY_ID_*` variables.
///
/// Kept apart from [`load_app_config`] because only uploads need them; the
/// offline commands never fail on a malformed id. Call after
/// [`load_app_config`] so `.env` values are visible.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if an id is present but not a
/// positive integer.
pub fn load_category_ids_from_env() -> Result<CategoryIds, ConfigError> {
    build_category_ids(|key| std::env::var(key))
}

fn build_category_ids<F>(lookup: F) -> Result<CategoryIds, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let parse_category_id = |var: &str, default: i64| -> Result<i64, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) if raw.trim().is_empty() => Ok(default),
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected a positive integer, got '{raw}'"),
                }),
        }
    };

    let defaults = CategoryIds::default();
    Ok(CategoryIds {
        phone: parse_category_id("CATEGORY_ID_PHONE", defaults.phone)?,
        laptop: parse_category_id("CATEGORY_ID_LAPTOP", defaults.laptop)?,
        smartwatch: parse_category_id("CATEGORY_ID_SMARTWATCH", defaults.smartwatch)?,
        tablet: parse_category_id("CATEGORY_ID_TABLET", defaults.tablet)?,
        default: parse_category_id("CATEGORY_ID_DEFAULT", defaults.default)?,
    })
}
