use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
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
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables fall back to [`AppConfig::default`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let log_level = lookup("SHOPCAT_LOG_LEVEL").unwrap_or(defaults.log_level);
    let user_agent = lookup("SHOPCAT_USER_AGENT").unwrap_or(defaults.user_agent);
    let request_timeout_secs = parse_u64(
        "SHOPCAT_REQUEST_TIMEOUT_SECS",
        defaults.request_timeout_secs,
    )?;
    let retry_cooldown_secs =
        parse_u64("SHOPCAT_RETRY_COOLDOWN_SECS", defaults.retry_cooldown_secs)?;
    let inter_request_delay_ms = parse_u64(
        "SHOPCAT_INTER_REQUEST_DELAY_MS",
        defaults.inter_request_delay_ms,
    )?;
    let max_retries = match lookup("SHOPCAT_MAX_RETRIES") {
        Ok(raw) => parse_max_retries(&raw)?,
        Err(_) => defaults.max_retries,
    };

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        retry_cooldown_secs,
        max_retries,
        inter_request_delay_ms,
    })
}

/// Parse `SHOPCAT_MAX_RETRIES`. An empty value or `unbounded` means no cap.
fn parse_max_retries(raw: &str) -> Result<Option<u32>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("unbounded") {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "SHOPCAT_MAX_RETRIES".to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
