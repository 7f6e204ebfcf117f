use chrono::FixedOffset;

use crate::app_config::{FedexConfig, Mode};
use crate::credentials::Credentials;
use crate::ConfigError;

/// Load FedEx configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_fedex_config() -> Result<FedexConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_fedex_config_from_env()
}

/// Load FedEx configuration from environment variables already in the process.
///
/// Unlike [`load_fedex_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_fedex_config_from_env() -> Result<FedexConfig, ConfigError> {
    build_fedex_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_fedex_config<F>(lookup: F) -> Result<FedexConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let credentials = Credentials {
        key: require("FEDEX_KEY")?,
        password: require("FEDEX_PASSWORD")?,
        account_number: require("FEDEX_ACCOUNT_NUMBER")?,
        meter: require("FEDEX_METER")?,
    };

    let mode = parse_mode(&or_default("FEDEX_MODE", "test"))?;
    let endpoint = lookup("FEDEX_ENDPOINT").unwrap_or_else(|_| mode.endpoint().to_string());
    let request_timeout_secs = parse_u64("FEDEX_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FEDEX_USER_AGENT", "fedex-locations/0.1");
    let reference_offset =
        parse_utc_offset(&or_default("FEDEX_REFERENCE_UTC_OFFSET_HOURS", "-6"))?;
    let debug = parse_flag("FEDEX_DEBUG", &or_default("FEDEX_DEBUG", "false"))?;
    let log_level = or_default("FEDEX_LOG_LEVEL", "info");

    Ok(FedexConfig {
        credentials,
        mode,
        endpoint,
        request_timeout_secs,
        user_agent,
        reference_offset,
        debug,
        log_level,
    })
}

fn parse_mode(s: &str) -> Result<Mode, ConfigError> {
    match s {
        "production" => Ok(Mode::Production),
        "test" => Ok(Mode::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEDEX_MODE".to_string(),
            reason: format!("expected 'production' or 'test', got '{other}'"),
        }),
    }
}

/// Parse a whole-hour UTC offset such as `-6` or `+9`.
fn parse_utc_offset(s: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "FEDEX_REFERENCE_UTC_OFFSET_HOURS".to_string(),
        reason,
    };

    let hours = s
        .trim()
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|e| invalid(e.to_string()))?;
    if !(-23..=23).contains(&hours) {
        return Err(invalid(format!("offset {hours} is outside -23..=23")));
    }
    FixedOffset::east_opt(hours * 3600).ok_or_else(|| invalid(format!("offset {hours} rejected")))
}

fn parse_flag(var: &str, s: &str) -> Result<bool, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}
