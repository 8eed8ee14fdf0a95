use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub(crate) const DEFAULT_RESEARCH_SOURCES: [&str; 3] = [
    "https://en.wikipedia.org/wiki/Mobile_app",
    "https://en.wikipedia.org/wiki/E-commerce",
    "https://en.wikipedia.org/wiki/Rural_development",
];

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
            },
        }
    };

    let env = parse_environment(&or_default("STARTIFY_ENV", "development"))?;
    let log_level = or_default("STARTIFY_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("STARTIFY_OUTPUT_DIR", "outputs"));

    let use_llm = parse_bool("STARTIFY_USE_LLM", false)?;
    let openrouter_api_key = optional("OPENROUTER_API_KEY");
    let openrouter_model = or_default("OPENROUTER_MODEL", "openai/gpt-oss-120b:free");
    let openrouter_base_url = or_default(
        "OPENROUTER_BASE_URL",
        "https://openrouter.ai/api/v1/chat/completions",
    );
    let llm_timeout_secs = parse_u64("STARTIFY_LLM_TIMEOUT_SECS", "60")?;

    let research_sources = match optional("STARTIFY_RESEARCH_SOURCES") {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_RESEARCH_SOURCES
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    };

    Ok(AppConfig {
        database_url: optional("DATABASE_URL"),
        env,
        log_level,
        output_dir,
        use_llm,
        openrouter_api_key,
        openrouter_model,
        openrouter_base_url,
        llm_timeout_secs,
        annotator_url: optional("STARTIFY_ANNOTATOR_URL"),
        trends_url: optional("STARTIFY_TRENDS_URL"),
        research_sources,
        http_timeout_secs: parse_u64("STARTIFY_HTTP_TIMEOUT_SECS", "10")?,
        user_agent: or_default("STARTIFY_USER_AGENT", DEFAULT_USER_AGENT),
        cache_ttl_secs: parse_u64("STARTIFY_CACHE_TTL_SECS", "86400")?,
        worker_count: parse_positive_usize("STARTIFY_WORKERS", "4")?,
        queue_capacity: parse_positive_usize("STARTIFY_QUEUE_CAPACITY", "64")?,
        investors_path: optional("STARTIFY_INVESTORS_PATH").map(PathBuf::from),
        db_max_connections: parse_u32("STARTIFY_DB_MAX_CONNECTIONS", "10")?,
        db_min_connections: parse_u32("STARTIFY_DB_MIN_CONNECTIONS", "1")?,
        db_acquire_timeout_secs: parse_u64("STARTIFY_DB_ACQUIRE_TIMEOUT_SECS", "10")?,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STARTIFY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
