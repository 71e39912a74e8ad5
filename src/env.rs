//! Names of the environment variables read by
//! [`HandlerConfig::from_env`](crate::config::HandlerConfig::from_env).

/// Selects the built-in handler: `text` or `json`.
pub const LOG_ENRICHER_FORMAT_ENV: &str = "LOG_ENRICHER_FORMAT";

/// Least severe level the built-in handler emits, e.g. `info` or `debug`.
pub const LOG_ENRICHER_LEVEL_ENV: &str = "LOG_ENRICHER_LEVEL";

/// Value of `key`, or `default` when it is unset or not valid unicode.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
