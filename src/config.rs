use crate::env::{env_or, LOG_ENRICHER_FORMAT_ENV, LOG_ENRICHER_LEVEL_ENV};
use crate::handler::{Handler, HandlerOptions};
use crate::text::TextHandler;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;

/// Output formats of the built-in handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Error type returned when reading or applying handler configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unknown log format {0:?}, expected \"text\" or \"json\"")]
    UnknownFormat(String),

    #[error("unknown log level {0:?}")]
    UnknownLevel(String),

    #[error("json feature is not enabled")]
    JsonFeatureDisabled,
}

/// Parse a format name, ignoring ASCII case and surrounding whitespace.
pub fn parse_format(s: &str) -> Result<Format, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        _ => Err(ConfigError::UnknownFormat(s.to_string())),
    }
}

/// Parse a level name such as `info` or `WARN`.
pub fn parse_level(s: &str) -> Result<Level, ConfigError> {
    Level::from_str(s.trim()).map_err(|_| ConfigError::UnknownLevel(s.to_string()))
}

/// Which built-in handler to build and how to configure it.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub format: Format,
    pub options: HandlerOptions,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            format: Format::Text,
            options: HandlerOptions::default(),
        }
    }
}

impl HandlerConfig {
    /// Read [`LOG_ENRICHER_FORMAT_ENV`] and [`LOG_ENRICHER_LEVEL_ENV`],
    /// defaulting to `text` and `info`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let format = parse_format(&env_or(LOG_ENRICHER_FORMAT_ENV, "text"))?;
        let level = parse_level(&env_or(LOG_ENRICHER_LEVEL_ENV, "info"))?;
        Ok(Self {
            format,
            options: HandlerOptions { level },
        })
    }
}

/// Build the handler described by `config`, writing to `writer`.
///
/// This is the main entry point for applications that select output
/// through configuration instead of constructing handlers by hand.
pub fn make_handler<W>(config: &HandlerConfig, writer: W) -> Result<Arc<dyn Handler>, ConfigError>
where
    W: Write + Send + 'static,
{
    match config.format {
        Format::Text => Ok(Arc::new(TextHandler::new(writer, config.options.clone()))),
        Format::Json => {
            #[cfg(feature = "json")]
            {
                use crate::json::JsonHandler;
                Ok(Arc::new(JsonHandler::new(writer, config.options.clone())))
            }

            #[cfg(not(feature = "json"))]
            {
                let _ = writer;
                Err(ConfigError::JsonFeatureDisabled)
            }
        }
    }
}

/// [`make_handler`] writing to standard output.
pub fn stdout_handler(config: &HandlerConfig) -> Result<Arc<dyn Handler>, ConfigError> {
    make_handler(config, std::io::stdout())
}
