use crate::attr::Attr;
use crate::context::Context;
use crate::record::Record;
use std::sync::Arc;
use tracing::Level;

/// Error returned by a [`Handler`] when a record could not be emitted.
#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    #[error("failed to write log record: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("failed to encode log record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Capability set of a structured log handler.
///
/// A handler decides which levels it emits, formats and writes records,
/// and can derive scoped children carrying pre-bound attributes or a
/// naming group. Implementations must be safe to call from many threads
/// at once.
pub trait Handler: Send + Sync {
    /// Report whether records at `level` would be emitted.
    ///
    /// Called before a record is built, so callers can skip the work of
    /// building one for a disabled level.
    fn enabled(&self, cx: &Context, level: Level) -> bool;

    /// Emit a single record.
    ///
    /// **Returns**
    /// - `Ok(())` once the record has been handed to the output.
    /// - `Err(..)` if formatting or writing failed.
    fn handle(&self, cx: &Context, record: Record) -> Result<(), HandlerError>;

    /// Derive a handler whose records also carry `attrs`, qualified by any
    /// groups already opened on this handler.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// Derive a handler that nests every later attribute under `name`.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn enabled(&self, cx: &Context, level: Level) -> bool {
        (**self).enabled(cx, level)
    }

    fn handle(&self, cx: &Context, record: Record) -> Result<(), HandlerError> {
        (**self).handle(cx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        (**self).with_attrs(attrs)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        (**self).with_group(name)
    }
}

/// Options shared by the built-in handlers.
#[derive(Clone, Debug)]
pub struct HandlerOptions {
    /// Least severe level that is emitted.
    pub level: Level,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl HandlerOptions {
    /// `tracing` orders levels from most to least severe, so a level is
    /// enabled when it compares less than or equal to the threshold.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_includes_more_severe_levels() {
        let options = HandlerOptions { level: Level::WARN };
        assert!(options.enabled(Level::ERROR));
        assert!(options.enabled(Level::WARN));
        assert!(!options.enabled(Level::INFO));
        assert!(!options.enabled(Level::TRACE));
    }
}
