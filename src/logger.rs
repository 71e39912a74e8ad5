use crate::attr::Attr;
use crate::context::Context;
use crate::handler::{Handler, HandlerError};
use crate::record::Record;
use std::sync::Arc;
use tracing::Level;

/// Front end that builds [`Record`]s and hands them to a [`Handler`].
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Logger { handler }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Logger whose records always carry `attrs`.
    pub fn with(&self, attrs: Vec<Attr>) -> Logger {
        if attrs.is_empty() {
            return self.clone();
        }
        Logger::new(self.handler.with_attrs(attrs))
    }

    /// Logger that nests every later attribute under `name`.
    pub fn with_group(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        Logger::new(self.handler.with_group(name))
    }

    pub fn enabled(&self, cx: &Context, level: Level) -> bool {
        self.handler.enabled(cx, level)
    }

    /// Emit a record unless `level` is disabled.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was skipped or handled.
    /// - `Err(..)` exactly as returned by the handler.
    pub fn log(&self, cx: &Context, level: Level, message: impl Into<String>, attrs: Vec<Attr>) -> Result<(), HandlerError> {
        if !self.handler.enabled(cx, level) {
            return Ok(());
        }
        let mut record = Record::new(level, message);
        record.add_attrs(attrs);
        self.handler.handle(cx, record)
    }

    pub fn debug(&self, cx: &Context, message: impl Into<String>, attrs: Vec<Attr>) -> Result<(), HandlerError> {
        self.log(cx, Level::DEBUG, message, attrs)
    }

    pub fn info(&self, cx: &Context, message: impl Into<String>, attrs: Vec<Attr>) -> Result<(), HandlerError> {
        self.log(cx, Level::INFO, message, attrs)
    }

    pub fn warn(&self, cx: &Context, message: impl Into<String>, attrs: Vec<Attr>) -> Result<(), HandlerError> {
        self.log(cx, Level::WARN, message, attrs)
    }

    pub fn error(&self, cx: &Context, message: impl Into<String>, attrs: Vec<Attr>) -> Result<(), HandlerError> {
        self.log(cx, Level::ERROR, message, attrs)
    }
}
