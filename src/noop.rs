use crate::attr::Attr;
use crate::context::Context;
use crate::handler::{Handler, HandlerError};
use crate::record::Record;
use std::sync::Arc;
use tracing::Level;

/// A handler that is enabled for nothing and drops every record.
///
/// Useful for measuring the overhead of extraction without any output,
/// and for tests that don't care about what gets written.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl Handler for NoopHandler {
    fn enabled(&self, _cx: &Context, _level: Level) -> bool {
        false
    }

    fn handle(&self, _cx: &Context, _record: Record) -> Result<(), HandlerError> {
        Ok(())
    }

    fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(NoopHandler)
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(NoopHandler)
    }
}
