use crate::attr::Attr;
use crate::context::Context;
use crate::extractor::Extractor;
use crate::handler::{Handler, HandlerError};
use crate::record::Record;
use std::fmt;
use std::sync::Arc;
use tracing::Level;

/// Handler decorator that enriches every record with attributes extracted
/// from the [`Context`] passed to [`Handler::handle`].
///
/// Extractors run in registration order and their attributes are appended
/// after the record's own, so on key collision the wrapped handler's
/// formatting decides which one shows. Level checks and scoping are left
/// to the wrapped handler; derived children keep the same extractors.
///
/// **Usage**
///
/// ```
/// use log_enricher::context::Context;
/// use log_enricher::context_handler::ContextHandler;
/// use log_enricher::extractor::context_value;
/// use log_enricher::handler::HandlerOptions;
/// use log_enricher::logger::Logger;
/// use log_enricher::text::TextHandler;
/// use std::sync::Arc;
///
/// let handler = ContextHandler {
///     handler: Arc::new(TextHandler::new(std::io::stdout(), HandlerOptions::default())),
///     extractors: vec![Arc::new(context_value::<String>("correlation-id", "correlation_id"))],
/// };
/// let logger = Logger::new(Arc::new(handler));
///
/// let cx = Context::background().with_value("correlation-id", "abc-123".to_string());
/// logger.info(&cx, "started", vec![]).unwrap();
/// ```
#[derive(Clone)]
pub struct ContextHandler {
    pub handler: Arc<dyn Handler>,
    pub extractors: Vec<Arc<dyn Extractor>>,
}

impl ContextHandler {
    pub fn new(handler: Arc<dyn Handler>, extractors: Vec<Arc<dyn Extractor>>) -> Self {
        ContextHandler { handler, extractors }
    }
}

impl Handler for ContextHandler {
    fn enabled(&self, cx: &Context, level: Level) -> bool {
        self.handler.enabled(cx, level)
    }

    fn handle(&self, cx: &Context, mut record: Record) -> Result<(), HandlerError> {
        for extractor in &self.extractors {
            record.add_attrs(extractor.extract(cx));
        }
        self.handler.handle(cx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(ContextHandler {
            handler: self.handler.with_attrs(attrs),
            extractors: self.extractors.clone(),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(ContextHandler {
            handler: self.handler.with_group(name),
            extractors: self.extractors.clone(),
        })
    }
}

impl fmt::Debug for ContextHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandler")
            .field("extractors", &self.extractors.len())
            .finish_non_exhaustive()
    }
}
