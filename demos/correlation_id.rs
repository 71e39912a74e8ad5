use std::sync::Arc;

use log_enricher::attr::Attr;
use log_enricher::attrs;
use log_enricher::config::{stdout_handler, HandlerConfig};
use log_enricher::context::Context;
use log_enricher::context_handler::ContextHandler;
use log_enricher::extractor::Extractor;
use log_enricher::logger::Logger;
use uuid::Uuid;

const CORRELATION_ID: &str = "correlation-id";

/// Reads the correlation id bound by the request entry point. Requests
/// that never got one simply log without it.
fn correlation_id_extractor(cx: &Context) -> Vec<Attr> {
    match cx.value::<Uuid>(CORRELATION_ID) {
        Some(id) => vec![Attr::new("correlation_id", id.to_string())],
        None => Vec::new(),
    }
}

fn handle_request(logger: &Logger, cx: &Context, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    logger.info(cx, "request received", attrs!["user" => user])?;
    logger
        .with_group("db")
        .info(cx, "query finished", attrs!["rows" => 3])?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // LOG_ENRICHER_FORMAT=json switches to one JSON object per line.
    let inner = stdout_handler(&HandlerConfig::from_env()?)?;
    let logger = Logger::new(Arc::new(ContextHandler {
        handler: inner,
        extractors: vec![Arc::new(correlation_id_extractor) as Arc<dyn Extractor>],
    }));

    logger.info(&Context::background(), "service starting", attrs![])?;

    for user in ["alice", "bob"] {
        let cx = Context::background().with_value(CORRELATION_ID, Uuid::new_v4());
        handle_request(&logger, &cx, user)?;
    }

    Ok(())
}
