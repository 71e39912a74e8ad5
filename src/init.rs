use crate::context_handler::ContextHandler;
use crate::extractor::Extractor;
use crate::handler::Handler;
use crate::layer::HandlerLayer;
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the global `tracing` bridge.
///
/// **Fields**
/// - `extractors`: when non-empty, the handler is wrapped in a
///   [`ContextHandler`] running these extractors against
///   [`Context::current`](crate::context::Context::current).
#[derive(Clone, Default)]
pub struct LayerConfig {
    pub extractors: Vec<Arc<dyn Extractor>>,
}

/// Error returned when the global subscriber cannot be installed.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("global tracing subscriber already set: {0}")]
    AlreadySet(#[from] SetGlobalDefaultError),
}

/// Install a [`Registry`] combined with a [`HandlerLayer`] as the global
/// default subscriber, so all `tracing` events in the process reach
/// `handler`.
pub fn init_tracing_with_config(handler: Arc<dyn Handler>, config: LayerConfig) -> Result<(), InitError> {
    let handler: Arc<dyn Handler> = if config.extractors.is_empty() {
        handler
    } else {
        Arc::new(ContextHandler::new(handler, config.extractors))
    };

    let subscriber = Registry::default().with(HandlerLayer::new(handler));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Equivalent to [`init_tracing_with_config`] with [`LayerConfig::default`].
pub fn init_tracing(handler: Arc<dyn Handler>) -> Result<(), InitError> {
    init_tracing_with_config(handler, LayerConfig::default())
}
