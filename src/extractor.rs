use crate::attr::Attr;
use crate::context::Context;
use std::any::Any;
use std::fmt::Display;

/// Derives attributes from a [`Context`] for attachment to every record.
///
/// Extractors run once per emitted record, usually on a hot path. They
/// must not block and must not fail: when the context has nothing for
/// them, they return an empty list.
pub trait Extractor: Send + Sync {
    fn extract(&self, cx: &Context) -> Vec<Attr>;
}

impl<F> Extractor for F
where
    F: Fn(&Context) -> Vec<Attr> + Send + Sync,
{
    fn extract(&self, cx: &Context) -> Vec<Attr> {
        self(cx)
    }
}

/// Extractor that renders the context value bound to `ctx_key` as a string
/// attribute named `attr_key`.
///
/// Yields nothing when the key is unbound or bound to something other
/// than a `T`.
///
/// ```
/// use log_enricher::context::Context;
/// use log_enricher::extractor::{context_value, Extractor};
///
/// let extractor = context_value::<u64>("user-id", "user_id");
/// let cx = Context::background().with_value("user-id", 42u64);
///
/// assert_eq!(extractor.extract(&cx)[0].value.to_string(), "42");
/// assert!(extractor.extract(&Context::background()).is_empty());
/// ```
pub fn context_value<T>(ctx_key: &'static str, attr_key: &'static str) -> impl Extractor
where
    T: Any + Display,
{
    move |cx: &Context| match cx.value::<T>(ctx_key) {
        Some(value) => vec![Attr::new(attr_key, value.to_string())],
        None => Vec::new(),
    }
}
