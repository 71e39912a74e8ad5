use crate::attr::{Attr, Value};
use crate::context::Context;
use crate::handler::Handler;
use crate::record::Record;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns `tracing` events into
/// [`Record`]s and passes them to a [`Handler`].
///
/// The event's `message` field becomes the record message and every other
/// field becomes an attribute, in field order. The handler sees the
/// [`Context::current`] of the emitting task, so a
/// [`ContextHandler`](crate::context_handler::ContextHandler) can enrich
/// events logged inside [`Context::scope`].
#[derive(Clone)]
pub struct HandlerLayer {
    handler: Arc<dyn Handler>,
}

impl HandlerLayer {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }
}

impl<S> Layer<S> for HandlerLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: LayerContext<'_, S>) {
        let level = *event.metadata().level();
        let cx = Context::current();
        if !self.handler.enabled(&cx, level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut record = Record::new(level, visitor.message.unwrap_or_default());
        record.add_attrs(visitor.attrs);

        if let Err(e) = self.handler.handle(&cx, record) {
            eprintln!("log handler failed: {}", e);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    attrs: Vec<Attr>,
    message: Option<String>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `info!("...")` hands the message over as `fmt::Arguments`.
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, Value::String(format!("{:?}", value)));
        }
    }
}
