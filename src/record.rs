use crate::attr::Attr;
use chrono::{DateTime, Utc};
use tracing::Level;

/// One structured log event.
///
/// Message, level and timestamp are fixed at construction. Attributes can
/// only be appended, so anything that forwards a record (such as
/// [`ContextHandler`](crate::context_handler::ContextHandler)) can enrich
/// it without rewriting what the call site produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    timestamp: DateTime<Utc>,
    level: Level,
    message: String,
    attrs: Vec<Attr>,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self::with_timestamp(Utc::now(), level, message)
    }

    pub fn with_timestamp(timestamp: DateTime<Utc>, level: Level, message: impl Into<String>) -> Self {
        Record {
            timestamp,
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attributes in the order they were added.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    /// Append attributes after the existing ones. Nothing is reordered or
    /// deduplicated.
    pub fn add_attrs<I>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.attrs.extend(attrs);
    }
}
