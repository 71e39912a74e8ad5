#![allow(dead_code)]

use log_enricher::attr::Attr;
use log_enricher::context::Context;
use log_enricher::handler::{Handler, HandlerError};
use log_enricher::record::Record;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::Level;

/// What a [`CaptureHandler`] saw for one `handle` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Captured {
    pub groups: Vec<String>,
    pub bound: Vec<Attr>,
    pub record: Record,
}

/// Handler that keeps every record it receives, together with the groups
/// and pre-bound attributes of the (possibly derived) handler that got it.
#[derive(Clone)]
pub struct CaptureHandler {
    pub threshold: Level,
    groups: Vec<String>,
    bound: Vec<Attr>,
    out: Arc<Mutex<Vec<Captured>>>,
}

impl Default for CaptureHandler {
    fn default() -> Self {
        Self {
            threshold: Level::INFO,
            groups: Vec::new(),
            bound: Vec::new(),
            out: Arc::default(),
        }
    }
}

impl CaptureHandler {
    pub fn with_threshold(threshold: Level) -> Self {
        Self { threshold, ..Self::default() }
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.out.lock().clone()
    }

    pub fn records(&self) -> Vec<Record> {
        self.out.lock().iter().map(|c| c.record.clone()).collect()
    }
}

impl Handler for CaptureHandler {
    fn enabled(&self, _cx: &Context, level: Level) -> bool {
        level <= self.threshold
    }

    fn handle(&self, _cx: &Context, record: Record) -> Result<(), HandlerError> {
        self.out.lock().push(Captured {
            groups: self.groups.clone(),
            bound: self.bound.clone(),
            record,
        });
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut child = self.clone();
        child.bound.extend(attrs);
        Arc::new(child)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut child = self.clone();
        child.groups.push(name.to_string());
        Arc::new(child)
    }
}

/// Handler whose output always fails.
#[derive(Clone, Default)]
pub struct FailingHandler;

impl Handler for FailingHandler {
    fn enabled(&self, _cx: &Context, _level: Level) -> bool {
        true
    }

    fn handle(&self, _cx: &Context, _record: Record) -> Result<(), HandlerError> {
        Err(HandlerError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed")))
    }

    fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(FailingHandler)
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(FailingHandler)
    }
}

pub fn attr_pairs(record: &Record) -> Vec<(String, String)> {
    record
        .attrs()
        .iter()
        .map(|a| (a.key.clone(), a.value.to_string()))
        .collect()
}

/// In-memory writer whose clones share one buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock()).lines().map(str::to_string).collect()
    }
}

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
