use crate::attr::Attr;
use crate::context::Context;
use crate::handler::{Handler, HandlerError, HandlerOptions};
use crate::record::Record;
use chrono::SecondsFormat;
use parking_lot::Mutex;
use serde_json::{Map, Value as JsonValue};
use std::io::Write;
use std::sync::Arc;
use tracing::Level;

/// Handler that writes one JSON object per line.
///
/// Every object starts with `time`, `level` and `msg`. Groups opened with
/// [`Handler::with_group`] become nested objects, and a group that ends up
/// without attributes is left out. Later duplicate keys overwrite earlier
/// ones in place. That includes a group opened under the key of an
/// attribute bound before it: once the group receives attributes, its
/// object replaces the bound value.
pub struct JsonHandler<W> {
    writer: Arc<Mutex<W>>,
    options: HandlerOptions,
    groups: Vec<String>,
    /// Pre-bound attributes with the number of groups open when they were bound.
    bound: Vec<(usize, Attr)>,
}

impl<W: Write + Send + 'static> JsonHandler<W> {
    pub fn new(writer: W, options: HandlerOptions) -> Self {
        JsonHandler {
            writer: Arc::new(Mutex::new(writer)),
            options,
            groups: Vec::new(),
            bound: Vec::new(),
        }
    }

    fn encode(&self, record: &Record) -> Result<JsonValue, HandlerError> {
        let mut root = Map::new();
        root.insert(
            "time".to_string(),
            JsonValue::String(record.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        root.insert("level".to_string(), JsonValue::String(record.level().to_string()));
        root.insert("msg".to_string(), JsonValue::String(record.message().to_string()));

        for (depth, attr) in &self.bound {
            insert_attr(nested_mut(&mut root, &self.groups[..*depth]), attr)?;
        }
        if record.num_attrs() > 0 {
            let target = nested_mut(&mut root, &self.groups);
            for attr in record.attrs() {
                insert_attr(target, attr)?;
            }
        }
        Ok(JsonValue::Object(root))
    }
}

impl<W> Clone for JsonHandler<W> {
    fn clone(&self) -> Self {
        JsonHandler {
            writer: Arc::clone(&self.writer),
            options: self.options.clone(),
            groups: self.groups.clone(),
            bound: self.bound.clone(),
        }
    }
}

impl<W: Write + Send + 'static> Handler for JsonHandler<W> {
    fn enabled(&self, _cx: &Context, level: Level) -> bool {
        self.options.enabled(level)
    }

    fn handle(&self, _cx: &Context, record: Record) -> Result<(), HandlerError> {
        let mut line = serde_json::to_vec(&self.encode(&record)?)?;
        line.push(b'\n');

        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut child = self.clone();
        let depth = child.groups.len();
        child.bound.extend(attrs.into_iter().map(|attr| (depth, attr)));
        Arc::new(child)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut child = self.clone();
        if !name.is_empty() {
            child.groups.push(name.to_string());
        }
        Arc::new(child)
    }
}

fn insert_attr(target: &mut Map<String, JsonValue>, attr: &Attr) -> Result<(), HandlerError> {
    target.insert(attr.key.clone(), serde_json::to_value(&attr.value)?);
    Ok(())
}

/// Walk `path`, creating objects as needed. A non-object value sitting on
/// the path is replaced, matching the last-write-wins key policy.
fn nested_mut<'a>(mut map: &'a mut Map<String, JsonValue>, path: &[String]) -> &'a mut Map<String, JsonValue> {
    for name in path {
        let slot = map
            .entry(name.clone())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        if !slot.is_object() {
            *slot = JsonValue::Object(Map::new());
        }
        map = match slot {
            JsonValue::Object(inner) => inner,
            _ => unreachable!("group slot is always an object"),
        };
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::SharedBuffer;
    use serde_json::json;

    fn emit(handler: &dyn Handler, record: Record, buf: &SharedBuffer) -> JsonValue {
        handler.handle(&Context::background(), record).unwrap();
        let contents = buf.contents();
        serde_json::from_str(contents.lines().last().unwrap()).unwrap()
    }

    #[test]
    fn nests_groups_and_keeps_order() {
        let buf = SharedBuffer::default();
        let handler = JsonHandler::new(buf.clone(), HandlerOptions::default())
            .with_attrs(vec![Attr::new("service", "api")])
            .with_group("req")
            .with_attrs(vec![Attr::new("method", "GET")]);

        let mut record = Record::new(Level::WARN, "slow");
        record.add_attr(Attr::new("elapsed_ms", 1200u64));
        let out = emit(handler.as_ref(), record, &buf);

        assert_eq!(out["level"], "WARN");
        assert_eq!(out["msg"], "slow");
        assert_eq!(out["service"], "api");
        assert_eq!(out["req"], json!({"method": "GET", "elapsed_ms": 1200}));

        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["time", "level", "msg", "service", "req"]);
    }

    #[test]
    fn omits_empty_groups() {
        let buf = SharedBuffer::default();
        let handler = JsonHandler::new(buf.clone(), HandlerOptions::default()).with_group("empty");

        let out = emit(handler.as_ref(), Record::new(Level::INFO, "hi"), &buf);
        assert!(out.get("empty").is_none());
    }

    #[test]
    fn last_duplicate_key_wins() {
        let buf = SharedBuffer::default();
        let handler = JsonHandler::new(buf.clone(), HandlerOptions::default());

        let mut record = Record::new(Level::INFO, "dup");
        record.add_attrs(vec![Attr::new("a", "1"), Attr::new("a", "2")]);
        let out = emit(&handler, record, &buf);

        assert_eq!(out["a"], "2");
    }

    #[test]
    fn later_group_replaces_bound_value_with_same_key() {
        let buf = SharedBuffer::default();
        let handler = JsonHandler::new(buf.clone(), HandlerOptions::default())
            .with_attrs(vec![Attr::new("req", "r-1")])
            .with_group("req");

        let out = emit(handler.as_ref(), Record::new(Level::INFO, "bare"), &buf);
        assert_eq!(out["req"], "r-1");

        let mut record = Record::new(Level::INFO, "x");
        record.add_attr(Attr::new("status", 200));
        let out = emit(handler.as_ref(), record, &buf);
        assert_eq!(out["req"], json!({"status": 200}));
    }

    #[test]
    fn group_values_become_objects() {
        let buf = SharedBuffer::default();
        let handler = JsonHandler::new(buf.clone(), HandlerOptions::default());

        let mut record = Record::new(Level::INFO, "grouped");
        record.add_attr(Attr::group("user", vec![Attr::new("id", 7), Attr::new("admin", false)]));
        let out = emit(&handler, record, &buf);

        assert_eq!(out["user"], json!({"id": 7, "admin": false}));
    }
}
