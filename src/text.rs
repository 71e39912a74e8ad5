use crate::attr::{Attr, Value};
use crate::context::Context;
use crate::handler::{Handler, HandlerError, HandlerOptions};
use crate::record::Record;
use chrono::SecondsFormat;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing::Level;

/// Handler that writes one `key=value` line per record.
///
/// Lines start with `time`, `level` and `msg`, followed by attributes
/// bound through [`Handler::with_attrs`] and then the record's own
/// attributes. Open groups prefix keys as `group.key`.
pub struct TextHandler<W> {
    writer: Arc<Mutex<W>>,
    options: HandlerOptions,
    prefix: String,
    preformatted: String,
}

impl<W: Write + Send + 'static> TextHandler<W> {
    pub fn new(writer: W, options: HandlerOptions) -> Self {
        TextHandler {
            writer: Arc::new(Mutex::new(writer)),
            options,
            prefix: String::new(),
            preformatted: String::new(),
        }
    }
}

impl<W> Clone for TextHandler<W> {
    fn clone(&self) -> Self {
        TextHandler {
            writer: Arc::clone(&self.writer),
            options: self.options.clone(),
            prefix: self.prefix.clone(),
            preformatted: self.preformatted.clone(),
        }
    }
}

impl<W: Write + Send + 'static> Handler for TextHandler<W> {
    fn enabled(&self, _cx: &Context, level: Level) -> bool {
        self.options.enabled(level)
    }

    fn handle(&self, _cx: &Context, record: Record) -> Result<(), HandlerError> {
        let mut line = format!(
            "time={} level={} msg=",
            record.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
            record.level(),
        );
        push_str_value(&mut line, record.message());
        line.push_str(&self.preformatted);
        for attr in record.attrs() {
            push_attr(&mut line, &self.prefix, attr);
        }
        line.push('\n');

        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut child = self.clone();
        for attr in &attrs {
            push_attr(&mut child.preformatted, &self.prefix, attr);
        }
        Arc::new(child)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut child = self.clone();
        if !name.is_empty() {
            child.prefix.push_str(name);
            child.prefix.push('.');
        }
        Arc::new(child)
    }
}

fn push_attr(buf: &mut String, prefix: &str, attr: &Attr) {
    match &attr.value {
        Value::Group(children) => {
            let nested = format!("{}{}.", prefix, attr.key);
            for child in children {
                push_attr(buf, &nested, child);
            }
        }
        Value::String(s) => {
            push_key(buf, prefix, &attr.key);
            push_str_value(buf, s);
        }
        other => {
            push_key(buf, prefix, &attr.key);
            buf.push_str(&other.to_string());
        }
    }
}

fn push_key(buf: &mut String, prefix: &str, key: &str) {
    buf.push(' ');
    let qualified = format!("{}{}", prefix, key);
    push_str_value(buf, &qualified);
    buf.push('=');
}

fn push_str_value(buf: &mut String, s: &str) {
    if needs_quoting(s) {
        buf.push_str(&format!("{:?}", s));
    } else {
        buf.push_str(s);
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::SharedBuffer;
    use chrono::{TimeZone, Utc};

    fn record(message: &str) -> Record {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Record::with_timestamp(ts, Level::INFO, message)
    }

    #[test]
    fn writes_header_and_attrs() {
        let buf = SharedBuffer::default();
        let handler = TextHandler::new(buf.clone(), HandlerOptions::default());

        let mut rec = record("request started");
        rec.add_attrs(vec![Attr::new("path", "/users"), Attr::new("attempt", 2)]);
        handler.handle(&Context::background(), rec).unwrap();

        assert_eq!(
            buf.contents(),
            "time=2024-05-01T12:00:00.000Z level=INFO msg=\"request started\" path=/users attempt=2\n"
        );
    }

    #[test]
    fn groups_qualify_bound_and_record_attrs() {
        let buf = SharedBuffer::default();
        let handler = TextHandler::new(buf.clone(), HandlerOptions::default())
            .with_attrs(vec![Attr::new("service", "api")])
            .with_group("http")
            .with_attrs(vec![Attr::new("method", "GET")]);

        let mut rec = record("done");
        rec.add_attr(Attr::group("resp", vec![Attr::new("status", 200)]));
        handler.handle(&Context::background(), rec).unwrap();

        assert!(buf
            .contents()
            .ends_with("msg=done service=api http.method=GET http.resp.status=200\n"));
    }

    #[test]
    fn quotes_values_that_need_it() {
        assert!(needs_quoting(""));
        assert!(needs_quoting("a b"));
        assert!(needs_quoting("k=v"));
        assert!(!needs_quoting("abc-123"));
    }

    #[test]
    fn quotes_keys_that_need_it() {
        let buf = SharedBuffer::default();
        let handler = TextHandler::new(buf.clone(), HandlerOptions::default()).with_group("http req");

        let mut rec = record("x");
        rec.add_attrs(vec![Attr::new("a=b", 1), Attr::new("plain", 2)]);
        handler.handle(&Context::background(), rec).unwrap();

        assert!(buf
            .contents()
            .ends_with("msg=x \"http req.a=b\"=1 \"http req.plain\"=2\n"));
    }

    #[test]
    fn filters_by_level() {
        let handler = TextHandler::new(SharedBuffer::default(), HandlerOptions { level: Level::WARN });
        assert!(!handler.enabled(&Context::background(), Level::INFO));
        assert!(handler.enabled(&Context::background(), Level::ERROR));
    }
}
