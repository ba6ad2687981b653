//! Line-delimited JSON output.

use lazispace_types::{Field, LogError, Result, Severity, WriteStage};
use serde::ser::Error as _;
use serde_json::{Map, Value};
use std::io::Write;

use crate::emitter::Emitter;
use crate::hooks::Hooks;
use crate::sink::Sink;
use crate::time;

const TIME_KEY: &str = "time";
const LEVEL_KEY: &str = "level";
const MSG_KEY: &str = "msg";

/// Written in place of an entry that could not be encoded.
pub const MARSHAL_FALLBACK_LINE: &[u8] = b"{\"error\":\"failed to marshal log entry\"}\n";

/// Emitter writing one JSON object per line.
///
/// Each object carries `time` (RFC 3339), `level` (lowercase name) and
/// `msg`, plus one top-level key per field. A field reusing one of the
/// reserved keys replaces it, and of two fields with the same key the later
/// one wins.
#[derive(Debug)]
pub struct JsonEmitter {
    min: Severity,
    sink: Sink,
    hooks: Hooks,
}

impl JsonEmitter {
    /// Create a JSON emitter writing entries at or above `min` to `writer`.
    pub fn new(min: Severity, writer: impl Write + Send + 'static) -> Self {
        Self::with_sink(min, Sink::new(writer), Hooks::default())
    }

    /// Create a JSON emitter from an existing sink and hooks.
    pub fn with_sink(min: Severity, sink: Sink, hooks: Hooks) -> Self {
        Self { min, sink, hooks }
    }

    /// Replace the terminator and fallback channel.
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Minimum severity written by this emitter.
    pub fn min_severity(&self) -> Severity {
        self.min
    }

    fn log(&self, severity: Severity, msg: &str, fields: &[Field]) {
        if !self.min.enables(severity) {
            return;
        }
        let result = match encode(severity, msg, fields) {
            Ok(data) => self.write_line(&data),
            Err(_) => self.write_marshal_fallback(),
        };
        if let Err(err) = result {
            self.hooks.fallback.report(&err);
        }
    }

    fn write_line(&self, data: &[u8]) -> Result<()> {
        let mut out = self.sink.lock();
        out.write_all(data).map_err(|source| LogError::SinkWrite {
            stage: WriteStage::JsonData,
            source,
        })?;
        out.write_all(b"\n").map_err(|source| LogError::SinkWrite {
            stage: WriteStage::Newline,
            source,
        })
    }

    fn write_marshal_fallback(&self) -> Result<()> {
        self.sink
            .lock()
            .write_all(MARSHAL_FALLBACK_LINE)
            .map_err(|io_err| LogError::Marshal(serde_json::Error::custom(io_err)))
    }
}

/// Encode one entry as a JSON object without the trailing newline.
pub fn encode(severity: Severity, msg: &str, fields: &[Field]) -> Result<Vec<u8>> {
    let mut entry = Map::new();
    entry.insert(TIME_KEY.to_string(), Value::from(time::rfc3339(&time::now())));
    entry.insert(LEVEL_KEY.to_string(), Value::from(severity.name()));
    entry.insert(MSG_KEY.to_string(), Value::from(msg));

    for field in fields {
        let value = field.value.to_json().map_err(LogError::Marshal)?;
        entry.insert(field.key.clone(), value);
    }

    serde_json::to_vec(&entry).map_err(LogError::Marshal)
}

impl Emitter for JsonEmitter {
    fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Debug, msg, fields);
    }

    fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Info, msg, fields);
    }

    fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Warn, msg, fields);
    }

    fn error(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Error, msg, fields);
    }

    fn fatal(&self, msg: &str, fields: &[Field]) {
        self.log(Severity::Fatal, msg, fields);
        self.hooks.terminator.terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{fallback_line, Fallback, Terminator};
    use crate::sink::MemorySink;
    use lazispace_types::{fields, FieldValue};
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn parse_line(line: &str) -> Map<String, Value> {
        match serde_json::from_str(line).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn reporting_hooks() -> (Hooks, Arc<Mutex<Vec<String>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let log = reports.clone();
        let hooks = Hooks::default()
            .with_terminator(Terminator::new(|_| {}))
            .with_fallback(Fallback::new(move |err| log.lock().push(fallback_line(err))));
        (hooks, reports)
    }

    #[test]
    fn test_reserved_keys_and_levels() {
        for severity in [
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
        ] {
            let sink = MemorySink::new();
            let emitter = JsonEmitter::new(Severity::Debug, sink.clone());
            crate::emitter::emit(&emitter, severity, "message", &[]);

            let lines = sink.lines();
            assert_eq!(lines.len(), 1);
            let entry = parse_line(&lines[0]);
            assert_eq!(entry["level"], severity.name());
            assert_eq!(entry["msg"], "message");
            let stamp = entry["time"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        }
    }

    #[test]
    fn test_below_minimum_is_silent() {
        let sink = MemorySink::new();
        let emitter = JsonEmitter::new(Severity::Warn, sink.clone());
        emitter.debug("a", &[]);
        emitter.info("b", &[]);
        assert!(sink.is_empty());
        emitter.warn("c", &[]);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_filtering_by_minimum() {
        let levels = [
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
        ];
        for min in levels {
            for level in levels {
                let sink = MemorySink::new();
                let emitter = JsonEmitter::new(min, sink.clone());
                crate::emitter::emit(&emitter, level, "message", &[]);

                let should_log = level >= min;
                assert_eq!(!sink.is_empty(), should_log, "min {min} level {level}");
                if should_log {
                    assert_eq!(parse_line(&sink.lines()[0])["level"], level.name());
                }
            }
        }
    }

    #[test]
    fn test_fields_become_top_level_keys() {
        let sink = MemorySink::new();
        let emitter = JsonEmitter::new(Severity::Info, sink.clone());

        emitter.info(
            "connected",
            &fields!["peer" => "alpha", "attempts" => 3, "tags" => vec!["a", "b"]],
        );

        let entry = parse_line(&sink.lines()[0]);
        assert_eq!(entry["peer"], "alpha");
        assert_eq!(entry["attempts"], 3);
        assert_eq!(entry["tags"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_field_overrides_reserved_key() {
        let sink = MemorySink::new();
        let emitter = JsonEmitter::new(Severity::Info, sink.clone());

        emitter.info("original", &fields!["msg" => "replaced", "k" => 1, "k" => 2]);

        let entry = parse_line(&sink.lines()[0]);
        assert_eq!(entry["msg"], "replaced");
        assert_eq!(entry["k"], 2);
    }

    #[test]
    fn test_unencodable_field_writes_fallback_line() {
        let sink = MemorySink::new();
        let (hooks, reports) = reporting_hooks();
        let emitter = JsonEmitter::new(Severity::Info, sink.clone()).with_hooks(hooks);

        emitter.error("bad", &fields!["ratio" => f64::NAN]);

        assert_eq!(
            sink.contents(),
            "{\"error\":\"failed to marshal log entry\"}\n"
        );
        assert!(reports.lock().is_empty());
    }

    #[test]
    fn test_fallback_line_write_failure_is_reported() {
        let (hooks, reports) = reporting_hooks();
        let emitter = JsonEmitter::new(Severity::Info, Broken).with_hooks(hooks);

        emitter.info("bad", &fields!["ratio" => f64::INFINITY]);

        assert_eq!(
            reports.lock().as_slice(),
            ["logger: failed to marshal log entry\n"]
        );
    }

    #[test]
    fn test_data_write_failure_is_reported() {
        let (hooks, reports) = reporting_hooks();
        let emitter = JsonEmitter::new(Severity::Info, Broken).with_hooks(hooks);

        emitter.info("lost", &[]);

        assert_eq!(
            reports.lock().as_slice(),
            ["logger: failed to write log data\n"]
        );
    }

    #[test]
    fn test_fatal_always_written_then_terminates() {
        let exits = Arc::new(AtomicUsize::new(0));
        let counter = exits.clone();
        let hooks = Hooks::default().with_terminator(Terminator::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let sink = MemorySink::new();
        let emitter = JsonEmitter::new(Severity::Error, sink.clone()).with_hooks(hooks);

        emitter.fatal("boom", &[]);

        let entry = parse_line(&sink.lines()[0]);
        assert_eq!(entry["level"], "fatal");
        assert_eq!(exits.load(Ordering::SeqCst), 1);
    }

    fn scalar() -> impl Strategy<Value = FieldValue> {
        prop_oneof![
            any::<bool>().prop_map(FieldValue::Bool),
            any::<i64>().prop_map(FieldValue::Int),
            any::<u64>().prop_map(FieldValue::Uint),
            "[a-zA-Z0-9 _.-]{0,16}".prop_map(FieldValue::Str),
        ]
    }

    proptest! {
        #[test]
        fn prop_every_field_decodes_as_top_level_key(
            entries in proptest::collection::btree_map("f_[a-z]{1,8}", scalar(), 0..8)
        ) {
            let sink = MemorySink::new();
            let emitter = JsonEmitter::new(Severity::Debug, sink.clone());
            let fields: Vec<Field> = entries
                .iter()
                .map(|(k, v)| Field::new(k.as_str(), v.clone()))
                .collect();

            emitter.debug("prop", &fields);

            let entry = parse_line(&sink.lines()[0]);
            for (key, value) in &entries {
                prop_assert_eq!(&entry[key.as_str()], &value.to_json().unwrap());
            }
        }
    }
}
