//! Human-readable text output.
//!
//! One line per entry:
//!
//! ```text
//! [14:03:27.512] INFO: connected | peer=alpha attempts=3
//! ```
//!
//! The ` |` separator appears only when the call carries fields.

use lazispace_types::{Field, LogError, Result, Severity, WriteStage};
use std::io::{self, Write};

use crate::emitter::Emitter;
use crate::hooks::Hooks;
use crate::sink::Sink;
use crate::time;

const FIELD_SEPARATOR: &str = " |";

/// Emitter writing `[HH:MM:SS.mmm] LEVEL: message | key=value` lines.
#[derive(Debug)]
pub struct TextEmitter {
    min: Severity,
    sink: Sink,
    hooks: Hooks,
}

impl TextEmitter {
    /// Create a text emitter writing entries at or above `min` to `writer`.
    pub fn new(min: Severity, writer: impl Write + Send + 'static) -> Self {
        Self::with_sink(min, Sink::new(writer), Hooks::default())
    }

    /// Create a text emitter from an existing sink and hooks.
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
        if let Err(err) = self.write_entry(severity, msg, fields) {
            self.hooks.fallback.report(&err);
        }
    }

    fn write_entry(&self, severity: Severity, msg: &str, fields: &[Field]) -> Result<()> {
        let timestamp = time::clock(&time::now());
        let mut out = self.sink.lock();

        write!(out, "[{}] {}: {}", timestamp, severity.display_name(), msg)
            .map_err(failed(WriteStage::TextPrefix))?;

        if !fields.is_empty() {
            out.write_all(FIELD_SEPARATOR.as_bytes())
                .map_err(failed(WriteStage::TextSeparator))?;
            for field in fields {
                write!(out, " {}={}", field.key, field.value)
                    .map_err(failed(WriteStage::TextField))?;
            }
        }

        out.write_all(b"\n").map_err(failed(WriteStage::Newline))
    }
}

fn failed(stage: WriteStage) -> impl FnOnce(io::Error) -> LogError {
    move |source| LogError::SinkWrite { stage, source }
}

impl Emitter for TextEmitter {
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
