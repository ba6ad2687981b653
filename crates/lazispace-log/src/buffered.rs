//! In-memory emitter used before the real configuration is known.
//!
//! Entries are held until [`BufferedEmitter::replay_to`] re-emits them to a
//! real emitter. Replayed entries carry two extra leading fields,
//! `bootstrap=true` and `timestamp=<RFC 3339 creation time>`, so they can be
//! told apart from entries written after the upgrade.

use chrono::{DateTime, Local};
use lazispace_types::{Field, Severity};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use crate::emitter::{self, Emitter, SharedEmitter};
use crate::time;

/// Field marking an entry as replayed from the bootstrap buffer.
pub const BOOTSTRAP_FIELD: &str = "bootstrap";

/// Field carrying the original creation time of a replayed entry.
pub const TIMESTAMP_FIELD: &str = "timestamp";

const INITIAL_CAPACITY: usize = 20;

/// One buffered call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// When the call was made
    pub timestamp: DateTime<Local>,
    /// Severity of the call
    pub severity: Severity,
    /// Message text
    pub message: String,
    /// Fields in call order
    pub fields: Vec<Field>,
}

impl LogEntry {
    fn replay_fields(&self) -> Vec<Field> {
        let mut fields = Vec::with_capacity(self.fields.len() + 2);
        fields.push(Field::new(BOOTSTRAP_FIELD, true));
        fields.push(Field::new(TIMESTAMP_FIELD, time::rfc3339(&self.timestamp)));
        fields.extend(self.fields.iter().cloned());
        fields
    }
}

#[derive(Default)]
struct BufferState {
    entries: Vec<LogEntry>,
    // Set once the buffer has been handed over; later calls go straight here.
    forward: Option<SharedEmitter>,
}

/// Emitter that stores entries instead of writing them.
///
/// `fatal` is recorded like any other severity and does not terminate;
/// termination happens when the entry is replayed into a real emitter.
pub struct BufferedEmitter {
    state: Mutex<BufferState>,
}

/// Shared handle to the bootstrap buffer returned by
/// [`Registry::init_bootstrap`](crate::Registry::init_bootstrap).
pub type BufferedHandle = Arc<BufferedEmitter>;

impl BufferedEmitter {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BufferState {
                entries: Vec::with_capacity(INITIAL_CAPACITY),
                forward: None,
            }),
        }
    }

    /// Number of entries waiting to be replayed.
    pub fn count(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Copy of the entries waiting to be replayed, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().entries.clone()
    }

    /// Whether the buffer has been handed over to a real emitter.
    pub fn is_sealed(&self) -> bool {
        self.state.lock().forward.is_some()
    }

    /// Re-emit every buffered entry to `target` in append order, then clear
    /// the buffer. Returns the number of entries replayed.
    ///
    /// A replayed fatal entry invokes `target.fatal`, which normally ends the
    /// process. If it returns instead, replay stops after that entry and the
    /// later entries stay buffered.
    ///
    /// `target` must not be this buffer.
    pub fn replay_to(&self, target: &dyn Emitter) -> usize {
        let mut state = self.state.lock();
        replay(&mut state.entries, target)
    }

    /// Replay into `target`, run `install` with it, then seal the buffer so
    /// that any later call on it is forwarded to `target`.
    ///
    /// The buffer lock is held throughout, so a call racing the handover is
    /// either replayed or forwarded, never both and never dropped.
    pub(crate) fn hand_over(
        &self,
        target: SharedEmitter,
        install: impl FnOnce(SharedEmitter),
    ) -> usize {
        let mut state = self.state.lock();
        let replayed = replay(&mut state.entries, target.as_ref());
        install(target.clone());
        state.forward = Some(target);
        replayed
    }

    fn append(&self, severity: Severity, msg: &str, fields: &[Field]) {
        let forward = {
            let mut state = self.state.lock();
            if state.forward.is_none() {
                state.entries.push(LogEntry {
                    timestamp: time::now(),
                    severity,
                    message: msg.to_string(),
                    fields: fields.to_vec(),
                });
                return;
            }
            state.forward.clone()
        };
        if let Some(target) = forward {
            emitter::emit(target.as_ref(), severity, msg, fields);
        }
    }
}

fn replay(entries: &mut Vec<LogEntry>, target: &dyn Emitter) -> usize {
    let mut consumed = 0;
    for entry in entries.iter() {
        emitter::emit(target, entry.severity, &entry.message, &entry.replay_fields());
        consumed += 1;
        if entry.severity == Severity::Fatal {
            break;
        }
    }
    entries.drain(..consumed);
    consumed
}

impl Default for BufferedEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BufferedEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BufferedEmitter")
            .field("entries", &state.entries.len())
            .field("sealed", &state.forward.is_some())
            .finish()
    }
}

impl Emitter for BufferedEmitter {
    fn debug(&self, msg: &str, fields: &[Field]) {
        self.append(Severity::Debug, msg, fields);
    }

    fn info(&self, msg: &str, fields: &[Field]) {
        self.append(Severity::Info, msg, fields);
    }

    fn warn(&self, msg: &str, fields: &[Field]) {
        self.append(Severity::Warn, msg, fields);
    }

    fn error(&self, msg: &str, fields: &[Field]) {
        self.append(Severity::Error, msg, fields);
    }

    fn fatal(&self, msg: &str, fields: &[Field]) {
        self.append(Severity::Fatal, msg, fields);
    }
}
