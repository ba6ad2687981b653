//! Replaceable side effects of the emitters: process termination after a
//! fatal entry, and the diagnostic channel for failed writes.

use lazispace_types::LogError;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Exit status used when a fatal entry terminates the process.
pub const FATAL_EXIT_CODE: i32 = 1;

/// The termination effect performed after a fatal entry is written.
///
/// The default exits the process. Tests install a recording terminator so
/// that `fatal` returns instead.
#[derive(Clone)]
pub struct Terminator(Arc<dyn Fn(i32) + Send + Sync>);

impl Terminator {
    /// Exit the process with [`FATAL_EXIT_CODE`].
    pub fn process() -> Self {
        Self(Arc::new(|code| std::process::exit(code)))
    }

    /// Use a custom termination function.
    pub fn new(f: impl Fn(i32) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Run the termination effect.
    pub fn terminate(&self) {
        (self.0)(FATAL_EXIT_CODE)
    }
}

impl Default for Terminator {
    fn default() -> Self {
        Self::process()
    }
}

impl fmt::Debug for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Terminator")
    }
}

/// Channel that receives emission failures.
///
/// Logging calls have no error return, so sink and encoding failures are
/// handed here. It must be distinct from the primary sink; the default
/// writes a fixed one-line message to stderr.
#[derive(Clone)]
pub struct Fallback(Arc<dyn Fn(&LogError) + Send + Sync>);

impl Fallback {
    /// Write a one-line description of each failure to stderr.
    pub fn stderr() -> Self {
        Self(Arc::new(|err| {
            let _ = io::stderr().write_all(fallback_line(err).as_bytes());
        }))
    }

    /// Use a custom reporting function.
    pub fn new(f: impl Fn(&LogError) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Report a failure. Never fails and never panics on its own account.
    pub fn report(&self, err: &LogError) {
        (self.0)(err)
    }
}

impl Default for Fallback {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fallback")
    }
}

/// The line written to stderr for a failure.
pub fn fallback_line(err: &LogError) -> String {
    match err {
        LogError::SinkWrite { stage, .. } => stage.fallback_message().to_string(),
        LogError::Marshal(_) => "logger: failed to marshal log entry\n".to_string(),
        other => format!("logger: {}\n", other),
    }
}

/// The pair of effects every writing emitter carries.
#[derive(Clone, Debug, Default)]
pub struct Hooks {
    /// Termination after a fatal entry
    pub terminator: Terminator,
    /// Destination for emission failures
    pub fallback: Fallback,
}

impl Hooks {
    /// Replace the terminator.
    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Replace the fallback channel.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }
}
