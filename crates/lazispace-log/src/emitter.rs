//! The logging capability shared by every emitter.

use lazispace_types::{Field, Severity};
use std::sync::Arc;

/// A sink-bound implementation of the five logging operations.
///
/// Implementations are [`TextEmitter`](crate::TextEmitter),
/// [`JsonEmitter`](crate::JsonEmitter) and
/// [`BufferedEmitter`](crate::BufferedEmitter). None of the operations
/// return errors: write failures are reported to the emitter's fallback
/// channel.
#[cfg_attr(test, mockall::automock)]
pub trait Emitter: Send + Sync {
    /// Log a debug-level message.
    fn debug(&self, msg: &str, fields: &[Field]);

    /// Log an info-level message.
    fn info(&self, msg: &str, fields: &[Field]);

    /// Log a warning.
    fn warn(&self, msg: &str, fields: &[Field]);

    /// Log an error.
    fn error(&self, msg: &str, fields: &[Field]);

    /// Log a fatal message, then terminate.
    ///
    /// Writing emitters always output the entry regardless of their minimum
    /// severity and then run their terminator. The bootstrap buffer only
    /// records the entry; termination happens when it is replayed.
    fn fatal(&self, msg: &str, fields: &[Field]);
}

/// Shared handle to an emitter.
pub type SharedEmitter = Arc<dyn Emitter>;

/// Call the operation of `target` matching `severity`.
pub fn emit(target: &dyn Emitter, severity: Severity, msg: &str, fields: &[Field]) {
    match severity {
        Severity::Debug => target.debug(msg, fields),
        Severity::Info => target.info(msg, fields),
        Severity::Warn => target.warn(msg, fields),
        Severity::Error => target.error(msg, fields),
        Severity::Fatal => target.fatal(msg, fields),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_dispatches_by_severity() {
        let mut mock = MockEmitter::new();
        mock.expect_debug()
            .withf(|msg, fields| msg == "d" && fields.is_empty())
            .times(1)
            .return_const(());
        mock.expect_info().times(1).return_const(());
        mock.expect_warn().times(1).return_const(());
        mock.expect_error().times(1).return_const(());
        mock.expect_fatal()
            .withf(|msg, fields| msg == "f" && fields.len() == 1)
            .times(1)
            .return_const(());

        emit(&mock, Severity::Debug, "d", &[]);
        emit(&mock, Severity::Info, "i", &[]);
        emit(&mock, Severity::Warn, "w", &[]);
        emit(&mock, Severity::Error, "e", &[]);
        emit(&mock, Severity::Fatal, "f", &[Field::new("k", 1)]);
    }
}
