//! Byte sinks the emitters write to.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// A boxed, thread-transferable writer.
pub type BoxWriter = Box<dyn Write + Send>;

/// An emitter's exclusive output.
///
/// The lock is held for the whole of one entry so that concurrent calls on
/// the same emitter never interleave within a line.
pub struct Sink {
    writer: Mutex<BoxWriter>,
}

impl Sink {
    /// Wrap a writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self::from_boxed(Box::new(writer))
    }

    /// Wrap an already boxed writer.
    pub fn from_boxed(writer: BoxWriter) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Exclusive access for the duration of one entry.
    pub fn lock(&self) -> MutexGuard<'_, BoxWriter> {
        self.writer.lock()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

/// Duplicates every write to each destination in order.
///
/// A write fails as soon as one destination fails; destinations after it
/// do not receive that write.
pub struct FanOut {
    writers: Vec<BoxWriter>,
}

impl FanOut {
    /// Fan out over the given destinations.
    pub fn new(writers: Vec<BoxWriter>) -> Self {
        Self { writers }
    }

    /// Number of destinations.
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    /// Whether there are no destinations.
    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl Write for FanOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for writer in &mut self.writers {
            writer.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for writer in &mut self.writers {
            writer.flush()?;
        }
        Ok(())
    }
}

/// A cloneable in-memory sink.
///
/// Every clone shares the same buffer, so one clone can be handed to an
/// emitter while another reads back what was written.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Written lines without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySink")
            .field("len", &self.buffer.lock().len())
            .finish()
    }
}

/// Standard output.
pub fn console() -> BoxWriter {
    Box::new(io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fan_out_duplicates_writes() {
        let a = MemorySink::new();
        let b = MemorySink::new();
        let mut fan = FanOut::new(vec![Box::new(a.clone()), Box::new(b.clone())]);
        assert_eq!(fan.len(), 2);

        fan.write_all(b"line\n").unwrap();
        fan.flush().unwrap();

        assert_eq!(a.contents(), "line\n");
        assert_eq!(b.contents(), "line\n");
    }

    #[test]
    fn test_fan_out_stops_at_first_failure() {
        let before = MemorySink::new();
        let after = MemorySink::new();
        let mut fan = FanOut::new(vec![
            Box::new(before.clone()),
            Box::new(Broken),
            Box::new(after.clone()),
        ]);

        assert!(fan.write_all(b"x").is_err());
        assert_eq!(before.contents(), "x");
        assert!(after.is_empty());
    }

    #[test]
    fn test_memory_sink_lines() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.write_all(b"one\ntwo\n").unwrap();
        assert_eq!(sink.lines(), ["one", "two"]);
        sink.clear();
        assert!(sink.is_empty());
    }
}
