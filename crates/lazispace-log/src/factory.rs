//! Builds emitters from a [`LogConfig`].

use lazispace_types::{FileLogConfig, LogConfig, LogError, LogFormat, Result, Severity};
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::emitter::Emitter;
use crate::file;
use crate::hooks::{Fallback, Hooks, Terminator};
use crate::json::JsonEmitter;
use crate::sink::{self, BoxWriter, FanOut, Sink};
use crate::text::TextEmitter;

type ConsoleOpener = Arc<dyn Fn() -> BoxWriter + Send + Sync>;
type FileOpener = Arc<dyn Fn(&FileLogConfig) -> Result<BoxWriter> + Send + Sync>;

/// Builds text or JSON emitters over the outputs a configuration enables.
///
/// The console and file openers can be replaced so that output is captured
/// in memory, and the hooks are handed to every emitter built.
#[derive(Clone)]
pub struct LoggerFactory {
    console: ConsoleOpener,
    file: FileOpener,
    hooks: Hooks,
}

impl LoggerFactory {
    /// Factory writing to stdout and the rotating log file.
    pub fn new() -> Self {
        Self {
            console: Arc::new(sink::console),
            file: Arc::new(open_file),
            hooks: Hooks::default(),
        }
    }

    /// Replace the console output with whatever `open` returns.
    pub fn with_console(mut self, open: impl Fn() -> BoxWriter + Send + Sync + 'static) -> Self {
        self.console = Arc::new(open);
        self
    }

    /// Send console output to clones of `writer`.
    pub fn with_console_sink(self, writer: impl Write + Clone + Send + Sync + 'static) -> Self {
        self.with_console(move || Box::new(writer.clone()))
    }

    /// Replace the file opener.
    pub fn with_file_opener(
        mut self,
        open: impl Fn(&FileLogConfig) -> Result<BoxWriter> + Send + Sync + 'static,
    ) -> Self {
        self.file = Arc::new(open);
        self
    }

    /// Replace the terminator given to built emitters.
    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.hooks.terminator = terminator;
        self
    }

    /// Replace the fallback channel given to built emitters.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.hooks.fallback = fallback;
        self
    }

    /// Hooks given to built emitters.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Build an emitter for `config`.
    ///
    /// The minimum severity is parsed first, then the enabled outputs are
    /// counted, then the format is selected. Outputs are only opened once
    /// all three checks pass, so a rejected configuration creates no file.
    /// Nothing is returned on failure.
    ///
    /// # Errors
    ///
    /// - [`LogError::UnknownSeverity`] for an unrecognised level
    /// - [`LogError::NoOutputsEnabled`] when console and file are both off
    /// - [`LogError::UnknownFormat`] for a format other than `text` or `json`
    /// - [`LogError::FileOpen`] when the log file cannot be opened
    pub fn build(&self, config: &LogConfig) -> Result<Box<dyn Emitter>> {
        debug!(level = %config.level, format = %config.format, "building logger");

        let min = Severity::parse(&config.level).map_err(|e| {
            error!(error = %e, "invalid log level");
            e
        })?;
        let outputs = enabled_outputs(config)?;
        let format = config.format.parse::<LogFormat>().map_err(|e| {
            error!(error = %e, "invalid log format");
            e
        })?;
        let sink = self.open_outputs(&outputs, &config.file)?;

        info!(level = %min, format = %format, "logger built");
        let hooks = self.hooks.clone();
        Ok(match format {
            LogFormat::Text => Box::new(TextEmitter::with_sink(min, sink, hooks)),
            LogFormat::Json => Box::new(JsonEmitter::with_sink(min, sink, hooks)),
        })
    }

    fn open_outputs(&self, outputs: &[Output], file: &FileLogConfig) -> Result<Sink> {
        let mut writers: Vec<BoxWriter> = Vec::with_capacity(outputs.len());
        for output in outputs {
            let writer = match output {
                Output::Console => (self.console)(),
                Output::File => (self.file)(file).map_err(|e| {
                    error!(error = %e, "failed to open log file");
                    e
                })?,
            };
            writers.push(writer);
        }

        if writers.len() == 1 {
            debug!(outputs = ?outputs, "single log output");
            return Ok(Sink::from_boxed(writers.remove(0)));
        }
        debug!(outputs = ?outputs, "fanning out log output");
        Ok(Sink::new(FanOut::new(writers)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Console,
    File,
}

fn enabled_outputs(config: &LogConfig) -> Result<Vec<Output>> {
    let mut outputs = Vec::new();
    if config.console.enabled {
        outputs.push(Output::Console);
    }
    if config.file.enabled {
        outputs.push(Output::File);
    }
    if outputs.is_empty() {
        error!("no log outputs enabled");
        return Err(LogError::NoOutputsEnabled);
    }
    Ok(outputs)
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

fn open_file(config: &FileLogConfig) -> Result<BoxWriter> {
    Ok(Box::new(file::open_rotating(config)?))
}

/// Build an emitter for `config` with the default factory.
pub fn new_logger(config: &LogConfig) -> Result<Box<dyn Emitter>> {
    LoggerFactory::new().build(config)
}
