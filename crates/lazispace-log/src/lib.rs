//! # Lazispace Log
//!
//! Two-phase structured logging for lazispace.
//!
//! Before the application configuration is loaded, calls are recorded by a
//! bootstrap buffer. Once the configuration is known, the buffer is replayed
//! into a text or JSON emitter writing to the console, a log file, or
//! both, and that emitter becomes current.
//!
//! This crate provides:
//!
//! - **Emitters**: [`TextEmitter`], [`JsonEmitter`] and the bootstrap
//!   [`BufferedEmitter`], all implementing [`Emitter`]
//! - **Factory**: [`LoggerFactory`] builds an emitter from a [`LogConfig`]
//! - **Registry**: [`Registry`] holds the current emitter and runs the
//!   bootstrap → upgrade handover; the free functions ([`info`], [`error`],
//!   ...) use a process-wide instance
//! - **Sinks**: console, log file, fan-out and [`MemorySink`]
//!
//! ## Example
//!
//! ```rust
//! use lazispace_log::{fields, Emitter, LogConfig, LoggerFactory, MemorySink, Registry};
//!
//! let console = MemorySink::new();
//! let registry = Registry::with_factory(LoggerFactory::new().with_console_sink(console.clone()));
//!
//! let buffer = registry.init_bootstrap();
//! registry.info("loading configuration", &[]);
//!
//! let config = LogConfig::default();
//! registry.upgrade_from_bootstrap(&config, Some(&buffer))?;
//! registry.info("ready", &fields!["port" => 8080]);
//!
//! assert!(console.contents().contains("INFO: loading configuration | bootstrap=true"));
//! assert!(console.contents().contains("INFO: ready | port=8080"));
//! # Ok::<(), lazispace_log::LogError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffered;
pub mod emitter;
pub mod factory;
pub mod file;
pub mod hooks;
pub mod json;
pub mod registry;
pub mod sink;
pub mod text;
pub mod time;

// Re-export commonly used items
pub use buffered::{BufferedEmitter, BufferedHandle, LogEntry};
pub use emitter::{Emitter, SharedEmitter};
pub use factory::{new_logger, LoggerFactory};
pub use hooks::{Fallback, Hooks, Terminator, FATAL_EXIT_CODE};
pub use json::JsonEmitter;
pub use registry::{
    debug, error, fatal, global, info, init, init_bootstrap, upgrade_from_bootstrap, warn, Phase,
    Registry,
};
pub use sink::{FanOut, MemorySink};
pub use text::TextEmitter;

pub use lazispace_types::{
    fields, ConsoleConfig, Field, FieldValue, FileLogConfig, LogConfig, LogError, LogFormat,
    Result, Severity,
};
