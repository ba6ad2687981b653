//! # Lazispace Types
//!
//! Core types shared by the lazispace logging crates.
//!
//! This crate provides:
//!
//! - [`Severity`], the ordered five-level classification of log entries
//! - [`Field`] and [`FieldValue`], the key/value annotations attached to a call
//! - [`LogError`] and the [`Result`] alias
//! - Configuration types consumed by the logger factory
//!
//! ## Example
//!
//! ```
//! use lazispace_types::{Field, Severity};
//!
//! let level = Severity::parse("WARNING").unwrap();
//! assert_eq!(level, Severity::Warn);
//! assert_eq!(level.display_name(), "WARN");
//! assert!(level.enables(Severity::Error));
//!
//! let field = Field::new("user", "alice");
//! assert_eq!(field.to_string(), "user=alice");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod enums;
pub mod errors;
pub mod field;

// Re-export common types for convenience
pub use config::{ConsoleConfig, FileLogConfig, LogConfig};
pub use enums::{LogFormat, Severity};
pub use errors::{LogError, Result, WriteStage};
pub use field::{Field, FieldValue};
