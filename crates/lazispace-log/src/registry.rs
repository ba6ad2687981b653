//! The swappable holder of the current emitter.
//!
//! A [`Registry`] starts with no emitter, so every call on it is a silent
//! no-op. [`Registry::init_bootstrap`] installs a [`BufferedEmitter`] that
//! records calls until the configuration is known;
//! [`Registry::upgrade_from_bootstrap`] then builds the real emitter, replays
//! the buffer into it and installs it. [`Registry::init`] installs a real
//! emitter directly.
//!
//! The process-wide registry behind the free functions of this crate is
//! created on first use.

use lazispace_types::{Field, LogConfig, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::buffered::{BufferedEmitter, BufferedHandle};
use crate::emitter::{Emitter, SharedEmitter};
use crate::factory::LoggerFactory;

/// Lifecycle phase of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No emitter installed; calls are dropped
    Uninitialized,
    /// The bootstrap buffer is installed
    Bootstrap,
    /// A configured emitter is installed
    Steady,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Uninitialized => write!(f, "uninitialized"),
            Phase::Bootstrap => write!(f, "bootstrap"),
            Phase::Steady => write!(f, "steady"),
        }
    }
}

struct Slot {
    emitter: Option<SharedEmitter>,
    phase: Phase,
}

/// Holder of the current emitter.
///
/// Logging calls take the read lock only long enough to clone the current
/// emitter and write outside it. Installing a new emitter takes the write
/// lock only for the swap.
pub struct Registry {
    slot: RwLock<Slot>,
    factory: LoggerFactory,
}

impl Registry {
    /// An uninitialized registry using the default factory.
    pub fn new() -> Self {
        Self::with_factory(LoggerFactory::new())
    }

    /// An uninitialized registry building emitters with `factory`.
    pub fn with_factory(factory: LoggerFactory) -> Self {
        Self {
            slot: RwLock::new(Slot {
                emitter: None,
                phase: Phase::Uninitialized,
            }),
            factory,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.slot.read().phase
    }

    /// The factory used by [`init`](Self::init) and
    /// [`upgrade_from_bootstrap`](Self::upgrade_from_bootstrap).
    pub fn factory(&self) -> &LoggerFactory {
        &self.factory
    }

    /// Build an emitter for `config` and make it current.
    ///
    /// On failure the current emitter is left in place.
    pub fn init(&self, config: &LogConfig) -> Result<()> {
        self.debug("initializing global logger", &[]);

        let emitter = match self.factory.build(config) {
            Ok(emitter) => SharedEmitter::from(emitter),
            Err(err) => {
                self.error(
                    "failed to initialize global logger",
                    &[Field::new("error", err.to_string())],
                );
                return Err(err);
            }
        };
        self.announce(config);
        self.install(emitter, Phase::Steady);

        self.info("global logger initialized", &[]);
        Ok(())
    }

    /// Install a fresh bootstrap buffer and return a handle to it.
    pub fn init_bootstrap(&self) -> BufferedHandle {
        let buffer = Arc::new(BufferedEmitter::new());
        self.install(buffer.clone(), Phase::Bootstrap);

        self.debug("bootstrap logger initialized", &[]);
        buffer
    }

    /// Replace the bootstrap buffer with an emitter built for `config`.
    ///
    /// The buffered entries are replayed into the new emitter before it is
    /// installed. Calls that reach the buffer while the upgrade is in
    /// progress are either replayed or forwarded to the new emitter. With no
    /// buffer this behaves like [`init`](Self::init).
    ///
    /// On failure the current emitter, usually the buffer, stays in place
    /// and keeps its entries.
    pub fn upgrade_from_bootstrap(
        &self,
        config: &LogConfig,
        buffer: Option<&BufferedEmitter>,
    ) -> Result<()> {
        let buffered = buffer.map_or(0, BufferedEmitter::count);
        self.debug(
            "upgrading from bootstrap logger",
            &[Field::new("buffered_logs", buffered)],
        );

        let emitter = match self.factory.build(config) {
            Ok(emitter) => SharedEmitter::from(emitter),
            Err(err) => {
                self.error(
                    "failed to create real logger during upgrade",
                    &[Field::new("error", err.to_string())],
                );
                return Err(err);
            }
        };
        self.announce(config);

        let replayed = match buffer {
            Some(buffer) => {
                buffer.hand_over(emitter, |target| self.install(target, Phase::Steady))
            }
            None => {
                self.install(emitter, Phase::Steady);
                0
            }
        };

        self.info(
            "upgraded from bootstrap logger",
            &[Field::new("replayed_logs", replayed)],
        );
        Ok(())
    }

    /// Logged on the outgoing emitter, so during an upgrade it is replayed
    /// with the rest of the buffer.
    fn announce(&self, config: &LogConfig) {
        self.info(
            "logger initialized successfully",
            &[
                Field::new("level", config.level.as_str()),
                Field::new("format", config.format.as_str()),
            ],
        );
    }

    fn install(&self, emitter: SharedEmitter, phase: Phase) {
        let mut slot = self.slot.write();
        slot.emitter = Some(emitter);
        slot.phase = phase;
    }

    fn current(&self) -> Option<SharedEmitter> {
        self.slot.read().emitter.clone()
    }
}

impl Emitter for Registry {
    fn debug(&self, msg: &str, fields: &[Field]) {
        if let Some(emitter) = self.current() {
            emitter.debug(msg, fields);
        }
    }

    fn info(&self, msg: &str, fields: &[Field]) {
        if let Some(emitter) = self.current() {
            emitter.info(msg, fields);
        }
    }

    fn warn(&self, msg: &str, fields: &[Field]) {
        if let Some(emitter) = self.current() {
            emitter.warn(msg, fields);
        }
    }

    fn error(&self, msg: &str, fields: &[Field]) {
        if let Some(emitter) = self.current() {
            emitter.error(msg, fields);
        }
    }

    /// Delegates to the current emitter: a configured emitter writes and
    /// terminates, the bootstrap buffer records the entry, and an
    /// uninitialized registry does nothing.
    fn fatal(&self, msg: &str, fields: &[Field]) {
        if let Some(emitter) = self.current() {
            emitter.fatal(msg, fields);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("phase", &self.phase())
            .field("factory", &self.factory)
            .finish()
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry used by the free logging functions.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Build an emitter for `config` and make it the process-wide logger.
pub fn init(config: &LogConfig) -> Result<()> {
    global().init(config)
}

/// Install the bootstrap buffer as the process-wide logger.
pub fn init_bootstrap() -> BufferedHandle {
    global().init_bootstrap()
}

/// Replace the process-wide bootstrap buffer with a configured emitter.
pub fn upgrade_from_bootstrap(config: &LogConfig, buffer: Option<&BufferedEmitter>) -> Result<()> {
    global().upgrade_from_bootstrap(config, buffer)
}

/// Log a debug message on the process-wide logger.
pub fn debug(msg: &str, fields: &[Field]) {
    global().debug(msg, fields);
}

/// Log an info message on the process-wide logger.
pub fn info(msg: &str, fields: &[Field]) {
    global().info(msg, fields);
}

/// Log a warning on the process-wide logger.
pub fn warn(msg: &str, fields: &[Field]) {
    global().warn(msg, fields);
}

/// Log an error on the process-wide logger.
pub fn error(msg: &str, fields: &[Field]) {
    global().error(msg, fields);
}

/// Log a fatal message on the process-wide logger.
///
/// Terminates the process once a configured logger is installed. Before
/// that the entry is buffered or dropped.
pub fn fatal(msg: &str, fields: &[Field]) {
    global().fatal(msg, fields);
}
