#![deny(missing_docs)]
//! Shared logging utilities for the uploader workspace.
//!
//! Every message is tagged with a [`Subsystem`], which becomes the `log`
//! target. Backends can then filter the poller apart from the autosave
//! task without parsing message text.

/// The part of the client a log record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// Status polling loop.
    Poller,
    /// Debounced form persistence.
    Autosave,
    /// Result page fetch and metadata extraction.
    Page,
    /// Key/value storage backends.
    Store,
    /// Binary wiring: config, CLI, rendering.
    App,
}

impl Subsystem {
    /// The `log` target used for records of this subsystem.
    pub const fn target(self) -> &'static str {
        match self {
            Subsystem::Poller => "uploader::poller",
            Subsystem::Autosave => "uploader::autosave",
            Subsystem::Page => "uploader::page",
            Subsystem::Store => "uploader::store",
            Subsystem::App => "uploader::app",
        }
    }
}

/// Logs a trace-level message for a subsystem.
#[macro_export]
macro_rules! uploader_trace {
    ($subsystem:expr, $($arg:tt)*) => {{
        log::trace!(target: $crate::Subsystem::target($subsystem), $($arg)*);
    }};
}

/// Logs a debug-level message for a subsystem.
#[macro_export]
macro_rules! uploader_debug {
    ($subsystem:expr, $($arg:tt)*) => {{
        log::debug!(target: $crate::Subsystem::target($subsystem), $($arg)*);
    }};
}

/// Logs an info-level message for a subsystem.
#[macro_export]
macro_rules! uploader_info {
    ($subsystem:expr, $($arg:tt)*) => {{
        log::info!(target: $crate::Subsystem::target($subsystem), $($arg)*);
    }};
}

/// Logs a warn-level message for a subsystem.
#[macro_export]
macro_rules! uploader_warn {
    ($subsystem:expr, $($arg:tt)*) => {{
        log::warn!(target: $crate::Subsystem::target($subsystem), $($arg)*);
    }};
}

/// Logs an error-level message for a subsystem.
#[macro_export]
macro_rules! uploader_error {
    ($subsystem:expr, $($arg:tt)*) => {{
        log::error!(target: $crate::Subsystem::target($subsystem), $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Error)
        .build();

    // Another test may have installed the logger already.
    let _ = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto);
}
