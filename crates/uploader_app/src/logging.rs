//! Logger setup for the uploader binary.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::LogDestination;

/// Installs the configured loggers. A log file that cannot be opened is an
/// error; a logger installed earlier is left in place.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_file: &Path) -> io::Result<()> {
    let loggers = build_loggers(destination, level, log_file)?;
    let _ = CombinedLogger::init(loggers);
    Ok(())
}

fn build_loggers(
    destination: LogDestination,
    level: LevelFilter,
    log_file: &Path,
) -> io::Result<Vec<Box<dyn SharedLogger>>> {
    // Timestamps only; the subsystem target already names the source.
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    if destination != LogDestination::File {
        // Stderr keeps stdout free for the rendered status.
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination != LogDestination::Terminal {
        loggers.push(WriteLogger::new(level, config, open_log_file(log_file)?));
    }
    Ok(loggers)
}

/// Appends across runs so an interrupted poll keeps its history.
fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
