//! `log` backend for a UCI engine.
//!
//! stdout belongs to the protocol, so warnings and errors go to stderr. With
//! `debug on` every record at `Debug` or above is also forwarded to the GUI as
//! an `info string` line.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static DEBUG_TO_GUI: AtomicBool = AtomicBool::new(false);

static LOGGER: UciLogger = UciLogger;

pub struct UciLogger;

impl UciLogger {
    /// Install the logger as the global `log` backend.
    pub fn init() -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(LevelFilter::Warn);
        Ok(())
    }

    /// Switch forwarding to the GUI on or off.
    pub fn set_debug(on: bool) {
        DEBUG_TO_GUI.store(on, Ordering::Relaxed);
        log::set_max_level(if on {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }

    #[must_use]
    pub fn debug_enabled() -> bool {
        DEBUG_TO_GUI.load(Ordering::Relaxed)
    }
}

/// `info string` form of a record
fn gui_line(record: &Record<'_>) -> String {
    format!(
        "info string {} {}",
        record.level().as_str().to_ascii_lowercase(),
        record.args()
    )
}

impl Log for UciLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() <= Level::Warn {
            let _ = writeln!(io::stderr().lock(), "{}: {}", record.level(), record.args());
        }
        if Self::debug_enabled() {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", gui_line(record));
            let _ = out.flush();
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gui_line_format() {
        let line = gui_line(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("position rejected"))
                .build(),
        );
        assert_eq!(line, "info string warn position rejected");
    }
}
