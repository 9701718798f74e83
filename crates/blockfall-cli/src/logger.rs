use std::io::{self, Write as _};

use log::{LevelFilter, Log, Metadata, Record};

/// Writes log records to stderr, one line each.
///
/// Only headless modes install it; the terminal UI owns stdout and stderr.
#[derive(Debug)]
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = io::stderr().lock();
        _ = writeln!(
            stderr,
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        _ = io::stderr().flush();
    }
}

pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
