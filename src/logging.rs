//! Stderr logger for the `spotter` binary, level taken from `SPOTTER_LOG`.

use std::env;

use log::{LevelFilter, Log, Metadata, Record};

/// Level used when `SPOTTER_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// `off`, `error`, `warn`, `info`, `debug` or `trace`, case-insensitive.
/// Blank or unrecognised values fall back to [DEFAULT_LOG_LEVEL].
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Install the stderr logger. A second call keeps the first logger.
pub fn init_from_env() {
    let level = parse_level(env::var("SPOTTER_LOG").ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
