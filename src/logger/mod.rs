use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::fmt::Write as FmtWrite;
use std::time::{SystemTime, UNIX_EPOCH};

/// Colored stderr logger. Reads go to files, so nothing is ever printed to stdout.
pub struct ReadsimLogger;

impl log::Log for ReadsimLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let (color_code, reset_code) = get_color_codes(record.level());
            eprintln!("{}{} - {} - {}{}",
                      color_code,
                      get_formatted_time(),
                      record.level(),
                      record.args(),
                      reset_code);
        }
    }

    fn flush(&self) {}
}

static LOGGER: ReadsimLogger = ReadsimLogger;

pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(level))
}

/// `info` by default, one step louder per `-v`, errors only when quiet.
pub fn level_from_verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn get_formatted_time() -> String {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();

    let mut output = String::new();
    let _ = write!(output, "{:02}:{:02}:{:02}.{:03}",
                   (secs % 86400) / 3600,
                   (secs % 3600) / 60,
                   secs % 60,
                   duration.subsec_millis());
    output
}

fn get_color_codes(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::Error => ("\x1b[31m", "\x1b[0m"),   // Red
        Level::Warn => ("\x1b[33m", "\x1b[0m"),    // Yellow
        Level::Info => ("\x1b[32m", "\x1b[0m"),    // Green
        Level::Debug => ("\x1b[36m", "\x1b[0m"),   // Cyan
        Level::Trace => ("\x1b[35m", "\x1b[0m"),   // Magenta
    }
}
