// src/log.rs
// `log` backend: elapsed-time lines appended to .store/debug.log,
// optionally echoed to stderr.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::consts::{LOG_FILE, STORE_DIR};

static START: OnceLock<Instant> = OnceLock::new();
static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

pub fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

struct FileLogger {
    path: PathBuf,
    echo: bool,
    lock: Mutex<()>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = fmt_elapsed(start().elapsed().as_millis());
        let line = format!("[{elapsed}][{}] {}\n", record.level(), record.args());

        if self.echo {
            eprint!("{line}");
        }
        if let Ok(_guard) = self.lock.lock() {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Install the logger once per process. A missing store directory is
/// created; if that fails, lines are only echoed (when `echo` is set).
pub fn init(level: LevelFilter, echo: bool) -> Result<(), SetLoggerError> {
    start();
    let dir = PathBuf::from(STORE_DIR);
    let _ = fs::create_dir_all(&dir);

    let logger = LOGGER.get_or_init(|| FileLogger {
        path: dir.join(LOG_FILE),
        echo,
        lock: Mutex::new(()),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
