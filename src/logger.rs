use std::{fs, io::Write as _, path::Path, sync::Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

const TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Writes every message down to debug level into the per-run log file
/// and mirrors info and above onto stderr for the operator.
struct DualLogger {
    file: Mutex<fs::File>,
}

impl Log for DualLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = OffsetDateTime::now_utc()
            .format(&TIMESTAMP)
            .unwrap_or_default();
        let line = format!(
            "{timestamp} {:5} {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
        if record.level() <= Level::Info {
            eprintln!("{line}");
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn init(log_file: &Path) -> anyhow::Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    log::set_boxed_logger(Box::new(DualLogger {
        file: Mutex::new(file),
    }))?;
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}
