use log::{Log, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::ops::DerefMut;
use std::sync::Mutex;

/// Logs records in the standard error stream, keeping stdout for output
pub struct StderrLogger;

/// Logs records in the provided file by path
pub struct FileLogger {
    file: Mutex<BufWriter<File>>,
}

/// Forces flushing buffered records to a destination while dropping
pub struct LogFlushGuard;

pub const fn make_stderr_logger() -> &'static impl Log {
    const LOGGER: StderrLogger = StderrLogger;
    &LOGGER
}

pub fn make_file_logger(path: &str) -> std::io::Result<&'static impl Log> {
    static LOGGER: OnceCell<FileLogger> = OnceCell::new();
    LOGGER.get_or_try_init(|| FileLogger::new(path))
}

fn write_record(mut w: impl Write, record: &Record) -> std::io::Result<()> {
    writeln!(
        w,
        "{} [{}] [{}] {}",
        chrono::Local::now().format("%T.%6f"),
        record.level(),
        record.target(),
        record.args(),
    )
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = write_record(std::io::stderr(), record);
        }
    }

    fn flush(&self) {}
}

impl FileLogger {
    pub fn new(path: &str) -> std::io::Result<Self> {
        Ok(Self {
            file: Mutex::new(BufWriter::new(
                OpenOptions::new().create(true).append(true).open(path)?,
            )),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = write_record(file.deref_mut(), record) {
                eprintln!("Log write failure: {}", e);
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = file.flush() {
                eprintln!("Log flush failure: {}", e);
            }
        }
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

impl Drop for LogFlushGuard {
    fn drop(&mut self) {
        log::logger().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_write_record_format() {
        let mut out = Vec::new();
        write_record(
            &mut out,
            &Record::builder()
                .args(format_args!("Share link encoded"))
                .level(Level::Info)
                .target("openapi_sharelink::encode")
                .build(),
        )
        .unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with(" [INFO] [openapi_sharelink::encode] Share link encoded\n"));
    }

    #[test]
    fn test_file_logger_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("share.log");
        let logger = FileLogger::new(path.to_str().unwrap()).unwrap();

        log::set_max_level(log::LevelFilter::Debug);
        logger.log(
            &Record::builder()
                .args(format_args!("Decoded b64 share link"))
                .level(Level::Debug)
                .target("openapi_sharelink::decode")
                .build(),
        );
        logger.flush();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[DEBUG] [openapi_sharelink::decode] Decoded b64 share link"));
    }
}
