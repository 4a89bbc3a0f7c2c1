//! Debug and crash logs in the temp dir, off unless `--logs` is given.
//!
//! Inbound message content and panic payloads are only written with
//! `--log-content` as well.

use crate::config::AppConfig;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
const CRASH_LOG_MAX_BYTES: u64 = 256 * 1024;

static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_CONTENT_ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: Mutex<Option<CappedFile>> = Mutex::new(None);

pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("mcdu_bridge.log")
}

pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("mcdu_bridge_crash.log")
}

/// Append-only file that starts over once a line would take it past `cap`.
struct CappedFile {
    file: File,
    len: u64,
    cap: u64,
}

impl CappedFile {
    fn open(path: &Path, cap: u64) -> Option<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()?;
        let len = file.metadata().map(|meta| meta.len()).unwrap_or(0);
        Some(Self { file, len, cap })
    }

    fn append(&mut self, line: &str) {
        let line_len = line.len() as u64;
        if self.len.saturating_add(line_len) > self.cap && self.file.set_len(0).is_ok() {
            self.len = 0;
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.len = self.len.saturating_add(line_len);
        }
    }
}

fn timestamped(msg: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("[{secs}] {msg}\n")
}

/// Configure logging from CLI flags or environment.
pub fn init_logging(config: &AppConfig) {
    set_logging(config.logging_enabled(), config.log_content);
}

fn set_logging(enabled: bool, content: bool) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    LOG_CONTENT_ENABLED.store(enabled && content, Ordering::Relaxed);
    let log = enabled
        .then(|| CappedFile::open(&log_file_path(), LOG_MAX_BYTES))
        .flatten();
    *DEBUG_LOG.lock().unwrap_or_else(PoisonError::into_inner) = log;
}

/// Append a timestamped line to the debug log.
pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = timestamped(msg);
    if let Some(log) = DEBUG_LOG
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_mut()
    {
        log.append(&line);
    }
}

/// Like `log_debug`, for lines that carry host message content.
pub fn log_debug_content(msg: &str) {
    if LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        log_debug(msg);
    }
}

/// One crash line with the panic location. The payload is only kept when
/// content logging is on.
pub fn log_panic(info: &PanicHookInfo<'_>) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let location = info
        .location()
        .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
    let payload = if !LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        "payload omitted"
    } else if let Some(text) = info.payload().downcast_ref::<&str>() {
        *text
    } else if let Some(text) = info.payload().downcast_ref::<String>() {
        text.as_str()
    } else {
        "non-string payload"
    };
    let line = timestamped(&format!(
        "panic at {location}: {payload} (v{})",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(mut crash_log) = CappedFile::open(&crash_log_path(), CRASH_LOG_MAX_BYTES) {
        crash_log.append(&line);
    }
}
