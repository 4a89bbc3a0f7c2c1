//! JSON trace file for the bridge's `tracing` events.

use crate::config::AppConfig;
use crate::log_debug;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::UtcTime;

/// `MCDU_BRIDGE_TRACE_LOG` overrides the temp-dir default.
pub fn tracing_log_path() -> PathBuf {
    env::var_os("MCDU_BRIDGE_TRACE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("mcdu_bridge_trace.jsonl"))
}

/// Install the global JSON subscriber when logging is on.
pub fn init_tracing(config: &AppConfig) {
    if !config.logging_enabled() {
        return;
    }
    let path = tracing_log_path();
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            log_debug(&format!("trace log {} unavailable: {err}", path.display()));
            return;
        }
    };
    let installed = tracing_subscriber::fmt()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(Mutex::new(file))
        .with_current_span(false)
        .try_init();
    if installed.is_err() {
        log_debug("tracing subscriber already installed");
    }
}
