pub mod bridge;
pub mod buttons;
pub mod config;
pub mod device;
pub mod display;
pub mod leds;
mod lock;
mod logging;
pub mod markup;
mod telemetry;
#[cfg(test)]
mod test_support;

pub(crate) use lock::lock_or_recover;
pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use telemetry::{init_tracing, tracing_log_path};
