//! Command-line parsing and validation helpers.

mod validation;

use crate::bridge::InputSettings;
use crate::device::DeviceVariant;
use crate::display::encoder::VerticalSlew;
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_BRIDGE_URL: &str = "ws://localhost:8380/interfaces/v1/mcdu";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 50;
pub const DEFAULT_READ_BACKOFF_MS: u64 = 500;
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5_000;

/// CLI options for the MCDU bridge.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "mcdu-bridge",
    about = "MCDU Bridge: drives a USB MCDU panel from the SimBridge display feed",
    author,
    version
)]
pub struct AppConfig {
    /// SimBridge MCDU websocket endpoint
    #[arg(long, env = "MCDU_BRIDGE_URL", default_value = DEFAULT_BRIDGE_URL)]
    pub url: String,

    /// Delay between button reads (milliseconds)
    #[arg(long = "poll-interval-ms", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Per-read HID timeout (milliseconds)
    #[arg(long = "read-timeout-ms", default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout_ms: u64,

    /// Pause after a failed button read (milliseconds)
    #[arg(long = "read-backoff-ms", default_value_t = DEFAULT_READ_BACKOFF_MS)]
    pub read_backoff_ms: u64,

    /// How long the connection error screen stays up before reconnecting (milliseconds)
    #[arg(long = "reconnect-delay-ms", default_value_t = DEFAULT_RECONNECT_DELAY_MS)]
    pub reconnect_delay_ms: u64,

    /// Override the seat derived from the attached panel
    #[arg(long, value_enum)]
    pub variant: Option<DeviceVariant>,

    /// Scroll arrows over the scratchpad tail: 0 none, 1 both, 2 up, 3 down
    #[arg(long = "vertical-slew", default_value_t = 0)]
    pub vertical_slew: u8,

    /// Print attached supported panels and exit
    #[arg(long = "list-devices", default_value_t = false)]
    pub list_devices: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "MCDU_BRIDGE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "MCDU_BRIDGE_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging inbound message content (debug log only)
    #[arg(
        long = "log-content",
        env = "MCDU_BRIDGE_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}

impl AppConfig {
    /// Timing for the button poll thread.
    pub fn input_settings(&self) -> InputSettings {
        InputSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            read_timeout_ms: i32::try_from(self.read_timeout_ms).unwrap_or(i32::MAX),
            read_backoff: Duration::from_millis(self.read_backoff_ms),
        }
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn vertical_slew(&self) -> VerticalSlew {
        VerticalSlew::from_code(self.vertical_slew).unwrap_or_default()
    }

    /// Whether any file logging is on.
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }
}
