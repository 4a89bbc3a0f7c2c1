use super::AppConfig;
use crate::display::encoder::VerticalSlew;
use anyhow::{bail, Result};
use clap::Parser;
use std::ops::RangeInclusive;

const POLL_INTERVAL_RANGE_MS: RangeInclusive<u64> = 1..=1_000;
const READ_TIMEOUT_RANGE_MS: RangeInclusive<u64> = 1..=1_000;
const READ_BACKOFF_RANGE_MS: RangeInclusive<u64> = 10..=10_000;
const RECONNECT_DELAY_RANGE_MS: RangeInclusive<u64> = 100..=60_000;
const ALLOWED_URL_SCHEMES: &[&str] = &["ws://", "wss://"];

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize the endpoint.
    pub fn validate(&mut self) -> Result<()> {
        check_range("--poll-interval-ms", self.poll_interval_ms, POLL_INTERVAL_RANGE_MS)?;
        check_range("--read-timeout-ms", self.read_timeout_ms, READ_TIMEOUT_RANGE_MS)?;
        check_range("--read-backoff-ms", self.read_backoff_ms, READ_BACKOFF_RANGE_MS)?;
        check_range(
            "--reconnect-delay-ms",
            self.reconnect_delay_ms,
            RECONNECT_DELAY_RANGE_MS,
        )?;
        if VerticalSlew::from_code(self.vertical_slew).is_none() {
            bail!(
                "--vertical-slew must be 0 (none), 1 (both), 2 (up) or 3 (down), got {}",
                self.vertical_slew
            );
        }
        self.url = sanitize_url(&self.url)?;
        Ok(())
    }
}

fn check_range(flag: &str, value: u64, range: RangeInclusive<u64>) -> Result<()> {
    if !range.contains(&value) {
        bail!(
            "{flag} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        );
    }
    Ok(())
}

/// Trim the endpoint and require a websocket scheme with a host.
pub(super) fn sanitize_url(raw: &str) -> Result<String> {
    let url = raw.trim();
    if url.is_empty() {
        bail!("--url cannot be empty");
    }
    if url.chars().any(char::is_whitespace) {
        bail!("--url cannot contain whitespace: '{url}'");
    }
    let Some(rest) = ALLOWED_URL_SCHEMES
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
    else {
        bail!("--url must start with ws:// or wss://, got '{url}'");
    };
    if rest.is_empty() || rest.starts_with('/') {
        bail!("--url is missing a host: '{url}'");
    }
    Ok(url.to_string())
}
