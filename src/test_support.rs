//! In-memory device for unit tests.

use crate::device::HidTransport;
use crate::leds::LED_REPORT_LEN;
use anyhow::{anyhow, Result};
use std::collections::VecDeque;

/// Scripted result of one `read_report` call.
pub(crate) enum ScriptedRead {
    Data(Vec<u8>),
    Fail(&'static str),
}

/// Records every written report and replays scripted reads.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    pub(crate) writes: Vec<Vec<u8>>,
    pub(crate) reads: VecDeque<ScriptedRead>,
    pub(crate) fail_writes: bool,
    /// Reject LED reports only, display frames still go through.
    pub(crate) fail_led_writes: bool,
}

impl RecordingTransport {
    pub(crate) fn with_reads(reads: impl IntoIterator<Item = ScriptedRead>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Writes whose first byte is `marker`.
    pub(crate) fn reports_with_marker(&self, marker: u8) -> Vec<&Vec<u8>> {
        self.writes
            .iter()
            .filter(|report| report.first() == Some(&marker))
            .collect()
    }
}

impl HidTransport for RecordingTransport {
    fn write_report(&mut self, report: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("device unplugged"));
        }
        if self.fail_led_writes && report.len() == LED_REPORT_LEN && report.first() == Some(&0x02) {
            return Err(anyhow!("LED report rejected"));
        }
        self.writes.push(report.to_vec());
        Ok(())
    }

    fn read_report(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize> {
        match self.reads.pop_front() {
            Some(ScriptedRead::Data(data)) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            Some(ScriptedRead::Fail(reason)) => Err(anyhow!(reason)),
            None => Ok(0),
        }
    }
}
