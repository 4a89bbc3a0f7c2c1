//! Button poll loop.

use super::BridgeSession;
use crate::buttons::{
    ButtonDispatcher, ButtonEventDetector, ButtonSnapshot, CommandSink, DispatchOutcome,
    BUTTON_BYTES,
};
use crate::device::HidTransport;
use crate::log_debug;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Length of a key matrix report.
pub const BUTTON_REPORT_LEN: usize = 25;
/// Length of the unexplained short report the panel interleaves.
pub const ALTERNATE_REPORT_LEN: usize = 14;
const READ_BUFFER_LEN: usize = 64;

/// Classification of one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFrame {
    Buttons(ButtonSnapshot),
    Alternate,
    Idle,
    Malformed(usize),
}

/// Sort a raw read by its length. Byte 0 is the report id.
pub fn classify_read(data: &[u8]) -> InputFrame {
    match data.len() {
        0 => InputFrame::Idle,
        ALTERNATE_REPORT_LEN => InputFrame::Alternate,
        BUTTON_REPORT_LEN => {
            let mut bits = [0u8; BUTTON_BYTES];
            bits.copy_from_slice(&data[1..=BUTTON_BYTES]);
            InputFrame::Buttons(ButtonSnapshot::from_bytes(&bits))
        }
        other => InputFrame::Malformed(other),
    }
}

/// Timing for the poll loop.
#[derive(Debug, Clone, Copy)]
pub struct InputSettings {
    pub poll_interval: Duration,
    pub read_timeout_ms: i32,
    pub read_backoff: Duration,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5),
            read_timeout_ms: 50,
            read_backoff: Duration::from_millis(500),
        }
    }
}

/// Edge detector and dispatcher driven by device reads.
pub struct InputPoller<S> {
    detector: ButtonEventDetector,
    dispatcher: ButtonDispatcher<S>,
    buf: [u8; READ_BUFFER_LEN],
}

impl<S: CommandSink> InputPoller<S> {
    pub fn new(dispatcher: ButtonDispatcher<S>) -> Self {
        Self {
            detector: ButtonEventDetector::new(),
            dispatcher,
            buf: [0; READ_BUFFER_LEN],
        }
    }

    /// One read and whatever it dispatches.
    ///
    /// The device lock is held only for the read itself.
    pub fn poll_once<T: HidTransport>(
        &mut self,
        session: &BridgeSession<T>,
        timeout_ms: i32,
    ) -> Result<Vec<DispatchOutcome>> {
        let buf = &mut self.buf;
        let len = session.with_device(|device| device.read_report(buf, timeout_ms))?;
        let frame = classify_read(&self.buf[..len.min(READ_BUFFER_LEN)]);
        Ok(self.handle_frame(frame))
    }

    fn handle_frame(&mut self, frame: InputFrame) -> Vec<DispatchOutcome> {
        match frame {
            InputFrame::Buttons(snapshot) => self
                .detector
                .detect(snapshot)
                .into_iter()
                .flat_map(|press| {
                    debug!(button = press.id, "button pressed");
                    self.dispatcher.dispatch(press)
                })
                .collect(),
            InputFrame::Alternate | InputFrame::Idle => Vec::new(),
            InputFrame::Malformed(len) => {
                warn!(len, "rx data count not valid");
                Vec::new()
            }
        }
    }
}

/// Handle to the running poll thread.
pub struct InputWorker {
    pub handle: Option<thread::JoinHandle<()>>,
    pub stop_flag: Arc<AtomicBool>,
}

impl InputWorker {
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stop and wait for the thread to exit.
    pub fn join(mut self) {
        self.request_stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log_debug("input thread panicked");
            }
        }
    }
}

/// Poll the device on a dedicated thread until stopped.
///
/// Read errors are never fatal: the loop backs off and tries again.
pub fn spawn_input_thread<T, S>(
    session: Arc<BridgeSession<T>>,
    mut poller: InputPoller<S>,
    settings: InputSettings,
) -> InputWorker
where
    T: HidTransport + 'static,
    S: CommandSink + Send + 'static,
{
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();

    let handle = thread::spawn(move || {
        while !stop_flag_clone.load(Ordering::Relaxed) {
            thread::sleep(settings.poll_interval);
            if let Err(err) = poller.poll_once(&session, settings.read_timeout_ms) {
                warn!("continue after usb-in error: {err:#}");
                log_debug(&format!("usb-in error: {err:#}"));
                thread::sleep(settings.read_backoff);
            }
        }
        log_debug("input thread stopped");
    });

    InputWorker {
        handle: Some(handle),
        stop_flag,
    }
}
