use super::protocol::{decode_update, McduState, UpdateError, UPDATE_PREFIX};
use crate::device::{DeviceVariant, HidTransport};
use crate::display::encoder::{
    blank_line_report, init_reports, page_reports, VerticalSlew, CLEAR_REPORT_COUNT,
};
use crate::display::layout::{apply_placements, layout_row, layout_scratchpad, layout_title};
use crate::display::{ColorCode, Page, PAGE_ROWS};
use crate::leds::{self, scale_brightness, LedId, ANNUNCIATOR_LEDS};
use crate::lock_or_recover;
use crate::{log_debug, log_debug_content};
use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Body rows available between title and scratchpad.
pub const BODY_ROWS: usize = PAGE_ROWS - 2;
/// Screen backlight level while the channel is down.
pub const ERROR_SCREEN_BACKLIGHT: u8 = 128;
const ERROR_TEXT_CHARS: usize = 22;

/// How `on_message` handled a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Repainted,
    Ignored,
    Rejected,
}

/// Device handle and page shared by the input and update loops.
///
/// Lock order is page before device. The input loop only ever takes the
/// device lock, one read at a time.
pub struct BridgeSession<T> {
    device: Mutex<T>,
    page: Mutex<Page>,
    slew: Mutex<VerticalSlew>,
    variant: DeviceVariant,
}

impl<T: HidTransport> BridgeSession<T> {
    pub fn new(device: T, variant: DeviceVariant) -> Self {
        Self {
            device: Mutex::new(device),
            page: Mutex::new(Page::new()),
            slew: Mutex::new(VerticalSlew::default()),
            variant,
        }
    }

    /// Run `f` with exclusive access to the device.
    pub fn with_device<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut device = lock_or_recover(&self.device, "session device");
        f(&mut device)
    }

    /// Copy of the page as last painted or being built.
    pub fn page_snapshot(&self) -> Page {
        lock_or_recover(&self.page, "session page").clone()
    }

    /// Scroll arrows drawn over the scratchpad tail on every paint.
    pub fn set_vertical_slew(&self, slew: VerticalSlew) {
        *lock_or_recover(&self.slew, "session slew") = slew;
    }

    /// Send the display power-up sequence.
    pub fn initialize(&self) -> Result<()> {
        let reports = init_reports();
        self.with_device(|device| -> Result<()> {
            for report in &reports {
                device
                    .write_report(report)
                    .context("display init sequence")?;
            }
            Ok(())
        })
    }

    /// Blank the device screen without touching the page.
    pub fn clear_device(&self) -> Result<()> {
        let report = blank_line_report();
        self.with_device(|device| -> Result<()> {
            for _ in 0..CLEAR_REPORT_COUNT {
                device.write_report(&report).context("clear display")?;
            }
            Ok(())
        })
    }

    pub fn set_led(&self, led: LedId, brightness: u8) -> Result<()> {
        self.with_device(|device| leds::set_led(device, led, brightness))
    }

    /// Send the current page to the device.
    pub fn repaint(&self) -> Result<()> {
        let page = lock_or_recover(&self.page, "session page");
        self.paint(&page)
    }

    fn paint(&self, page: &Page) -> Result<()> {
        let slew = *lock_or_recover(&self.slew, "session slew");
        let reports = page_reports(page, slew);
        self.with_device(|device| -> Result<()> {
            for report in &reports {
                device.write_report(report).context("display frame")?;
            }
            Ok(())
        })?;
        debug!(reports = reports.len(), "page painted");
        Ok(())
    }

    /// Write text onto the page without painting.
    fn draw(&self, row: usize, col: isize, text: &str, color: ColorCode, small: bool) {
        let mut page = lock_or_recover(&self.page, "session page");
        if let Err(err) = page.write(row, col, text, color, small) {
            warn!(row, col, text, "skipping write: {err}");
        }
    }

    /// Full repaint from one side's display state.
    pub fn apply_update(&self, state: &McduState) -> Result<()> {
        let mut page = lock_or_recover(&self.page, "session page");
        page.empty();

        if let Err(err) = self.update_leds(state) {
            warn!("LED update failed, painting anyway: {err:#}");
            log_debug(&format!("LED update failed: {err:#}"));
        }

        let mut placements = vec![
            layout_title(&state.title),
            layout_scratchpad(&state.scratchpad),
        ];
        if state.lines.len() > BODY_ROWS {
            warn!(
                lines = state.lines.len(),
                "update has more body lines than rows, ignoring the rest"
            );
        }
        for line in 0..state.lines.len().min(BODY_ROWS) {
            placements.extend(layout_row(
                line + 1,
                [
                    state.segment(line, 0),
                    state.segment(line, 1),
                    state.segment(line, 2),
                ],
            ));
        }
        let written = apply_placements(&mut page, &placements);
        debug!(written, skipped = placements.len() - written, "page rebuilt");

        self.paint(&page)
    }

    fn update_leds(&self, state: &McduState) -> Result<()> {
        for (name, led) in ANNUNCIATOR_LEDS {
            if let Some(on) = state.annunciator(name) {
                self.set_led(led, u8::from(on))?;
            }
        }
        if let Some(level) = state.display_brightness {
            self.set_led(LedId::ScreenBacklight, scale_brightness(level))?;
        }
        if let Some(level) = state.integral_brightness {
            self.set_led(LedId::Backlight, scale_brightness(level))?;
        }
        Ok(())
    }

    /// Channel connected.
    pub fn on_open(&self) -> Result<()> {
        info!("update channel open");
        self.draw(8, 1, "Connected to SimBridge", ColorCode::Green, false);
        self.draw(9, 1, "Waiting for display", ColorCode::Amber, false);
        self.repaint()
    }

    /// One inbound text frame.
    pub fn on_message(&self, message: &str) -> Result<MessageOutcome> {
        log_debug_content(&format!("message received: {message}"));
        self.set_led(LedId::Fail, 0)?;

        if !message.starts_with(UPDATE_PREFIX) {
            debug!("ignoring non-update message");
            return Ok(MessageOutcome::Ignored);
        }
        match decode_update(message, self.variant.side()) {
            Ok(state) => {
                self.apply_update(&state)?;
                Ok(MessageOutcome::Repainted)
            }
            Err(err @ (UpdateError::Json(_) | UpdateError::MissingSide(_))) => {
                warn!("dropping update: {err}");
                log_debug(&format!("dropping update: {err}"));
                Ok(MessageOutcome::Rejected)
            }
            Err(UpdateError::NotAnUpdate) => Ok(MessageOutcome::Ignored),
        }
    }

    /// Channel failed. The caller waits its reconnect delay and then calls
    /// `show_startup_screen` before reconnecting.
    pub fn on_error(&self, error: &str) -> Result<()> {
        warn!("update channel error: {error}");
        log_debug(&format!("update channel error: {error}"));
        self.set_led(LedId::ScreenBacklight, ERROR_SCREEN_BACKLIGHT)?;
        self.set_led(LedId::Fail, 1)?;
        self.show_startup_screen()?;
        let detail: String = error.chars().take(ERROR_TEXT_CHARS).collect();
        self.draw(4, 1, "Connection to ", ColorCode::Red, false);
        self.draw(5, 1, "SimBridge failed ", ColorCode::Red, false);
        self.draw(6, 1, &detail, ColorCode::Red, true);
        self.repaint()
    }

    /// Channel closed by the host.
    pub fn on_close(&self) -> Result<()> {
        info!("update channel closed");
        self.show_startup_screen()
    }

    /// Empty page, blank device, product banner.
    pub fn show_startup_screen(&self) -> Result<()> {
        lock_or_recover(&self.page, "session page").empty();
        self.clear_device()?;
        self.draw(0, 3, "MCDU for MSFS", ColorCode::White, false);
        self.draw(1, 3, "FlyByWire SimBridge", ColorCode::White, false);
        self.draw(
            3,
            1,
            &format!("version {}", env!("CARGO_PKG_VERSION")),
            ColorCode::White,
            false,
        );
        self.draw(8, 1, "waiting for SimBridge ", ColorCode::Amber, false);
        self.draw(
            12,
            0,
            &format!("{} unit", self.variant.label()),
            ColorCode::White,
            true,
        );
        self.repaint()
    }
}
