//! Indicator and backlight control.
//!
//! Every LED change is its own 14-byte output report; nothing is batched.

use crate::device::HidTransport;
use anyhow::Result;

pub const LED_REPORT_LEN: usize = 14;
const LED_REPORT_HEADER: [u8; 7] = [0x02, 0x32, 0xBB, 0x00, 0x00, 0x03, 0x49];

/// Addressable indicators. Discriminants are the device ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedId {
    Backlight = 0,
    ScreenBacklight = 1,
    Fail = 8,
    Fm = 9,
    Mcdu = 10,
    Menu = 11,
    Fm1 = 12,
    Ind = 13,
    Rdy = 14,
    Status = 15,
    Fm2 = 16,
}

impl LedId {
    pub fn device_id(self) -> u8 {
        self as u8
    }
}

/// Annunciator flag names in the update message and the LED each drives.
pub const ANNUNCIATOR_LEDS: [(&str, LedId); 8] = [
    ("fail", LedId::Fail),
    ("fmgc", LedId::Fm),
    ("mcdu_menu", LedId::Mcdu),
    ("menu", LedId::Menu),
    ("fm1", LedId::Fm1),
    ("ind", LedId::Ind),
    ("rdy", LedId::Rdy),
    ("fm2", LedId::Fm2),
];

pub fn annunciator_led(name: &str) -> Option<LedId> {
    ANNUNCIATOR_LEDS
        .iter()
        .find(|(flag, _)| *flag == name)
        .map(|(_, led)| *led)
}

pub fn led_report(led: LedId, brightness: u8) -> [u8; LED_REPORT_LEN] {
    let mut report = [0u8; LED_REPORT_LEN];
    report[..LED_REPORT_HEADER.len()].copy_from_slice(&LED_REPORT_HEADER);
    report[7] = led.device_id();
    report[8] = brightness;
    report
}

/// Set one indicator. Brightness is sent as given.
pub fn set_led<T: HidTransport + ?Sized>(device: &mut T, led: LedId, brightness: u8) -> Result<()> {
    device.write_report(&led_report(led, brightness))
}

/// Same brightness for each indicator, one report per id.
pub fn set_leds<T: HidTransport + ?Sized>(
    device: &mut T,
    leds: &[LedId],
    brightness: u8,
) -> Result<()> {
    for led in leds {
        set_led(device, *led, brightness)?;
    }
    Ok(())
}

/// Host brightness fraction in `[0, 1]` to a device level, rounding up.
pub fn scale_brightness(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 255.0).ceil() as u8
}
