use super::{ActionKind, ButtonBinding, TargetKind};
use crate::leds::LedId;

const fn command(id: u8, name: &'static str, target: &'static str) -> ButtonBinding {
    ButtonBinding {
        id,
        name,
        target,
        target_kind: TargetKind::Command,
        action: ActionKind::Toggle,
        led: None,
    }
}

const fn inert(id: u8, name: &'static str, target: &'static str, led: LedId) -> ButtonBinding {
    ButtonBinding {
        id,
        name,
        target,
        target_kind: TargetKind::Data,
        action: ActionKind::None,
        led: Some(led),
    }
}

/// Captain-side bindings for the MCDU key matrix.
///
/// Ids 17 and 27 are unbound. Id 75 carries two inert entries that share the
/// brightness rocker.
pub const MCDU_BINDINGS: [ButtonBinding; 74] = [
    command(0, "LSK1L", "event:left:L1"),
    command(1, "LSK2L", "event:left:L2"),
    command(2, "LSK3L", "event:left:L3"),
    command(3, "LSK4L", "event:left:L4"),
    command(4, "LSK5L", "event:left:L5"),
    command(5, "LSK6L", "event:left:L6"),
    command(6, "LSK1R", "event:left:R1"),
    command(7, "LSK2R", "event:left:R2"),
    command(8, "LSK3R", "event:left:R3"),
    command(9, "LSK4R", "event:left:R4"),
    command(10, "LSK5R", "event:left:R5"),
    command(11, "LSK6R", "event:left:R6"),
    command(12, "DIRTO", "event:left:DIR"),
    command(13, "PROG", "event:left:PROG"),
    command(14, "PERF", "event:left:PERF"),
    command(15, "INIT", "event:left:INIT"),
    command(16, "DATA", "event:left:DATA"),
    command(18, "BRT", "event:left:BRT"),
    command(19, "FPLN", "event:left:FPLN"),
    command(20, "RADNAV", "event:left:RAD"),
    command(21, "FUEL", "event:left:FUEL"),
    command(22, "SEC-FPLN", "event:left:SEC"),
    command(23, "ATC", "event:left:ATC"),
    command(24, "MENU", "event:left:MENU"),
    command(25, "DIM", "event:left:DIM"),
    command(26, "AIRPORT", "event:left:AIRPORT"),
    command(28, "SLEW_LEFT", "event:left:LEFT"),
    command(29, "SLEW_UP", "event:left:UP"),
    command(30, "SLEW_RIGHT", "event:left:RIGHT"),
    command(31, "SLEW_DOWN", "event:left:DOWN"),
    command(32, "KEY1", "event:left:1"),
    command(33, "KEY2", "event:left:2"),
    command(34, "KEY3", "event:left:3"),
    command(35, "KEY4", "event:left:4"),
    command(36, "KEY5", "event:left:5"),
    command(37, "KEY6", "event:left:6"),
    command(38, "KEY7", "event:left:7"),
    command(39, "KEY8", "event:left:8"),
    command(40, "KEY9", "event:left:9"),
    command(41, "DOT", "event:left:DOT"),
    command(42, "KEY0", "event:left:0"),
    command(43, "PLUSMINUS", "event:left:PLUSMINUS"),
    command(44, "KEYA", "event:left:A"),
    command(45, "KEYB", "event:left:B"),
    command(46, "KEYC", "event:left:C"),
    command(47, "KEYD", "event:left:D"),
    command(48, "KEYE", "event:left:E"),
    command(49, "KEYF", "event:left:F"),
    command(50, "KEYG", "event:left:G"),
    command(51, "KEYH", "event:left:H"),
    command(52, "KEYI", "event:left:I"),
    command(53, "KEYJ", "event:left:J"),
    command(54, "KEYK", "event:left:K"),
    command(55, "KEYL", "event:left:L"),
    command(56, "KEYM", "event:left:M"),
    command(57, "KEYN", "event:left:N"),
    command(58, "KEYO", "event:left:O"),
    command(59, "KEYP", "event:left:P"),
    command(60, "KEYQ", "event:left:Q"),
    command(61, "KEYR", "event:left:R"),
    command(62, "KEYS", "event:left:S"),
    command(63, "KEYT", "event:left:T"),
    command(64, "KEYU", "event:left:U"),
    command(65, "KEYV", "event:left:V"),
    command(66, "KEYW", "event:left:W"),
    command(67, "KEYX", "event:left:X"),
    command(68, "KEYY", "event:left:Y"),
    command(69, "KEYZ", "event:left:Z"),
    command(70, "SLASH", "event:left:DIV"),
    command(71, "SPACE", "event:left:SP"),
    command(72, "OVERFLY", "event:left:OVFY"),
    command(73, "Clear", "event:left:CLR"),
    inert(75, "LCDBright", "event:left:BRIGHTUP", LedId::ScreenBacklight),
    inert(75, "Backlight", "ckpt/fped/lights/mainPedLeft/anim", LedId::Backlight),
];
