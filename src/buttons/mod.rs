//! Button matrix edge detection and binding dispatch.
//!
//! A 25-byte input report carries the key matrix in bytes 1..13. The detector
//! turns consecutive snapshots into press events; releases are dropped because
//! every host binding only needs key-down. The dispatcher resolves each press
//! against the binding table and acts on `(action, target kind)`.

mod table;
#[cfg(test)]
mod tests;

pub use table::MCDU_BINDINGS;

use crate::device::DeviceVariant;
use crate::leds::LedId;
use crate::log_debug;
use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Bytes of key bitfield in a button report.
pub const BUTTON_BYTES: usize = 12;
/// Button id slots scanned per snapshot. Only the first 96 are wired.
pub const BUTTON_SLOTS: usize = 99;

/// Raw key matrix state, bit `n` set while button `n` is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSnapshot(u128);

impl ButtonSnapshot {
    /// Byte `i` lands at bits `8*i..8*i+8`.
    pub fn from_bytes(bytes: &[u8; BUTTON_BYTES]) -> Self {
        let bits = bytes
            .iter()
            .enumerate()
            .fold(0u128, |acc, (i, byte)| acc | (u128::from(*byte) << (8 * i)));
        Self(bits)
    }

    pub fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u128 {
        self.0
    }

    pub fn is_pressed(self, id: usize) -> bool {
        id < 128 && self.0 & (1u128 << id) != 0
    }
}

/// A released-to-pressed change of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPress {
    pub id: u8,
}

/// Rising-edge detector over successive snapshots.
#[derive(Debug, Default)]
pub struct ButtonEventDetector {
    baseline: ButtonSnapshot,
}

impl ButtonEventDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses between the stored baseline and `next`, in id order.
    ///
    /// `next` becomes the baseline afterwards, so feeding the same snapshot
    /// twice reports nothing the second time.
    pub fn detect(&mut self, next: ButtonSnapshot) -> Vec<ButtonPress> {
        let changed = self.baseline.0 ^ next.0;
        let presses = (0..BUTTON_SLOTS)
            .filter(|id| changed & (1u128 << id) != 0 && next.is_pressed(*id))
            .map(|id| ButtonPress { id: id as u8 })
            .collect();
        self.baseline = next;
        presses
    }

    pub fn baseline(&self) -> ButtonSnapshot {
        self.baseline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A host value the bridge would write.
    Data,
    /// A named event sent on the update channel.
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Toggle,
    Switch,
    None,
}

/// One entry of a key binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    pub id: u8,
    pub name: &'static str,
    pub target: &'static str,
    pub target_kind: TargetKind,
    pub action: ActionKind,
    pub led: Option<LedId>,
}

/// Where dispatched commands go.
pub trait CommandSink {
    fn send_command(&self, command: String) -> Result<()>;
}

impl CommandSink for Sender<String> {
    fn send_command(&self, command: String) -> Result<()> {
        self.send(command)
            .map_err(|err| anyhow!("command queue closed, dropped {}", err.0))
    }
}

/// What a single binding did for a press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    CommandSent(String),
    CommandFailed(String),
    DataToggled { target: String, value: bool },
    Diagnostic(String),
    Unhandled(&'static str),
}

/// Resolves presses against a binding table.
pub struct ButtonDispatcher<S> {
    bindings: &'static [ButtonBinding],
    variant: DeviceVariant,
    sink: S,
    data_cache: HashMap<String, bool>,
}

impl<S: CommandSink> ButtonDispatcher<S> {
    pub fn new(bindings: &'static [ButtonBinding], variant: DeviceVariant, sink: S) -> Self {
        Self {
            bindings,
            variant,
            sink,
            data_cache: HashMap::new(),
        }
    }

    pub fn data_value(&self, target: &str) -> Option<bool> {
        self.data_cache.get(target).copied()
    }

    /// Run every binding registered for the pressed id.
    pub fn dispatch(&mut self, press: ButtonPress) -> Vec<DispatchOutcome> {
        let bindings = self.bindings;
        let outcomes: Vec<DispatchOutcome> = bindings
            .iter()
            .filter(|binding| binding.id == press.id)
            .map(|binding| self.run(binding))
            .collect();
        if outcomes.is_empty() {
            debug!(button = press.id, "no binding for button");
        }
        outcomes
    }

    fn run(&mut self, binding: &ButtonBinding) -> DispatchOutcome {
        let target = self.variant.remap_target(binding.target).into_owned();
        match (binding.action, binding.target_kind) {
            (ActionKind::Toggle, TargetKind::Command) => {
                match self.sink.send_command(target.clone()) {
                    Ok(()) => {
                        info!(button = binding.name, command = %target, "send command");
                        DispatchOutcome::CommandSent(target)
                    }
                    Err(err) => {
                        warn!(button = binding.name, "command not sent: {err:#}");
                        log_debug(&format!("command {target} not sent: {err:#}"));
                        DispatchOutcome::CommandFailed(target)
                    }
                }
            }
            (ActionKind::Toggle, TargetKind::Data) => {
                let value = self.data_cache.entry(target.clone()).or_insert(false);
                let previous = *value;
                *value = !previous;
                info!(
                    button = binding.name,
                    target = %target,
                    "set data from {previous} to {}",
                    !previous
                );
                DispatchOutcome::DataToggled {
                    target,
                    value: !previous,
                }
            }
            (ActionKind::Switch, _) => {
                info!(button = binding.name, target = %target, "switch pressed");
                DispatchOutcome::Diagnostic(target)
            }
            (ActionKind::None, _) => {
                warn!(button = binding.name, led = ?binding.led, "no known button type");
                DispatchOutcome::Unhandled(binding.name)
            }
        }
    }
}
