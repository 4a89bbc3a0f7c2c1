//! Inbound update message shape.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Prefix of a display update frame on the channel.
pub const UPDATE_PREFIX: &str = "update:";

/// Display state of one side of the cockpit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct McduState {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub scratchpad: String,
    /// Body rows 1..=12, each `[left, right, centre]`.
    #[serde(deserialize_with = "lenient_lines")]
    pub lines: Vec<Vec<String>>,
    pub annunciators: BTreeMap<String, Value>,
    pub display_brightness: Option<f64>,
    pub integral_brightness: Option<f64>,
}

impl McduState {
    /// Segment `index` of body line `line`, empty when the host sent fewer.
    pub fn segment(&self, line: usize, index: usize) -> &str {
        self.lines
            .get(line)
            .and_then(|segments| segments.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether the annunciator flag is set. Absent flags are `None`.
    pub fn annunciator(&self, name: &str) -> Option<bool> {
        self.annunciators.get(name).map(is_truthy)
    }
}

/// Text of a field, or empty when the host sent something else.
fn text_or_empty(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => {
            warn!(field = %other, "non-text display field, drawing it empty");
            String::new()
        }
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(text_or_empty)
}

/// Body lines where a bad segment or line only blanks itself.
fn lenient_lines<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error> {
    let lines = match Value::deserialize(deserializer)? {
        Value::Array(lines) => lines,
        Value::Null => Vec::new(),
        other => {
            warn!(field = %other, "body lines are not a list, ignoring them");
            Vec::new()
        }
    };
    Ok(lines
        .into_iter()
        .map(|line| match line {
            Value::Array(segments) => segments.into_iter().map(text_or_empty).collect(),
            Value::Null => Vec::new(),
            other => {
                warn!(line = %other, "body line is not a list, leaving it blank");
                Vec::new()
            }
        })
        .collect())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("message is not a display update")]
    NotAnUpdate,
    #[error("invalid update payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("update has no `{0}` side")]
    MissingSide(&'static str),
}

/// Decode the `side` sub-object of an `update:` frame.
pub fn decode_update(message: &str, side: &'static str) -> Result<McduState, UpdateError> {
    let payload = message
        .strip_prefix(UPDATE_PREFIX)
        .ok_or(UpdateError::NotAnUpdate)?;
    let mut root: BTreeMap<String, Value> = serde_json::from_str(payload)?;
    let state = root.remove(side).ok_or(UpdateError::MissingSide(side))?;
    Ok(serde_json::from_value(state)?)
}
