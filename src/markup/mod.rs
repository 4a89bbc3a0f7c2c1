//! Parser for the host's `{token}` annotated display fields.
//!
//! Each field carries its own color, font size and explicit position as
//! inline tokens. `parse_segment` reduces one field to plain glyphs plus the
//! attributes needed to place it on the page. Parsing never fails: unknown
//! tokens are dropped and a missing color falls back to white.


use crate::display::{ColorCode, PAGE_COLS};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

const WHITE_TOKEN: &str = "{white}";
const SPACE_TOKEN: &str = "{sp}";
/// Non-breaking space as it sometimes arrives escaped in the payload text.
const ESCAPED_NBSP: &str = "\\xa0";
const NBSP: char = '\u{a0}';
const SMALL_TOKEN: &str = "{small}";
const BIG_TOKEN: &str = "{big}";
/// Only this many leading characters are searched for a color token.
const COLOR_SCAN_CHARS: usize = 10;

/// Run of space markers that splits a single field into two values.
pub const SEGMENT_SEPARATOR: &str = "{sp}{sp}{sp}{sp}";

/// Color tokens in match priority order.
const COLOR_TOKENS: [(&str, ColorCode); 10] = [
    ("{white}", ColorCode::White),
    ("{green}", ColorCode::Green),
    ("{blue}", ColorCode::Cyan),
    ("{amber}", ColorCode::Amber),
    ("{cyan}", ColorCode::Cyan),
    ("{magenta}", ColorCode::Magenta),
    ("{yellow}", ColorCode::Yellow),
    ("{red}", ColorCode::Red),
    ("{grey}", ColorCode::Grey),
    ("{inop}", ColorCode::Grey),
];

/// Glyph replacements applied after truncation.
const GLYPH_SUBSTITUTIONS: [(char, char); 5] = [
    ('_', '#'),
    ('\u{b0}', '`'),
    ('|', '/'),
    ('\u{394}', '^'),
    // A stray brace left after token removal is an arrow on the real unit.
    ('{', '<'),
];

/// One parsed field: glyphs plus where and how to draw them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineSegment {
    pub text: String,
    pub leading_spaces: usize,
    pub color: ColorCode,
    pub small: bool,
}

impl LineSegment {
    /// Glyph count of `text`.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Columns occupied including the explicit leading spaces.
    pub fn width(&self) -> usize {
        self.leading_spaces + self.text_len()
    }
}

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"\{[a-zA-Z0-9 _-]+\}").expect("token regex should compile")
    })
}

/// Remove every `{token}` from `raw`, leaving only literal text.
pub fn strip_tokens(raw: &str) -> String {
    token_regex().replace_all(raw, "").into_owned()
}

/// Pick the first color token found near the start of `text`.
///
/// Returns the matched token so the caller can strip it. The host sometimes
/// puts the color token after the text, so only the head is searched.
pub fn detect_color(text: &str) -> Option<(&'static str, ColorCode)> {
    let head_end = text
        .char_indices()
        .nth(COLOR_SCAN_CHARS)
        .map_or(text.len(), |(idx, _)| idx);
    let head = &text[..head_end];
    COLOR_TOKENS
        .iter()
        .find(|(token, _)| head.contains(*token))
        .copied()
}

fn strip_space_marker(text: &str) -> Option<&str> {
    text.strip_prefix(SPACE_TOKEN)
        .or_else(|| text.strip_prefix(ESCAPED_NBSP))
        .or_else(|| text.strip_prefix(NBSP))
}

fn consume_space_markers(text: &mut &str) -> usize {
    let mut count = 0;
    while let Some(rest) = strip_space_marker(*text) {
        *text = rest;
        count += 1;
    }
    count
}

fn consume_small(text: &mut &str) -> bool {
    match (*text).strip_prefix(SMALL_TOKEN) {
        Some(rest) => {
            *text = rest;
            true
        }
        None => false,
    }
}

/// Parse one marked-up field.
pub fn parse_segment(raw: &str) -> LineSegment {
    let mut rest = raw.strip_prefix(WHITE_TOKEN).unwrap_or(raw);
    let mut leading_spaces = consume_space_markers(&mut rest);

    let mut small = consume_small(&mut rest);
    if let Some(after) = rest.strip_prefix(BIG_TOKEN) {
        small = false;
        rest = after;
    }

    let color = match detect_color(rest) {
        Some((token, color)) => {
            if let Some(after) = rest.strip_prefix(token) {
                rest = after;
                // Position markers may follow a leading color token.
                leading_spaces += consume_space_markers(&mut rest);
            }
            color
        }
        None => {
            warn!(field = raw, "no color token, defaulting to white");
            ColorCode::White
        }
    };

    // Size sometimes follows the color.
    if consume_small(&mut rest) {
        small = true;
    }

    let spaced = rest
        .replace(SPACE_TOKEN, " ")
        .replace(ESCAPED_NBSP, " ")
        .replace(NBSP, " ");
    let mut text = strip_tokens(&spaced);

    // A single trailing space is a real position for some fields.
    if text.ends_with("  ") {
        text.truncate(text.trim_end().len());
    }

    if uses_small_spacing(&text) {
        small = true;
    }

    let leading_spaces = leading_spaces.min(PAGE_COLS);
    let max_len = PAGE_COLS - leading_spaces;
    let text: String = text
        .chars()
        .take(max_len)
        .map(substitute_glyph)
        .collect();

    LineSegment {
        text,
        leading_spaces,
        color,
        small,
    }
}

/// A lone leading space before text marks the small font.
fn uses_small_spacing(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(' '), Some(second), Some(third)) if second != ' ' && third != ' '
    )
}

fn substitute_glyph(ch: char) -> char {
    GLYPH_SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == ch)
        .map_or(ch, |(_, to)| *to)
}
