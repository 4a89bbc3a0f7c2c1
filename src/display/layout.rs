//! Row placement for parsed fields.
//!
//! Title and scratchpad are single fields. Each body row arrives as three
//! raw segments (left, right, centre). A row with only a left segment may
//! hide a second value behind a run of space markers, which is split out and
//! drawn right after the first.
//!
//! Segments are placed independently. Contradictory markup can make them
//! overlap, in which case later writes overwrite earlier ones. This is a
//! known limitation of the host markup and is left as is.

use super::{ColorCode, Page, RangeError, PAGE_COLS, SCRATCHPAD_ROW, TITLE_ROW};
use crate::markup::{parse_segment, strip_tokens, LineSegment, SEGMENT_SEPARATOR};
use tracing::warn;

/// A positioned text run ready for `Page::write`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: isize,
    pub text: String,
    pub color: ColorCode,
    pub small: bool,
}

impl Placement {
    fn at(row: usize, col: usize, segment: LineSegment) -> Self {
        Self::at_signed(row, col as isize, segment)
    }

    fn at_signed(row: usize, col: isize, segment: LineSegment) -> Self {
        Self {
            row,
            col,
            text: segment.text,
            color: segment.color,
            small: segment.small,
        }
    }

    pub fn apply(&self, page: &mut Page) -> Result<(), RangeError> {
        page.write(self.row, self.col, &self.text, self.color, self.small)
    }
}

/// Title row. Centered when the host gave no explicit position.
pub fn layout_title(raw: &str) -> Placement {
    let segment = parse_segment(raw);
    let col = if segment.leading_spaces == 0 {
        if !segment.text.is_empty() {
            warn!(title = raw, "title has no position, centering");
        }
        (PAGE_COLS / 2).saturating_sub(segment.text_len().div_ceil(2))
    } else {
        segment.leading_spaces
    };
    Placement::at(TITLE_ROW, col, segment)
}

/// Scratchpad row. Left-aligned unless positioned.
pub fn layout_scratchpad(raw: &str) -> Placement {
    let segment = parse_segment(raw);
    let col = segment.leading_spaces;
    Placement::at(SCRATCHPAD_ROW, col, segment)
}

/// Body row `row` from its three raw segments.
pub fn layout_row(row: usize, segments: [&str; 3]) -> Vec<Placement> {
    let [left, right, centre] = segments;
    if right.is_empty() && centre.is_empty() {
        return layout_single(row, left);
    }

    let mut placements = Vec::with_capacity(3);
    if !left.is_empty() {
        let segment = parse_segment(left);
        let col = segment.leading_spaces;
        placements.push(Placement::at(row, col, segment));
    }
    if !right.is_empty() {
        let segment = parse_segment(right);
        let col = PAGE_COLS as isize - segment.width() as isize;
        placements.push(Placement::at_signed(row, col, segment));
    }
    if !centre.is_empty() {
        let segment = parse_segment(centre);
        let col = (PAGE_COLS / 2) as isize - (segment.width() / 2) as isize;
        placements.push(Placement::at_signed(row, col, segment));
    }
    placements
}

fn layout_single(row: usize, raw: &str) -> Vec<Placement> {
    if strip_tokens(raw).is_empty() {
        return Vec::new();
    }

    let Some(split_at) = raw.find(SEGMENT_SEPARATOR) else {
        let segment = parse_segment(raw);
        let col = segment.leading_spaces;
        return vec![Placement::at(row, col, segment)];
    };

    // The separator stays with the tail so it becomes the tail's position.
    let (head, tail) = raw.split_at(split_at);
    let first = parse_segment(head);
    let mut second = parse_segment(tail);
    let second_col = first.width() + second.leading_spaces;
    second.text.truncate(second.text.trim_end().len());

    let mut placements = vec![Placement::at(row, first.leading_spaces, first)];
    if !second.text.is_empty() {
        placements.push(Placement::at(row, second_col, second));
    }
    placements
}

/// Write every placement, logging and skipping the ones that do not fit.
///
/// Returns how many were written.
pub fn apply_placements(page: &mut Page, placements: &[Placement]) -> usize {
    let mut written = 0;
    for placement in placements {
        match placement.apply(page) {
            Ok(()) => written += 1,
            Err(err) => warn!(
                row = placement.row,
                col = placement.col,
                text = %placement.text,
                "skipping write: {err}"
            ),
        }
    }
    written
}
