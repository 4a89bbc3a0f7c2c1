//! Wire encoding for display frames.
//!
//! The page is serialized row-major. Each cell becomes a little-endian color
//! word followed by the glyph bytes; most glyphs are one byte, a few device
//! symbols are multi-byte. The resulting stream is cut into 63-byte chunks,
//! each sent as a 64-byte output report behind the `0xF2` frame marker.

use super::{Cell, ColorCode, Page, PAGE_COLS, PAGE_ROWS};

/// Size of one HID output report on the wire.
pub const REPORT_LEN: usize = 64;
/// First byte of every display data report.
pub const FRAME_MARKER: u8 = 0xF2;
/// Page bytes carried per display report.
pub const CHUNK_PAYLOAD: usize = REPORT_LEN - 1;
/// Added to the color word for the small font.
pub const SMALL_FONT_OFFSET: u16 = 0x016B;
/// Number of blank-line reports sent by a clear.
pub const CLEAR_REPORT_COUNT: usize = 16;

const INIT_MARKER: u8 = 0xF0;
const INIT_HEADER_LEN: usize = 4;
const INIT_CHUNK: usize = 56;

const EMPTY_BOX: [u8; 3] = [0xE2, 0x98, 0x90];
const DEGREE: [u8; 2] = [0xC2, 0xB0];
const ARROW_UP: [u8; 3] = [0xE2, 0x86, 0x91];
const ARROW_DOWN: [u8; 3] = [0xE2, 0x86, 0x93];

/// Scroll affordance drawn over the last two cells of the scratchpad row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalSlew {
    #[default]
    None,
    Both,
    UpOnly,
    DownOnly,
}

impl VerticalSlew {
    /// Map the host's numeric indicator (0 none, 1 both, 2 up, 3 down).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(VerticalSlew::None),
            1 => Some(VerticalSlew::Both),
            2 => Some(VerticalSlew::UpOnly),
            3 => Some(VerticalSlew::DownOnly),
            _ => None,
        }
    }

    fn shows_up(self) -> bool {
        matches!(self, VerticalSlew::Both | VerticalSlew::UpOnly)
    }

    fn shows_down(self) -> bool {
        matches!(self, VerticalSlew::Both | VerticalSlew::DownOnly)
    }
}

/// Device color word for a cell.
pub fn color_word(color: ColorCode, small: bool) -> u16 {
    if small {
        color.device_value() + SMALL_FONT_OFFSET
    } else {
        color.device_value()
    }
}

fn push_glyph(buf: &mut Vec<u8>, cell: &Cell, row: usize, col: usize, slew: VerticalSlew) {
    let last_row = row == PAGE_ROWS - 1;
    match cell.glyph {
        '#' => buf.extend_from_slice(&EMPTY_BOX),
        '`' => buf.extend_from_slice(&DEGREE),
        _ if last_row && col == PAGE_COLS - 2 && slew.shows_up() => {
            buf.extend_from_slice(&ARROW_UP)
        }
        _ if last_row && col == PAGE_COLS - 1 && slew.shows_down() => {
            buf.extend_from_slice(&ARROW_DOWN)
        }
        glyph if glyph.is_ascii() => buf.push(glyph as u8),
        glyph => {
            let mut utf8 = [0u8; 4];
            buf.extend_from_slice(glyph.encode_utf8(&mut utf8).as_bytes());
        }
    }
}

/// Flatten the page into the device byte stream.
pub fn encode_page(page: &Page, slew: VerticalSlew) -> Vec<u8> {
    let mut buf = Vec::with_capacity(PAGE_ROWS * PAGE_COLS * 3 + 8);
    for (row, cells) in page.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            buf.extend_from_slice(&color_word(cell.color, cell.small).to_le_bytes());
            push_glyph(&mut buf, cell, row, col, slew);
        }
    }
    buf
}

/// Split a byte stream into marker-prefixed, zero-padded output reports.
pub fn chunk_reports(stream: &[u8]) -> Vec<[u8; REPORT_LEN]> {
    stream
        .chunks(CHUNK_PAYLOAD)
        .map(|chunk| {
            let mut report = [0u8; REPORT_LEN];
            report[0] = FRAME_MARKER;
            report[1..=chunk.len()].copy_from_slice(chunk);
            report
        })
        .collect()
}

/// All reports needed to show `page`, in send order.
pub fn page_reports(page: &Page, slew: VerticalSlew) -> Vec<[u8; REPORT_LEN]> {
    chunk_reports(&encode_page(page, slew))
}

/// One blank display line: marker then 24 white, large spaces.
///
/// Not chunked like page data: a blank line goes out as one 73-byte write.
pub fn blank_line_report() -> Vec<u8> {
    let blank = color_word(ColorCode::White, false).to_le_bytes();
    let mut report = Vec::with_capacity(1 + PAGE_COLS * 3);
    report.push(FRAME_MARKER);
    for _ in 0..PAGE_COLS {
        report.extend_from_slice(&blank);
        report.push(b' ');
    }
    report
}

/// Reports that configure the display controller after the device opens.
pub fn init_reports() -> Vec<[u8; REPORT_LEN]> {
    INIT_PAYLOAD
        .chunks(INIT_CHUNK)
        .enumerate()
        .map(|(idx, chunk)| {
            let mut report = [0u8; REPORT_LEN];
            report[0] = INIT_MARKER;
            report[2] = (idx + 1) as u8;
            report[3] = chunk.len() as u8;
            report[INIT_HEADER_LEN..INIT_HEADER_LEN + chunk.len()].copy_from_slice(chunk);
            report
        })
        .collect()
}

/// Display controller setup payload, sent in 56-byte pieces.
const INIT_PAYLOAD: [u8; 914] = [
    0x32, 0xbb, 0x00, 0x00, 0x1e, 0x01, 0x00, 0x00, 0xc4, 0x24, 0x0a, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x18, 0x01, 0x00,
    0x00, 0xc4, 0x24, 0x0a, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x34, 0x00,
    0x18, 0x00, 0x0e, 0x00, 0x18, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01,
    0x00, 0x00, 0xc4, 0x24, 0x0a, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x05, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0xc4, 0x24, 0x0a,
    0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00, 0x00,
    0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00,
    0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00,
    0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0xff, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76,
    0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0xa5,
    0xff, 0xff, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb,
    0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e,
    0x00, 0x00, 0x00, 0x02, 0x00, 0xff, 0xff, 0xff, 0xff, 0x06, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00,
    0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x02, 0x00,
    0xff, 0xff, 0x00, 0xff, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00,
    0x00, 0x0e, 0x00, 0x00, 0x00, 0x02, 0x00, 0x3d, 0xff, 0x00, 0xff, 0x08,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19,
    0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00,
    0x02, 0x00, 0xff, 0x63, 0xff, 0xff, 0x09, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72,
    0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0xff,
    0xff, 0x0a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00,
    0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x00, 0xff, 0xff, 0xff, 0x0b, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00,
    0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x02, 0x00, 0x42,
    0x5c, 0x61, 0xff, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32,
    0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00,
    0x0e, 0x00, 0x00, 0x00, 0x02, 0x00, 0x77, 0x77, 0x77, 0xff, 0x0d, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01,
    0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x02,
    0x00, 0x5e, 0x73, 0x79, 0xff, 0x0e, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19,
    0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x03, 0x00, 0x20, 0x20, 0x20, 0xff,
    0x0f, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00,
    0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00,
    0x00, 0x03, 0x00, 0x00, 0xa5, 0xff, 0xff, 0x10, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76,
    0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x03, 0x00, 0xff, 0xff,
    0xff, 0xff, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb,
    0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e,
    0x00, 0x00, 0x00, 0x03, 0x00, 0xff, 0xff, 0x00, 0xff, 0x12, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00,
    0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x03, 0x00,
    0x3d, 0xff, 0x00, 0xff, 0x13, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00,
    0x00, 0x0e, 0x00, 0x00, 0x00, 0x03, 0x00, 0xff, 0x63, 0xff, 0xff, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19,
    0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00,
    0x03, 0x00, 0x00, 0x00, 0xff, 0xff, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72,
    0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0xff, 0xff,
    0xff, 0x16, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00,
    0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00,
    0x00, 0x00, 0x03, 0x00, 0x42, 0x5c, 0x61, 0xff, 0x17, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00,
    0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x03, 0x00, 0x77,
    0x77, 0x77, 0xff, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32,
    0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00,
    0x0e, 0x00, 0x00, 0x00, 0x03, 0x00, 0x5e, 0x73, 0x79, 0xff, 0x19, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01,
    0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x04,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x1a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x32, 0xbb, 0x00, 0x00, 0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19,
    0x00, 0x00, 0x0e, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x1b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00,
    0x19, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x0e, 0x00, 0x00,
    0x00, 0x04, 0x00, 0x02, 0x00, 0x00, 0x00, 0x1c, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x32, 0xbb, 0x00, 0x00, 0x1a, 0x01, 0x00, 0x00, 0x76,
    0x72, 0x19, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x32, 0xbb, 0x00,
    0x00, 0x1c, 0x01, 0x00, 0x00, 0x76, 0x72, 0x19, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];
