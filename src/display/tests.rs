use super::encoder::{
    blank_line_report, chunk_reports, color_word, encode_page, init_reports, page_reports,
    VerticalSlew, CHUNK_PAYLOAD, CLEAR_REPORT_COUNT, FRAME_MARKER, REPORT_LEN,
};
use super::layout::{apply_placements, layout_row, layout_scratchpad, layout_title, Placement};
use super::*;

#[test]
fn new_page_is_blank_white_large() {
    let page = Page::new();
    for row in page.rows() {
        assert!(row.iter().all(|cell| *cell == Cell::default()));
    }
    assert_eq!(page.row_text(0), " ".repeat(PAGE_COLS));
}

#[test]
fn write_overwrites_exact_cells() {
    let mut page = Page::new();
    page.write(3, 5, "ABC", ColorCode::Green, true).unwrap();
    assert_eq!(page.row_text(3), format!("{}ABC{}", " ".repeat(5), " ".repeat(16)));
    let cell = page.cell(3, 6).unwrap();
    assert_eq!(cell.glyph, 'B');
    assert_eq!(cell.color, ColorCode::Green);
    assert!(cell.small);
    assert_eq!(page.cell(3, 8), Some(&Cell::default()));
}

#[test]
fn write_rejects_out_of_range_without_mutation() {
    let mut page = Page::new();
    assert_eq!(
        page.write(14, 0, "X", ColorCode::White, false),
        Err(RangeError::Row { row: 14 })
    );
    assert_eq!(
        page.write(1, 20, "ABCDEFGHIJ", ColorCode::White, false),
        Err(RangeError::Column { col: 20, len: 10 })
    );
    assert_eq!(
        page.write(1, 0, &"X".repeat(25), ColorCode::White, false),
        Err(RangeError::TooLong { len: 25 })
    );
    assert_eq!(
        page.write(1, -1, "X", ColorCode::White, false),
        Err(RangeError::Column { col: -1, len: 1 })
    );
    assert_eq!(page, Page::new());
}

#[test]
fn write_accepts_full_row() {
    let mut page = Page::new();
    let text = "X".repeat(PAGE_COLS);
    assert!(page.write(SCRATCHPAD_ROW, 0, &text, ColorCode::Amber, false).is_ok());
    assert_eq!(page.row_text(SCRATCHPAD_ROW), text);
}

#[test]
fn empty_resets_cells() {
    let mut page = Page::new();
    page.write(0, 0, "TITLE", ColorCode::Red, true).unwrap();
    page.empty();
    assert_eq!(page, Page::new());
}

#[test]
fn color_words_match_device_table() {
    assert_eq!(color_word(ColorCode::White, false), 0x0042);
    assert_eq!(color_word(ColorCode::White, true), 0x01AD);
    assert_eq!(color_word(ColorCode::BlackOnGrey, false), 0x0000);
    assert_eq!(color_word(ColorCode::Grey, true), 0x0108 + 0x016B);
}

#[test]
fn blank_page_encodes_three_bytes_per_cell() {
    let stream = encode_page(&Page::new(), VerticalSlew::None);
    assert_eq!(stream.len(), PAGE_ROWS * PAGE_COLS * 3);
    assert_eq!(&stream[..3], &[0x42, 0x00, b' ']);
}

#[test]
fn blank_page_fills_whole_reports() {
    let reports = page_reports(&Page::new(), VerticalSlew::None);
    let total = PAGE_ROWS * PAGE_COLS * 3;
    assert_eq!(reports.len(), total.div_ceil(CHUNK_PAYLOAD));
    assert!(reports.iter().all(|report| report[0] == FRAME_MARKER));
    assert_eq!(reports[0][1..4], [0x42, 0x00, b' ']);
}

#[test]
fn special_glyphs_expand_and_pad_last_report() {
    let mut page = Page::new();
    page.write(0, 0, "#`", ColorCode::White, false).unwrap();
    let stream = encode_page(&page, VerticalSlew::None);
    assert_eq!(&stream[..5], &[0x42, 0x00, 0xE2, 0x98, 0x90]);
    assert_eq!(&stream[5..9], &[0x42, 0x00, 0xC2, 0xB0]);
    assert_eq!(stream.len(), PAGE_ROWS * PAGE_COLS * 3 + 3);

    let reports = chunk_reports(&stream);
    assert_eq!(reports.len(), 17);
    let last = reports.last().unwrap();
    assert_eq!(last.len(), REPORT_LEN);
    assert_eq!(last[0], FRAME_MARKER);
    assert!(last[4..].iter().all(|byte| *byte == 0));
}

#[test]
fn small_font_is_little_endian_in_stream() {
    let mut page = Page::new();
    page.write(0, 0, "A", ColorCode::Green, true).unwrap();
    let stream = encode_page(&page, VerticalSlew::None);
    let word = 0x0084 + 0x016B_u16;
    assert_eq!(&stream[..3], &[(word & 0xff) as u8, (word >> 8) as u8, b'A']);
}

fn scratchpad_tail(slew: VerticalSlew) -> Vec<u8> {
    let stream = encode_page(&Page::new(), slew);
    let row_start = (PAGE_ROWS - 1) * PAGE_COLS * 3;
    let cols_before = (PAGE_COLS - 2) * 3;
    stream[row_start + cols_before..].to_vec()
}

#[test]
fn vertical_slew_overrides_last_two_cells() {
    assert_eq!(
        scratchpad_tail(VerticalSlew::None),
        vec![0x42, 0x00, b' ', 0x42, 0x00, b' ']
    );
    assert_eq!(
        scratchpad_tail(VerticalSlew::Both),
        vec![0x42, 0x00, 0xE2, 0x86, 0x91, 0x42, 0x00, 0xE2, 0x86, 0x93]
    );
    assert_eq!(
        scratchpad_tail(VerticalSlew::UpOnly),
        vec![0x42, 0x00, 0xE2, 0x86, 0x91, 0x42, 0x00, b' ']
    );
    assert_eq!(
        scratchpad_tail(VerticalSlew::DownOnly),
        vec![0x42, 0x00, b' ', 0x42, 0x00, 0xE2, 0x86, 0x93]
    );
}

#[test]
fn vertical_slew_codes() {
    assert_eq!(VerticalSlew::from_code(0), Some(VerticalSlew::None));
    assert_eq!(VerticalSlew::from_code(3), Some(VerticalSlew::DownOnly));
    assert_eq!(VerticalSlew::from_code(4), None);
}

#[test]
fn blank_line_report_layout() {
    let report = blank_line_report();
    assert_eq!(report.len(), 1 + PAGE_COLS * 3);
    assert_eq!(report[0], FRAME_MARKER);
    assert!(report[1..]
        .chunks(3)
        .all(|cell| cell == [0x42, 0x00, b' ']));
    assert_eq!(CLEAR_REPORT_COUNT, 16);
}

#[test]
fn init_reports_are_sequenced() {
    let reports = init_reports();
    assert_eq!(reports.len(), 17);
    assert_eq!(reports[0][..4], [0xF0, 0x00, 0x01, 0x38]);
    assert_eq!(reports[0][4..6], [0x32, 0xBB]);
    assert_eq!(reports[16][..4], [0xF0, 0x00, 0x11, 0x12]);
    assert!(reports[16][4 + 0x12..].iter().all(|byte| *byte == 0));
}

#[test]
fn title_without_position_is_centered() {
    let placement = layout_title("{white}FLIGHT PLAN");
    assert_eq!(placement.row, TITLE_ROW);
    assert_eq!(placement.col, 6);
    assert_eq!(placement.text, "FLIGHT PLAN");
    assert_eq!(placement.color, ColorCode::White);

    let even = layout_title("INIT");
    assert_eq!(even.col, 10);
}

#[test]
fn positioned_title_keeps_its_offset() {
    let placement = layout_title("{sp}{sp}{green}PERF");
    assert_eq!(placement.col, 2);
}

#[test]
fn scratchpad_defaults_to_left_edge() {
    let placement = layout_scratchpad("{amber}NOT ALLOWED");
    assert_eq!(placement.row, SCRATCHPAD_ROW);
    assert_eq!(placement.col, 0);
    assert_eq!(placement.color, ColorCode::Amber);
}

#[test]
fn empty_single_segment_row_is_skipped() {
    assert!(layout_row(2, ["", "", ""]).is_empty());
    assert!(layout_row(2, ["{sp}{sp}{end}", "", ""]).is_empty());
}

#[test]
fn single_segment_without_separator_is_left_aligned() {
    let placements = layout_row(4, ["{sp}{cyan}KLAX", "", ""]);
    assert_eq!(
        placements,
        vec![Placement {
            row: 4,
            col: 1,
            text: "KLAX".to_string(),
            color: ColorCode::Cyan,
            small: false,
        }]
    );
}

#[test]
fn separator_splits_single_segment() {
    let placements = layout_row(1, ["{green}DEST{sp}{sp}{sp}{sp}EDDM", "", ""]);
    assert_eq!(placements.len(), 2);
    assert_eq!(placements[0].col, 0);
    assert_eq!(placements[0].text, "DEST");
    assert_eq!(placements[0].color, ColorCode::Green);
    assert_eq!(placements[1].col, 8);
    assert_eq!(placements[1].text, "EDDM");
    assert_eq!(placements[1].color, ColorCode::White);
}

#[test]
fn split_tail_trailing_whitespace_is_stripped() {
    let placements = layout_row(1, ["A{sp}{sp}{sp}{sp}{small}B ", "", ""]);
    assert_eq!(placements[1].text, "B");
    assert!(placements[1].small);
    assert_eq!(placements[1].col, 5);
}

#[test]
fn three_segments_are_left_right_and_centered() {
    let placements = layout_row(6, ["{cyan}LEFT", "{amber}RIGHT", "{green}MID"]);
    assert_eq!(placements.len(), 3);
    assert_eq!(placements[0].col, 0);
    assert_eq!(placements[1].col, 24 - 5);
    assert_eq!(placements[1].color, ColorCode::Amber);
    // ceil(12 - 3/2) = 11
    assert_eq!(placements[2].col, 11);
}

#[test]
fn right_segment_accounts_for_leading_spaces() {
    let placements = layout_row(2, ["", "{sp}{sp}{cyan}ABC", ""]);
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].col, 24 - 5);
}

#[test]
fn apply_placements_skips_invalid_writes() {
    let mut page = Page::new();
    let placements = vec![
        Placement {
            row: 1,
            col: 0,
            text: "OK".to_string(),
            color: ColorCode::White,
            small: false,
        },
        Placement {
            row: 1,
            col: 23,
            text: "TOO LONG".to_string(),
            color: ColorCode::White,
            small: false,
        },
    ];
    assert_eq!(apply_placements(&mut page, &placements), 1);
    assert!(page.row_text(1).starts_with("OK"));
}
