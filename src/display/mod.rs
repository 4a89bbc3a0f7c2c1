//! In-memory display state for the 14x24 MCDU screen.
//!
//! The page is the authoritative copy of what the device shows. Every update
//! empties it, redraws all fields, and pushes the whole grid through the
//! encoder; nothing is diffed against the previous frame.

pub mod encoder;
pub mod layout;
#[cfg(test)]
mod tests;

use thiserror::Error;

/// Rows on the device screen: title, 12 label/data rows, scratchpad.
pub const PAGE_ROWS: usize = 14;
/// Glyph columns per row.
pub const PAGE_COLS: usize = 24;
/// Row used by the page title.
pub const TITLE_ROW: usize = 0;
/// Row used by the scratchpad.
pub const SCRATCHPAD_ROW: usize = PAGE_ROWS - 1;

/// Colors the device can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorCode {
    #[default]
    White,
    Amber,
    Cyan,
    Green,
    Magenta,
    Red,
    Yellow,
    Grey,
    /// Black glyph on a grey background.
    BlackOnGrey,
}

impl ColorCode {
    /// Device color word for the large font.
    pub fn device_value(self) -> u16 {
        match self {
            ColorCode::BlackOnGrey => 0x0000,
            ColorCode::Amber => 0x0021,
            ColorCode::White => 0x0042,
            ColorCode::Cyan => 0x0063,
            ColorCode::Green => 0x0084,
            ColorCode::Magenta => 0x00A5,
            ColorCode::Red => 0x00C6,
            ColorCode::Yellow => 0x00E7,
            ColorCode::Grey => 0x0108,
        }
    }
}

/// One glyph position on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub color: ColorCode,
    pub small: bool,
    pub glyph: char,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            color: ColorCode::White,
            small: false,
            glyph: ' ',
        }
    }
}

/// Rejected page write. Checked before any cell is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("row {row} is outside the page (0..{PAGE_ROWS})")]
    Row { row: usize },
    #[error("text of {len} glyphs does not fit in a {PAGE_COLS}-column row")]
    TooLong { len: usize },
    #[error("column {col} with {len} glyphs runs outside the row (0..{PAGE_COLS})")]
    Column { col: isize, len: usize },
}

/// Fixed 14x24 grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    cells: [[Cell; PAGE_COLS]; PAGE_ROWS],
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::default(); PAGE_COLS]; PAGE_ROWS],
        }
    }

    /// Reset every cell to white, large, blank.
    pub fn empty(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(Cell::default());
        }
    }

    /// Overwrite `text` starting at `col` on `row`.
    pub fn write(
        &mut self,
        row: usize,
        col: isize,
        text: &str,
        color: ColorCode,
        small: bool,
    ) -> Result<(), RangeError> {
        let len = text.chars().count();
        if row >= PAGE_ROWS {
            return Err(RangeError::Row { row });
        }
        if len > PAGE_COLS {
            return Err(RangeError::TooLong { len });
        }
        let start = usize::try_from(col).map_err(|_| RangeError::Column { col, len })?;
        if start + len > PAGE_COLS {
            return Err(RangeError::Column { col, len });
        }
        for (cell, glyph) in self.cells[row][start..start + len].iter_mut().zip(text.chars()) {
            *cell = Cell {
                color,
                small,
                glyph,
            };
        }
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; PAGE_COLS]> {
        self.cells.iter()
    }

    /// Glyphs of one row as a string, mostly for diagnostics and tests.
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().map(|cell| cell.glyph).collect())
            .unwrap_or_default()
    }
}
