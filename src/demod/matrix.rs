// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The 12x5-byte packed bit matrix: the sole exchange surface between a PWM slicer and its
//! protocol parser.

use log::{trace, warn};

/// Rows in the matrix — up to 12 repeats of a burst are captured.
pub const ROWS: usize = 12;
/// Bytes per row — 40 bits, enough for both Rubicson (fits in far fewer bits) and Prologue.
pub const BYTES_PER_ROW: usize = 5;

/// A snapshot of the packed rows, handed to a protocol parser at packet-group completion.
pub type Rows = [[u8; BYTES_PER_ROW]; ROWS];

/// Fixed-size 12x5 packed bit table. Allocated once and reused for the process lifetime;
/// `reset` zeroes it back to its initial state without reallocating.
#[derive(Debug, Clone)]
pub struct BitMatrix {
    data: Rows,
    row: usize,
    byte_col: usize,
    bit_pos: u8,
}

impl BitMatrix {
    /// A zero-initialized matrix with cursors at row 0, byte 0, bit 7 (MSB-first).
    pub fn new() -> Self {
        BitMatrix { data: [[0; BYTES_PER_ROW]; ROWS], row: 0, byte_col: 0, bit_pos: 7 }
    }

    /// Zeroes the matrix and resets all cursors, without releasing the backing array.
    pub fn reset(&mut self) {
        self.data = [[0; BYTES_PER_ROW]; ROWS];
        self.row = 0;
        self.byte_col = 0;
        self.bit_pos = 7;
    }

    /// Packs one bit into the current row/byte/bit position, MSB-first within each byte.
    ///
    /// Column and bit-position overflow are clamped rather than allowed to write out of
    /// bounds; a clamp logs a warning and is not otherwise fatal — it indicates a runaway
    /// pulse train, not memory corruption.
    pub fn add_bit(&mut self, bit: u8) {
        self.data[self.row][self.byte_col] |= (bit & 1) << self.bit_pos;
        trace!("row={} byte_col={} bit_pos={} add_bit({})", self.row, self.byte_col, self.bit_pos, bit & 1);

        if self.bit_pos == 0 {
            self.bit_pos = 7;
            if self.byte_col + 1 < BYTES_PER_ROW {
                self.byte_col += 1;
            }
            else {
                warn!(
                    "bit matrix byte_col overflow at row {}: clamping at {}",
                    self.row,
                    BYTES_PER_ROW - 1
                );
            }
        }
        else {
            self.bit_pos -= 1;
        }
    }

    /// Moves to the next row (an inter-packet gap within a repeated burst was observed),
    /// resetting the byte/bit cursors. Clamped at the last row with a warning.
    pub fn advance_row(&mut self) {
        trace!("row={} -> row={}", self.row, (self.row + 1).min(ROWS - 1));
        if self.row + 1 < ROWS {
            self.row += 1;
        }
        else {
            warn!("bit matrix row overflow: clamping at row {}", ROWS - 1);
        }
        self.byte_col = 0;
        self.bit_pos = 7;
    }

    /// Returns a snapshot of the packed rows for the protocol parser.
    pub fn format_for_parser(&self) -> Rows {
        self.data
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> (usize, usize, u8) {
        (self.row, self.byte_col, self.bit_pos)
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_msb_first_within_a_byte() {
        let mut m = BitMatrix::new();
        // 0b1011_0000
        for b in [1, 0, 1, 1, 0, 0, 0, 0] {
            m.add_bit(b);
        }
        assert_eq!(m.format_for_parser()[0][0], 0b1011_0000);
        assert_eq!(m.cursor(), (0, 1, 7));
    }

    #[test]
    fn advance_row_resets_byte_and_bit_cursors() {
        let mut m = BitMatrix::new();
        m.add_bit(1);
        m.advance_row();
        assert_eq!(m.cursor(), (1, 0, 7));
    }

    #[test]
    fn byte_col_clamps_instead_of_panicking() {
        let mut m = BitMatrix::new();
        for _ in 0..(BYTES_PER_ROW * 8 + 16) {
            m.add_bit(1);
        }
        let (row, byte_col, bit_pos) = m.cursor();
        assert_eq!(row, 0);
        assert_eq!(byte_col, BYTES_PER_ROW - 1);
        assert!(bit_pos <= 7);
    }

    #[test]
    fn row_clamps_instead_of_panicking() {
        let mut m = BitMatrix::new();
        for _ in 0..(ROWS + 4) {
            m.advance_row();
        }
        assert_eq!(m.cursor(), (ROWS - 1, 0, 7));
    }

    #[test]
    fn reset_clears_data_and_cursors() {
        let mut m = BitMatrix::new();
        m.add_bit(1);
        m.advance_row();
        m.reset();
        assert_eq!(m.cursor(), (0, 0, 7));
        assert!(m.format_for_parser().iter().all(|row| row.iter().all(|&b| b == 0)));
    }
}
