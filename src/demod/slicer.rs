// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level-crossing PWM slicer / demodulator: one finite state machine per protocol, each
//! maintaining independent counters over the same filtered sample stream.

use super::matrix::{BitMatrix, Rows};

/// Gap-length thresholds (in filtered-sample counts) that discriminate bit 0, bit 1, and
/// packet-group end for one protocol.
#[derive(Debug, Clone, Copy)]
pub struct PwmThresholds {
    pub short_limit: u32,
    pub long_limit: u32,
    pub reset_limit: u32,
}

impl PwmThresholds {
    /// Rubicson thermometer family timing.
    pub const RUBICSON: PwmThresholds =
        PwmThresholds { short_limit: 1744, long_limit: 3500, reset_limit: 5000 };

    /// Prologue thermometer family timing.
    pub const PROLOGUE: PwmThresholds =
        PwmThresholds { short_limit: 3500, long_limit: 7000, reset_limit: 15000 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pulse,
    Gap,
}

/// One protocol's slicer state machine plus its bit matrix.
pub struct PwmSlicer {
    thresholds: PwmThresholds,
    state: State,
    counting: bool,
    sample_counter: u32,
    matrix: BitMatrix,
}

impl PwmSlicer {
    pub fn new(thresholds: PwmThresholds) -> Self {
        PwmSlicer { thresholds, state: State::Idle, counting: false, sample_counter: 0, matrix: BitMatrix::new() }
    }

    /// Feeds one filtered sample through the FSM against the shared `level_limit`. Returns the
    /// completed packet group's rows when a quiescent interval longer than `reset_limit`
    /// finalizes a burst.
    pub fn process_sample(&mut self, sample: i16, level_limit: i32) -> Option<Rows> {
        let sample = sample as i32;
        // IDLE and GAP rise on a strict `sample > level_limit`; PULSE only falls on a strict
        // `sample < level_limit`, so a sample exactly at `level_limit` is a no-op that leaves
        // PULSE active, per spec.md §4.3's table (these two tests are not complements of each
        // other at the boundary).
        let above = sample > level_limit;
        let below = sample < level_limit;

        match self.state {
            State::Idle => {
                if above {
                    self.state = State::Pulse;
                    self.counting = true;
                }
            }
            State::Pulse => {
                if below {
                    self.state = State::Gap;
                    self.sample_counter = 0;
                }
            }
            State::Gap => {
                if above {
                    self.classify_gap();
                    self.state = State::Pulse;
                }
            }
        }

        if self.counting {
            self.sample_counter += 1;
            if self.sample_counter > self.thresholds.reset_limit {
                let rows = self.matrix.format_for_parser();
                self.matrix.reset();
                self.state = State::Idle;
                self.counting = false;
                self.sample_counter = 0;
                return Some(rows);
            }
        }

        None
    }

    /// Classifies the gap that just ended at a rising edge.
    fn classify_gap(&mut self) {
        let n = self.sample_counter;
        if n < self.thresholds.short_limit {
            self.matrix.add_bit(0);
        }
        else if n < self.thresholds.long_limit {
            self.matrix.add_bit(1);
        }
        else {
            self.matrix.advance_row();
        }
    }
}
