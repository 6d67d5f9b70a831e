// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pulse-inspection reporter: a diagnostic-only component used in analysis mode (`-a`). It
//! never touches protocol state — it only logs pulse boundaries and a running average of the
//! distance between consecutive pulse starts.
//!
//! Lives as a dedicated, pipeline-owned object with the pipeline's own lifetime rather than as
//! file-scope mutable state.

use log::info;

/// Tracks pulse boundaries across the whole sample stream (spanning many blocks) and a
/// cumulative average of inter-pulse distance.
///
/// `distance_count`/`distance_sum` are process-lifetime totals, never reset between bursts, so
/// the printed average is the lifetime mean of every burst seen so far rather than a
/// per-burst figure. This is deliberate, not an oversight — see DESIGN.md.
#[derive(Debug, Default)]
pub struct PulseAnalyzer {
    absolute_index: u64,
    in_pulse: bool,
    pulse_start: u64,
    last_pulse_start: Option<u64>,
    distance_count: u64,
    distance_sum: u64,
}

impl PulseAnalyzer {
    pub fn new() -> Self {
        PulseAnalyzer::default()
    }

    /// Scans one block of filtered samples, logging each pulse's start/end sample index and
    /// the running average distance between consecutive pulse starts. Does not mutate any
    /// [`crate::demod::PwmSlicer`] state.
    pub fn inspect(&mut self, samples: &[i16], level_limit: i32) {
        for &sample in samples {
            let above = sample as i32 > level_limit;

            if above && !self.in_pulse {
                self.in_pulse = true;
                self.pulse_start = self.absolute_index;

                if let Some(prev_start) = self.last_pulse_start {
                    let distance = self.absolute_index - prev_start;
                    self.distance_count += 1;
                    self.distance_sum += distance;

                    // The first-ever distance divides by its own count (itself, trivially);
                    // later ones divide by the lifetime count, which is never reset per burst.
                    let avg = if self.distance_count == 1 {
                        distance as f64
                    }
                    else {
                        self.distance_sum as f64 / self.distance_count as f64
                    };

                    info!(
                        "pulse_start={} pulse_distance={} running_avg={:.1}",
                        self.pulse_start, distance, avg
                    );
                }
                else {
                    info!("pulse_start={}", self.pulse_start);
                }

                self.last_pulse_start = Some(self.pulse_start);
            }
            else if !above && self.in_pulse {
                self.in_pulse = false;
                info!("pulse_end={}", self.absolute_index);
            }

            self.absolute_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse_train(starts: &[usize], width: usize, total_len: usize) -> Vec<i16> {
        let mut samples = vec![0i16; total_len];
        for &start in starts {
            for s in samples.iter_mut().skip(start).take(width) {
                *s = 20_000;
            }
        }
        samples
    }

    #[test]
    fn three_pulses_report_consistent_distances() {
        let samples = pulse_train(&[1000, 2200, 3400], 100, 4000);
        let mut analyzer = PulseAnalyzer::new();
        analyzer.inspect(&samples, 10_000);

        assert_eq!(analyzer.distance_count, 2);
        assert_eq!(analyzer.distance_sum, 2400);
    }

    #[test]
    fn average_never_resets_across_inspect_calls() {
        let mut analyzer = PulseAnalyzer::new();
        analyzer.inspect(&pulse_train(&[10, 1210], 5, 1300), 10_000);
        assert_eq!(analyzer.distance_count, 1);

        // A second, independent-looking burst still accumulates into the same lifetime
        // totals rather than starting a fresh average.
        analyzer.inspect(&pulse_train(&[10, 510], 5, 600), 10_000);
        assert_eq!(analyzer.distance_count, 2);
    }
}
