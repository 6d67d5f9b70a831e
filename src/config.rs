// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration.
//!
//! This is a plain data type with no CLI-parsing knowledge of its own — CLI argument parsing
//! is an external collaborator, implemented with `clap` in the `ook433-rx` binary. The binary
//! builds a [`PipelineConfig`] from parsed flags and calls [`PipelineConfig::validated`], which
//! is where out-of-range values get clamped with a warning rather than rejected outright.

use log::warn;

/// Smallest accepted sample-block size.
pub const MIN_BLOCK_SIZE: u32 = 512;
/// Largest accepted sample-block size.
pub const MAX_BLOCK_SIZE: u32 = 4_194_304;
/// Default sample-block size.
pub const DEFAULT_BLOCK_SIZE: u32 = 262_144;
/// Highest decimation exponent this pipeline accepts in practice.
pub const MAX_DECIMATION: u32 = 4;
/// Default level-crossing threshold.
pub const DEFAULT_LEVEL_LIMIT: i32 = 10_000;
/// Default center frequency in Hz.
pub const DEFAULT_CENTER_FREQ_HZ: u64 = 433_920_000;
/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 48_000;

/// Everything the pipeline needs to run one capture session.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub device_index: u32,
    pub center_freq_hz: u64,
    pub sample_rate_hz: u32,
    /// Tuner gain in tenths of a dB; `0` means auto-gain.
    pub gain_tenths_db: i32,
    pub block_size: u32,
    pub level_limit: i32,
    pub decimation: u32,
    /// Sample-pair budget in bytes (the CLI flag is a pair count; this is already `* 2`).
    pub byte_budget: Option<u64>,
    pub analysis_mode: bool,
    pub synchronous: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            device_index: 0,
            center_freq_hz: DEFAULT_CENTER_FREQ_HZ,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            gain_tenths_db: 0,
            block_size: DEFAULT_BLOCK_SIZE,
            level_limit: DEFAULT_LEVEL_LIMIT,
            decimation: 0,
            byte_budget: None,
            analysis_mode: false,
            synchronous: false,
        }
    }
}

impl PipelineConfig {
    /// Clamps out-of-range fields to their nearest valid value, logging a warning for each one
    /// adjusted. Consumes and returns `self` so callers can chain it directly after building
    /// from CLI flags.
    pub fn validated(mut self) -> Self {
        if self.block_size < MIN_BLOCK_SIZE || self.block_size > MAX_BLOCK_SIZE {
            warn!(
                "block size {} out of range [{}, {}], clamping",
                self.block_size, MIN_BLOCK_SIZE, MAX_BLOCK_SIZE
            );
            self.block_size = self.block_size.clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE);
        }

        if self.decimation > MAX_DECIMATION {
            warn!("decimation {} out of range [0, {}], clamping", self.decimation, MAX_DECIMATION);
            self.decimation = MAX_DECIMATION;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_already_valid() {
        let cfg = PipelineConfig::default().validated();
        assert_eq!(cfg.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(cfg.decimation, 0);
    }

    #[test]
    fn block_size_below_minimum_is_clamped_up() {
        let cfg = PipelineConfig { block_size: 10, ..Default::default() }.validated();
        assert_eq!(cfg.block_size, MIN_BLOCK_SIZE);
    }

    #[test]
    fn block_size_above_maximum_is_clamped_down() {
        let cfg = PipelineConfig { block_size: u32::MAX, ..Default::default() }.validated();
        assert_eq!(cfg.block_size, MAX_BLOCK_SIZE);
    }

    #[test]
    fn decimation_above_max_is_clamped() {
        let cfg = PipelineConfig { decimation: 9, ..Default::default() }.validated();
        assert_eq!(cfg.decimation, MAX_DECIMATION);
    }
}
