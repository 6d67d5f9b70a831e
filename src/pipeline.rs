// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The pipeline orchestrator: invoked once per arriving sample block, fanning
//! envelope-detected and filtered samples out to every protocol's PWM slicer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, trace, warn};

use crate::analysis::PulseAnalyzer;
use crate::config::PipelineConfig;
use crate::demod::{PwmSlicer, Rows};
use crate::dsp::{detect_envelope, FilterHistory};
use crate::errors::Result;
use crate::protocols::{Prologue, Protocol, Rubicson};
use crate::sink::{EventSink, RawSink};
use crate::source::SampleSource;

/// Pairs a protocol's field parser with the slicer state machine that feeds it. Each runner
/// is entirely independent of the others — one FSM per protocol, run over the same stream.
struct ProtocolRunner {
    protocol: Box<dyn Protocol + Send>,
    slicer: PwmSlicer,
}

impl ProtocolRunner {
    fn new(protocol: Box<dyn Protocol + Send>) -> Self {
        let slicer = PwmSlicer::new(protocol.thresholds());
        ProtocolRunner { protocol, slicer }
    }

    fn process(&mut self, samples: &[i16], level_limit: i32, sink: &mut dyn EventSink) {
        for &sample in samples {
            if let Some(rows) = self.slicer.process_sample(sample, level_limit) {
                self.emit_if_valid(&rows, sink);
            }
        }
    }

    fn emit_if_valid(&self, rows: &Rows, sink: &mut dyn EventSink) {
        match self.protocol.parse(rows) {
            Some(reading) => {
                debug!("{} packet group decoded: {}", self.protocol.name(), reading);
                sink.emit(&reading);
            }
            None => {
                warn!("{}: packet group failed its validity check, dropped", self.protocol.name());
            }
        }
    }
}

/// Owns every buffer and protocol state for the life of the process: allocated once in
/// [`Pipeline::new`] and reused for every block.
pub struct Pipeline {
    config: PipelineConfig,
    filter_history: FilterHistory,
    analyzer: PulseAnalyzer,
    runners: Vec<ProtocolRunner>,
    remaining_budget: Option<u64>,
    do_exit: Arc<AtomicBool>,
}

impl Pipeline {
    /// `do_exit` is the process-wide shutdown flag; a signal handler sets it from outside the
    /// pipeline, and the orchestrator only ever polls it.
    pub fn new(config: PipelineConfig, do_exit: Arc<AtomicBool>) -> Self {
        let remaining_budget = config.byte_budget;
        // Prologue then Rubicson. The order is arbitrary: the two demodulators share no
        // state, so it has no effect on the decoded output.
        let runners =
            vec![ProtocolRunner::new(Box::new(Prologue)), ProtocolRunner::new(Box::new(Rubicson))];

        info!(
            "pipeline starting: freq={}Hz rate={}Hz block={} decimation={} level_limit={}",
            config.center_freq_hz,
            config.sample_rate_hz,
            config.block_size,
            config.decimation,
            config.level_limit
        );

        Pipeline { config, filter_history: FilterHistory::new(), analyzer: PulseAnalyzer::new(), runners, remaining_budget, do_exit }
    }

    /// Processes one raw IQ block: shutdown check, budget truncation, envelope detection,
    /// filtering, demodulation (or analysis reporting), and optional raw-output persistence.
    ///
    /// Returns `Ok(true)` when the caller should stop requesting further blocks (shutdown
    /// requested, or the byte budget was just exhausted); `Ok(false)` to keep going.
    pub fn process_block(
        &mut self,
        raw: &[u8],
        source: &dyn SampleSource,
        event_sink: &mut dyn EventSink,
        raw_sink: &mut dyn RawSink,
    ) -> Result<bool> {
        // A shutdown request is polled at block entry.
        if self.do_exit.load(Ordering::Relaxed) {
            source.cancel();
            return Ok(true);
        }

        // Truncate to the remaining budget if this block would exceed it.
        let mut consumed = raw.len();
        let mut budget_exhausted = false;
        if let Some(budget) = self.remaining_budget {
            if consumed as u64 >= budget {
                consumed = budget as usize;
                budget_exhausted = true;
            }
        }
        let raw = &raw[..consumed];
        trace!("block: {} raw bytes", raw.len());

        let envelope = detect_envelope(raw, self.config.decimation);
        let filtered = crate::dsp::lowpass::apply(&envelope, &mut self.filter_history);

        if self.config.analysis_mode {
            self.analyzer.inspect(&filtered, self.config.level_limit);
        }
        else {
            for runner in &mut self.runners {
                runner.process(&filtered, self.config.level_limit, event_sink);
            }
        }

        raw_sink.write_samples(&filtered)?;

        if let Some(budget) = self.remaining_budget.as_mut() {
            *budget = budget.saturating_sub(consumed as u64);
        }

        if budget_exhausted {
            info!("sample-pair budget exhausted, requesting driver cancel");
            source.cancel();
            self.do_exit.store(true, Ordering::Relaxed);
            return Ok(true);
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{NullRawSink, NullSink};

    struct NeverCancels;
    impl SampleSource for NeverCancels {
        fn read(&self, _buf: &mut [u8]) -> Result<usize> {
            Ok(0)
        }
        fn cancel(&self) {}
    }

    fn pipeline_with(config: PipelineConfig) -> (Pipeline, Arc<AtomicBool>) {
        let do_exit = Arc::new(AtomicBool::new(false));
        (Pipeline::new(config, do_exit.clone()), do_exit)
    }

    #[test]
    fn dc_zero_block_produces_no_events_and_does_not_stop() {
        let (mut pipeline, _) = pipeline_with(PipelineConfig::default());
        let raw = vec![0x80u8; 4096];
        let source = NeverCancels;
        let mut events = NullSink;
        let mut raw_out = NullRawSink;
        let stop = pipeline.process_block(&raw, &source, &mut events, &mut raw_out).unwrap();
        assert!(!stop);
    }

    #[test]
    fn shutdown_flag_short_circuits_processing() {
        let (mut pipeline, do_exit) = pipeline_with(PipelineConfig::default());
        do_exit.store(true, Ordering::Relaxed);
        let raw = vec![0x80u8; 16];
        let source = NeverCancels;
        let mut events = NullSink;
        let mut raw_out = NullRawSink;
        let stop = pipeline.process_block(&raw, &source, &mut events, &mut raw_out).unwrap();
        assert!(stop);
    }

    #[test]
    fn byte_budget_truncates_block_and_requests_stop() {
        let config = PipelineConfig { byte_budget: Some(1000), ..PipelineConfig::default() };
        let (mut pipeline, do_exit) = pipeline_with(config);
        let raw = vec![0x80u8; 10_000];
        let source = NeverCancels;
        let mut events = NullSink;
        let mut raw_out = NullRawSink;

        let stop = pipeline.process_block(&raw, &source, &mut events, &mut raw_out).unwrap();
        assert!(stop);
        assert!(do_exit.load(Ordering::Relaxed));
    }

    #[test]
    fn running_two_protocols_matches_running_each_in_isolation() {
        // A synthetic burst built from Rubicson-shaped gaps should decode identically whether
        // Prologue's slicer is also watching the same stream or not, since they share no
        // state.
        let t = crate::demod::PwmThresholds::RUBICSON;
        let mut samples = Vec::new();
        // One short pulse, one gap classified as bit 0, then silence past reset_limit.
        samples.push(20_000i16);
        samples.extend(std::iter::repeat(0i16).take((t.short_limit - 1) as usize));
        samples.push(20_000i16);
        samples.extend(std::iter::repeat(0i16).take(t.reset_limit as usize + 2));

        let mut solo = PwmSlicer::new(t);
        let mut solo_rows = None;
        for &s in &samples {
            if let Some(rows) = solo.process_sample(s, 10_000) {
                solo_rows = Some(rows);
            }
        }

        let mut alongside = PwmSlicer::new(t);
        let mut prologue_slicer = PwmSlicer::new(crate::demod::PwmThresholds::PROLOGUE);
        let mut alongside_rows = None;
        for &s in &samples {
            prologue_slicer.process_sample(s, 10_000);
            if let Some(rows) = alongside.process_sample(s, 10_000) {
                alongside_rows = Some(rows);
            }
        }

        assert_eq!(solo_rows, alongside_rows);
    }
}
