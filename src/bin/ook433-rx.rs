// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line front end: wires CLI flags to a [`PipelineConfig`], a sample source, and the
//! `ook433` library's [`Pipeline`].

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};

use ook433::config::PipelineConfig;
use ook433::sink::{NullRawSink, RawSink, StderrSink, WriterRawSink};
use ook433::source::{FileSource, NullDeviceSource, SampleSource};
use ook433::Pipeline;

/// Parses a CLI numeric argument that may be given as an integer or a floating-point literal,
/// e.g. `-f 433.92e6` as well as `-f 433920000`.
fn truncating_number<T>(s: &str) -> Result<T, String>
where
    T: TryFrom<i64>,
{
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    T::try_from(value.trunc() as i64).map_err(|_| format!("'{}' is out of range", s))
}

#[derive(Parser, Debug)]
#[command(name = "ook433-rx", about = "Decode 433.92 MHz OOK/ASK sensor telemetry")]
struct Cli {
    /// Device index.
    #[arg(short = 'd', value_parser = truncating_number::<u32>, default_value_t = 0)]
    device_index: u32,

    /// Center frequency in Hz.
    #[arg(short = 'f', value_parser = truncating_number::<u64>, default_value_t = ook433::config::DEFAULT_CENTER_FREQ_HZ)]
    freq_hz: u64,

    /// Sample rate in Hz.
    #[arg(short = 's', value_parser = truncating_number::<u32>, default_value_t = ook433::config::DEFAULT_SAMPLE_RATE_HZ)]
    sample_rate_hz: u32,

    /// Tuner gain in tenths of a dB; 0 means auto-gain.
    #[arg(short = 'g', value_parser = truncating_number::<i32>, default_value_t = 0)]
    gain_tenths_db: i32,

    /// Sample block size, clamped to [512, 4194304].
    #[arg(short = 'b', value_parser = truncating_number::<u32>, default_value_t = ook433::config::DEFAULT_BLOCK_SIZE)]
    block_size: u32,

    /// Level-crossing threshold for the PWM slicers.
    #[arg(short = 'l', value_parser = truncating_number::<i32>, default_value_t = ook433::config::DEFAULT_LEVEL_LIMIT)]
    level_limit: i32,

    /// Decimation exponent (sample rate reduced by 2^N).
    #[arg(short = 'c', value_parser = truncating_number::<u32>, default_value_t = 0)]
    decimation: u32,

    /// Sample-pair budget; omit for unlimited.
    #[arg(short = 'n', value_parser = truncating_number::<u64>)]
    sample_pairs: Option<u64>,

    /// Analysis mode: report pulse timing instead of decoding.
    #[arg(short = 'a')]
    analysis_mode: bool,

    /// Read IQ samples from a file instead of a device; `-` reads stdin.
    #[arg(short = 'r', value_name = "PATH")]
    input_path: Option<PathBuf>,

    /// Synchronous driver mode (otherwise asynchronous).
    #[arg(short = 'S')]
    synchronous: bool,

    /// Raw-output path for the filtered sample stream; `-` writes stdout.
    #[arg(value_name = "file")]
    output_path: Option<PathBuf>,
}

/// A negative gain is not a valid tuner setting; this is a device error (spec.md §7 taxonomy
/// item 2), not a configuration one, so it is logged as a warning and falls back to auto-gain
/// rather than rejected outright.
fn validated_gain(raw_gain_tenths_db: i32) -> i32 {
    if raw_gain_tenths_db < 0 {
        if let Err(err) = ook433::errors::device_error::<()>(format!(
            "gain {} tenths-dB is negative, falling back to auto-gain",
            raw_gain_tenths_db
        )) {
            warn!("{}", err);
        }
        0
    }
    else {
        raw_gain_tenths_db
    }
}

fn build_config(cli: &Cli) -> PipelineConfig {
    PipelineConfig {
        device_index: cli.device_index,
        center_freq_hz: cli.freq_hz,
        sample_rate_hz: cli.sample_rate_hz,
        gain_tenths_db: validated_gain(cli.gain_tenths_db),
        block_size: cli.block_size,
        level_limit: cli.level_limit,
        decimation: cli.decimation,
        byte_budget: cli.sample_pairs.map(|pairs| pairs * 2),
        analysis_mode: cli.analysis_mode,
        synchronous: cli.synchronous,
    }
    .validated()
}

fn build_source(cli: &Cli) -> ook433::Result<Arc<dyn SampleSource + Send + Sync>> {
    match &cli.input_path {
        Some(path) => Ok(Arc::new(FileSource::open(path)?)),
        None => Ok(Arc::new(NullDeviceSource::new())),
    }
}

fn build_raw_sink(cli: &Cli) -> ook433::Result<Box<dyn RawSink>> {
    match &cli.output_path {
        None => Ok(Box::new(NullRawSink)),
        Some(path) if path == &PathBuf::from("-") => Ok(Box::new(WriterRawSink::new(io::stdout()))),
        Some(path) => Ok(Box::new(WriterRawSink::new(File::create(path)?))),
    }
}

fn run() -> ook433::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);

    info!(
        "device={} freq={}Hz rate={}Hz gain={} sync={}",
        config.device_index, config.center_freq_hz, config.sample_rate_hz, config.gain_tenths_db, config.synchronous
    );

    let source = build_source(&cli)?;
    let mut raw_sink = build_raw_sink(&cli)?;
    let mut event_sink = StderrSink;

    let do_exit = Arc::new(AtomicBool::new(false));
    let handler_flag = do_exit.clone();
    let handler_source = source.clone();
    ctrlc::set_handler(move || {
        info!("shutdown requested");
        handler_flag.store(true, Ordering::Relaxed);
        // The driver's cancel routine must be called here too, not just the flag: a blocking
        // `source.read` below is never reached to notice `do_exit` until it returns (spec.md
        // §5), so cancelling the in-flight read is what actually unblocks it.
        handler_source.cancel();
    })
    .map_err(|e| {
        ook433::Error::Io(io::Error::new(io::ErrorKind::Other, format!("failed to install signal handler: {}", e)))
    })?;

    let mut pipeline = Pipeline::new(config.clone(), do_exit.clone());
    let mut buf = vec![0u8; config.block_size as usize];

    loop {
        let n = source.read(&mut buf)?;
        if n == 0 {
            info!("clean shutdown: input exhausted");
            break;
        }

        let stop = pipeline.process_block(&buf[..n], source.as_ref(), &mut event_sink, &mut raw_sink)?;
        if stop {
            break;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
