// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Injectable sinks for decoded events and raw-sample persistence: tests and embedders can
//! substitute a null or channel-backed sink in place of the default stderr printer.

use std::io::Write;
use std::sync::mpsc::Sender;

use crate::errors::Result;
use crate::protocols::Reading;

/// Receives decoded sensor readings.
pub trait EventSink {
    fn emit(&mut self, reading: &Reading);
}

/// Formats readings to the error stream, one line per reading.
#[derive(Debug, Default)]
pub struct StderrSink;

impl EventSink for StderrSink {
    fn emit(&mut self, reading: &Reading) {
        eprintln!("{}", reading);
    }
}

/// Discards every reading. Used in analysis mode (which never invokes the protocol parsers)
/// and in tests that don't care about emitted events.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _reading: &Reading) {}
}

/// Delivers readings to an `mpsc` channel instead of printing them, for embedding the
/// pipeline in a larger program without depending on stdio.
pub struct ChannelSink {
    tx: Sender<Reading>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Reading>) -> Self {
        ChannelSink { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, reading: &Reading) {
        // The receiver may have been dropped (e.g. the embedding program stopped listening);
        // that is not a pipeline error, so the send failure is only logged.
        if self.tx.send(*reading).is_err() {
            log::debug!("event sink channel receiver dropped, discarding reading");
        }
    }
}

/// Receives the filtered sample buffer for optional raw-output persistence. A short write is
/// treated as fatal, surfaced as [`crate::errors::Error::Io`].
pub trait RawSink {
    fn write_samples(&mut self, buf: &[i16]) -> Result<()>;
}

/// Writes filtered samples as little-endian `i16` to any [`Write`] implementor (a file, or
/// stdout when the CLI output path is `-`).
pub struct WriterRawSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterRawSink<W> {
    pub fn new(writer: W) -> Self {
        WriterRawSink { writer }
    }
}

impl<W: Write> RawSink for WriterRawSink<W> {
    fn write_samples(&mut self, buf: &[i16]) -> Result<()> {
        let bytes: Vec<u8> = buf.iter().flat_map(|s| s.to_le_bytes()).collect();
        self.writer.write_all(&bytes)?;
        Ok(())
    }
}

/// Discards the filtered buffer. The default when no raw-output path is given.
#[derive(Debug, Default)]
pub struct NullRawSink;

impl RawSink for NullRawSink {
    fn write_samples(&mut self, _buf: &[i16]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn channel_sink_forwards_readings() {
        let (tx, rx) = channel();
        let mut sink = ChannelSink::new(tx);
        let reading = Reading {
            protocol: "rubicson",
            id: 1,
            channel: None,
            button: None,
            first_reading: None,
            temperature_tenths_c: 234,
        };
        sink.emit(&reading);
        assert_eq!(rx.recv().unwrap(), reading);
    }

    #[test]
    fn writer_raw_sink_writes_little_endian_samples() {
        let mut buf = Vec::new();
        {
            let mut sink = WriterRawSink::new(&mut buf);
            sink.write_samples(&[1, -1]).unwrap();
        }
        assert_eq!(buf, vec![1, 0, 0xFF, 0xFF]);
    }
}
