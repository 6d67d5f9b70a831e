// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The sample source contract: the SDR driver is an external collaborator, referenced here
//! only through its `read`/`cancel` contract. This crate ships the one source it can fully
//! implement and test — reading IQ bytes back out of a file — plus a stand-in for real
//! hardware capture.
//!
//! Both `read` and `cancel` take `&self`: the driver's cancel routine must be callable while
//! a blocking read is in flight on another thread (spec.md §5), so a source cannot hold the
//! exclusive `&mut self` borrow `read` would otherwise need for its whole duration. Each
//! implementor below uses its own interior mutability (a `Mutex` around the file handle, an
//! `Arc<AtomicBool>` flag) to satisfy that.

use std::fs::File;
use std::io::{self, Read, Stdin};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{unsupported_error, Result};

/// An opaque provider of interleaved IQ byte blocks.
pub trait SampleSource: Send + Sync {
    /// Reads up to `buf.len()` bytes, returning the number of bytes actually read (`0` at
    /// end of stream). Short reads below a full block are not themselves an error; the
    /// orchestrator decides what to do with a partial final block.
    fn read(&self, buf: &mut [u8]) -> Result<usize>;

    /// Requests that any blocking read return promptly. Idempotent, and safe to call
    /// concurrently with an in-flight `read` from another thread (e.g. a signal handler).
    fn cancel(&self);
}

enum FileInner {
    File(File),
    Stdin(Stdin),
}

/// Reads IQ bytes from a file, or from standard input when the path is `-`. `cancel` is a
/// no-op: a finite file always reaches EOF on its own, and there is nothing to interrupt
/// mid-read.
pub struct FileSource {
    inner: Mutex<FileInner>,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let inner = if path == Path::new("-") {
            FileInner::Stdin(io::stdin())
        }
        else {
            FileInner::File(File::open(path)?)
        };
        Ok(FileSource { inner: Mutex::new(inner) })
    }
}

impl SampleSource for FileSource {
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock().expect("file source mutex poisoned");
        let n = match &mut *inner {
            FileInner::File(f) => f.read(buf)?,
            FileInner::Stdin(s) => s.read(buf)?,
        };
        Ok(n)
    }

    fn cancel(&self) {}
}

/// Stands in for the real RTL-SDR/SoapySDR driver, which this crate does not implement.
/// Exists only so a `PipelineConfig` without `-r` still has a `SampleSource` to construct; any
/// `read` call fails immediately until cancelled.
#[derive(Debug, Default)]
pub struct NullDeviceSource {
    cancelled: Arc<AtomicBool>,
}

impl NullDeviceSource {
    pub fn new() -> Self {
        NullDeviceSource::default()
    }
}

impl SampleSource for NullDeviceSource {
    fn read(&self, _buf: &mut [u8]) -> Result<usize> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Ok(0);
        }
        unsupported_error("hardware capture is not implemented in this build; use -r PATH")
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_source_reads_back_written_bytes() {
        let mut path = std::env::temp_dir();
        path.push(format!("ook433-test-{}.iq", std::process::id()));
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(&[0x80, 0x81, 0x7F, 0x80]).unwrap();
        }

        let source = FileSource::open(&path).unwrap();
        let mut buf = [0u8; 4];
        let n = source.read(&mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(buf, [0x80, 0x81, 0x7F, 0x80]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn null_device_source_is_unsupported_until_cancelled() {
        let source = NullDeviceSource::new();
        let mut buf = [0u8; 4];
        assert!(source.read(&mut buf).is_err());
        source.cancel();
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }
}
