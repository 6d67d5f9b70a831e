// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type for the pipeline.
//!
//! Only conditions the orchestrator treats as fatal are represented here: short reads/writes,
//! an unopenable device or file, and an explicitly unsupported code path. Internal invariant
//! violations such as bit-matrix cursor overflow are never surfaced as an `Error` — they are
//! clamped and logged at the point of occurrence (see `demod::matrix`) and never unwind
//! through the pipeline.

use std::fmt;
use std::io;

/// `Error` enumerates every way the pipeline can fail to continue.
#[derive(Debug)]
pub enum Error {
    /// A fatal I/O error: short read from the sample source, short write to a sink, or a
    /// file that could not be opened.
    Io(io::Error),
    /// A malformed or out-of-range configuration value. The caller is expected to fall back
    /// to a default and continue; this variant exists so the fallback can still be logged
    /// uniformly.
    Config(String),
    /// The sample source (device) could not be opened, tuned, or gain-adjusted. Non-fatal:
    /// the orchestrator logs this as a warning and may still be able to decode if another
    /// source is available.
    Device(String),
    /// A feature this build does not implement, e.g. real hardware capture.
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Device(msg) => write!(f, "device error: {}", msg),
            Error::Unsupported(feature) => write!(f, "unsupported: {}", feature),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create a device error.
pub fn device_error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::Device(msg.into()))
}

/// Convenience function to create an unsupported-feature error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::Unsupported(feature))
}
