// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol field extraction: turns the rows a [`crate::demod::PwmSlicer`] collected into a
//! decoded [`Reading`], or `None` if the row's fields fail the protocol's validity predicate.

mod prologue;
mod rubicson;

use std::fmt;

use crate::demod::{PwmThresholds, Rows};

pub use prologue::Prologue;
pub use rubicson::Rubicson;

/// A decoded sensor reading, independent of which protocol produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub protocol: &'static str,
    pub id: u8,
    pub channel: Option<u8>,
    pub button: Option<bool>,
    pub first_reading: Option<bool>,
    /// Tenths of a degree Celsius, sign-extended from the protocol's packed field.
    pub temperature_tenths_c: i16,
}

impl fmt::Display for Reading {
    /// Formats the temperature as `sign . (|tmp|/10) . (|tmp|%10)`, e.g. `+23.4` or `-10.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tmp = self.temperature_tenths_c;
        let sign = if tmp < 0 { '-' } else { '+' };
        let mag = tmp.unsigned_abs();
        write!(f, "{} id={:02x} {}{}.{}", self.protocol, self.id, sign, mag / 10, mag % 10)?;
        if let Some(channel) = self.channel {
            write!(f, " ch={}", channel)?;
        }
        if let Some(button) = self.button {
            write!(f, " button={}", button)?;
        }
        Ok(())
    }
}

/// A decoder for one OTA protocol: its PWM timing and how to turn a completed row set into a
/// [`Reading`]. Modeled after the small, self-contained per-protocol decoders common in SDR
/// receivers (each protocol owns its own timing and field layout; none share state).
pub trait Protocol {
    /// Human-readable protocol name, used in `Reading::protocol` and log messages.
    fn name(&self) -> &'static str;

    /// The PWM gap-length thresholds this protocol's burst was sliced with.
    fn thresholds(&self) -> PwmThresholds;

    /// Attempts to parse a [`Reading`] out of a completed packet group's rows. Returns `None`
    /// if the protocol's validity predicate rejects the row.
    fn parse(&self, rows: &Rows) -> Option<Reading>;
}

/// Sign-extends the 16-bit word built from a protocol's two temperature bytes, then arithmetic
/// right-shifts by 4 to produce a signed 12-bit tenths-of-a-degree value.
pub(crate) fn decode_temperature(hi: u8, lo_nibble_byte: u8) -> i16 {
    let word = ((hi as u16) << 8) | (lo_nibble_byte as u16 & 0xF0);
    (word as i16) >> 4
}
