// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Envelope detection and low-pass filtering: the two stages that turn a raw IQ byte block
//! into a filtered magnitude trace for the PWM slicers. Each allocates a fresh output buffer
//! per call rather than aliasing its input in place, trading an allocation for eliminating the
//! two-element-types-in-one-region aliasing hazard of the original design (see each module's
//! own header comment and SPEC_FULL.md).

pub mod envelope;
pub mod lowpass;

pub use envelope::detect_envelope;
pub use lowpass::{FilterHistory, FILTER_ORDER};
