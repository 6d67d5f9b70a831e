// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level-crossing pulse slicing and the packed bit matrix it feeds.

pub mod matrix;
pub mod slicer;

pub use matrix::{BitMatrix, Rows, BYTES_PER_ROW, ROWS};
pub use slicer::{PwmSlicer, PwmThresholds};
