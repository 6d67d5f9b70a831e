// ook433
// Copyright (c) 2026 The ook433 Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Envelope detection: reduces an interleaved IQ byte stream to magnitude-squared samples.
//!
//! Writes into a freshly allocated buffer rather than aliasing the IQ buffer in place as a
//! `u16` output: the IF envelope of a 433 MHz OOK pulse is slow relative to the 48 kHz sample
//! rate, so a single extra allocation per block is not on the hot path, and it avoids reading
//! one element type out of a buffer written as another.

/// Re-centers a raw IQ byte (biased by `0x80`) around zero as a signed value.
#[inline(always)]
fn recenter(byte: u8) -> i32 {
    (byte ^ 0x80) as i8 as i32
}

/// Computes `|I + jQ|^2` for every `2^decimation`-th IQ pair in `buf`.
///
/// `buf` holds interleaved, unsigned I/Q bytes; its length must be even (the upstream driver
/// guarantees this). Decimation samples nearest-neighbour: only the first pair of each stride
/// of `2^decimation` pairs is used, the rest are skipped without anti-alias filtering, an
/// acceptable approximation at this signal's bandwidth.
///
/// Returns `buf.len() / 2 / 2^decimation` magnitude-squared samples.
pub fn detect_envelope(buf: &[u8], decimation: u32) -> Vec<u16> {
    debug_assert_eq!(buf.len() % 2, 0, "IQ buffer length must be even");

    let stride_pairs = 1usize << decimation;
    let n_pairs = buf.len() / 2;
    let n_out = n_pairs / stride_pairs;

    let mut out = Vec::with_capacity(n_out);
    for k in 0..n_out {
        let pair_idx = k * stride_pairs;
        let i = recenter(buf[2 * pair_idx]);
        let q = recenter(buf[2 * pair_idx + 1]);
        let mag_sq = (i * i + q * q) as u16;
        out.push(mag_sq);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_zero_produces_zero_envelope() {
        let buf = vec![0x80u8; 256];
        let env = detect_envelope(&buf, 0);
        assert_eq!(env.len(), 128);
        assert!(env.iter().all(|&v| v == 0));
    }

    #[test]
    fn full_scale_produces_max_magnitude() {
        // I = 0xFF -> recentered to 127, Q = 0x00 -> recentered to -128.
        let buf = vec![0xFFu8, 0x00u8];
        let env = detect_envelope(&buf, 0);
        assert_eq!(env, vec![127 * 127 + 128 * 128]);
    }

    #[test]
    fn decimation_halves_then_quarters_length() {
        let buf = vec![0x90u8; 64]; // 32 IQ pairs
        assert_eq!(detect_envelope(&buf, 0).len(), 32);
        assert_eq!(detect_envelope(&buf, 1).len(), 16);
        assert_eq!(detect_envelope(&buf, 2).len(), 8);
    }

    #[test]
    fn decimation_keeps_first_pair_of_each_stride() {
        // Pairs: (0x90,0x80) then (0x80,0x80) repeating; at d=1 only even pairs (index 0,2,..)
        // survive, all of which are the non-zero pair.
        let mut buf = Vec::new();
        for _ in 0..8 {
            buf.extend_from_slice(&[0x90, 0x80]);
            buf.extend_from_slice(&[0x80, 0x80]);
        }
        let env = detect_envelope(&buf, 1);
        assert!(env.iter().all(|&v| v == 16 * 16));
    }
}
