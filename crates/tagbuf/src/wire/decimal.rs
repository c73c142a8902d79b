// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decimal wire form and saturating conversions.
//!
//! [`Decimal`] is `rust_decimal`'s 96-bit fixed-point type. On the wire it
//! takes 16 bytes: three little-endian u32 words of the magnitude (lo, mid,
//! hi) followed by a flags word holding the scale in bits 16..24 and the sign
//! in bit 31.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
pub use rust_decimal::Decimal;

use crate::config::DECIMAL_SIZE;

/// Largest scale `rust_decimal` accepts.
pub const MAX_SCALE: u32 = 28;

const SCALE_SHIFT: u32 = 16;
const SIGN_BIT: u32 = 1 << 31;

pub fn to_wire(value: &Decimal) -> [u8; DECIMAL_SIZE] {
    let magnitude = value.mantissa().unsigned_abs();
    let mut flags = value.scale() << SCALE_SHIFT;
    if value.is_sign_negative() && !value.is_zero() {
        flags |= SIGN_BIT;
    }
    let mut out = [0u8; DECIMAL_SIZE];
    out[0..4].copy_from_slice(&(magnitude as u32).to_le_bytes());
    out[4..8].copy_from_slice(&((magnitude >> 32) as u32).to_le_bytes());
    out[8..12].copy_from_slice(&((magnitude >> 64) as u32).to_le_bytes());
    out[12..16].copy_from_slice(&flags.to_le_bytes());
    out
}

/// Decode the 16-byte form. Scales above 28 are clamped; any zero is [`Decimal::ZERO`].
pub fn from_wire(bytes: [u8; DECIMAL_SIZE]) -> Decimal {
    let word = |i: usize| {
        let mut w = [0u8; 4];
        w.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
        u32::from_le_bytes(w)
    };
    let (lo, mid, hi, flags) = (word(0), word(1), word(2), word(3));
    if lo | mid | hi == 0 {
        return Decimal::ZERO;
    }
    let scale = ((flags >> SCALE_SHIFT) & 0xFF).min(MAX_SCALE);
    Decimal::from_parts(lo, mid, hi, flags & SIGN_BIT != 0, scale)
}

/// Integer part, truncated toward zero.
pub fn trunc_i128(value: &Decimal) -> i128 {
    value.mantissa() / 10i128.pow(value.scale())
}

pub fn to_f64(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Saturating conversion from a 128-bit integer.
pub fn from_i128_saturating(value: i128) -> Decimal {
    Decimal::try_from_i128_with_scale(value, 0).unwrap_or(if value < 0 {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Conversion from a float: NaN is zero, out-of-range values saturate.
pub fn from_f64_saturating(value: f64) -> Decimal {
    if value.is_nan() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(if value < 0.0 {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}
