// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Numeric coercion matrix.
//!
//! A scalar is decoded with the producer's tag into a [`Scalar`], then
//! converted to the consumer's kind through [`Coerce`]. The matrix is total:
//!
//! | from \ to | integer | float | decimal | bool |
//! |-----------|---------|-------|---------|------|
//! | integer | wrapping cast | nearest | exact | non-zero |
//! | float | saturating, NaN -> 0 | cast | saturating, NaN -> 0 | non-zero bits |
//! | decimal | truncate, saturate | nearest | identity | non-zero |
//! | bool | 0 / 1 | 0 / 1 | 0 / 1 | identity |
//!
//! `Timestamp` and `DateTimeNew` payloads decode as Int64 microseconds.

use super::decimal::{self, Decimal};
use super::primitive::{Primitive, PrimitiveKind};
use super::timestamp;
use super::TypeCode;
use crate::cursor::ReadCursor;
use crate::error::CodecResult;

/// Decoded scalar carrying the producer's representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
}

/// Total conversion from any [`Scalar`].
pub trait Coerce: Sized + Default {
    fn from_scalar(scalar: Scalar) -> Self;
}

macro_rules! impl_coerce_int {
    ($($type:ty),*) => {$(
        impl Coerce for $type {
            #[inline]
            fn from_scalar(scalar: Scalar) -> Self {
                match scalar {
                    Scalar::Bool(b) => <$type>::from(b),
                    Scalar::Int(v) => v as $type,
                    Scalar::UInt(v) => v as $type,
                    // `as` from float saturates and maps NaN to 0
                    Scalar::Single(v) => v as $type,
                    Scalar::Double(v) => v as $type,
                    Scalar::Decimal(d) => decimal::trunc_i128(&d)
                        .clamp(i128::from(<$type>::MIN), i128::from(<$type>::MAX))
                        as $type,
                }
            }
        }
    )*};
}

impl_coerce_int!(i8, u8, i16, u16, i32, u32, i64, u64);

macro_rules! impl_coerce_float {
    ($($type:ty),*) => {$(
        impl Coerce for $type {
            #[inline]
            fn from_scalar(scalar: Scalar) -> Self {
                match scalar {
                    Scalar::Bool(b) => if b { 1.0 } else { 0.0 },
                    Scalar::Int(v) => v as $type,
                    Scalar::UInt(v) => v as $type,
                    Scalar::Single(v) => v as $type,
                    Scalar::Double(v) => v as $type,
                    Scalar::Decimal(d) => decimal::to_f64(&d) as $type,
                }
            }
        }
    )*};
}

impl_coerce_float!(f32, f64);

impl Coerce for bool {
    fn from_scalar(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => b,
            Scalar::Int(v) => v != 0,
            Scalar::UInt(v) => v != 0,
            Scalar::Single(v) => v.to_bits() != 0,
            Scalar::Double(v) => v.to_bits() != 0,
            Scalar::Decimal(d) => !d.is_zero(),
        }
    }
}

impl Coerce for Decimal {
    fn from_scalar(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => Decimal::from(u64::from(b)),
            Scalar::Int(v) => Decimal::from(v),
            Scalar::UInt(v) => Decimal::from(v),
            Scalar::Single(v) => decimal::from_f64_saturating(f64::from(v)),
            Scalar::Double(v) => decimal::from_f64_saturating(v),
            Scalar::Decimal(d) => d,
        }
    }
}

/// Reads the payload of one scalar tag.
pub type ScalarReader = fn(&mut ReadCursor<'_>) -> CodecResult<Scalar>;

fn read_bool(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Bool(c.read_u8()? != 0))
}
fn read_i8(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Int(i64::from(c.read_i8()?)))
}
fn read_u8(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::UInt(u64::from(c.read_u8()?)))
}
fn read_i16(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Int(i64::from(c.read_i16()?)))
}
fn read_u16(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::UInt(u64::from(c.read_u16()?)))
}
fn read_i32(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Int(i64::from(c.read_i32()?)))
}
fn read_u32(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::UInt(u64::from(c.read_u32()?)))
}
fn read_i64(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Int(c.read_i64()?))
}
fn read_u64(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::UInt(c.read_u64()?))
}
fn read_f32(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Single(c.read_f32()?))
}
fn read_f64(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Double(c.read_f64()?))
}
fn read_decimal(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Decimal(<Decimal as Primitive>::read_le(c)?))
}
fn read_timestamp(c: &mut ReadCursor<'_>) -> CodecResult<Scalar> {
    Ok(Scalar::Int(timestamp::to_micros(&timestamp::read(c)?)))
}

const fn build_scalar_readers() -> [Option<ScalarReader>; 256] {
    let mut table: [Option<ScalarReader>; 256] = [None; 256];
    table[TypeCode::Boolean as usize] = Some(read_bool);
    table[TypeCode::Int8 as usize] = Some(read_i8);
    table[TypeCode::UInt8 as usize] = Some(read_u8);
    table[TypeCode::Int16 as usize] = Some(read_i16);
    table[TypeCode::UInt16 as usize] = Some(read_u16);
    table[TypeCode::Int32 as usize] = Some(read_i32);
    table[TypeCode::UInt32 as usize] = Some(read_u32);
    table[TypeCode::Int64 as usize] = Some(read_i64);
    table[TypeCode::UInt64 as usize] = Some(read_u64);
    table[TypeCode::Single as usize] = Some(read_f32);
    table[TypeCode::Double as usize] = Some(read_f64);
    table[TypeCode::Decimal as usize] = Some(read_decimal);
    table[TypeCode::DateTimeNew as usize] = Some(read_i64);
    table[TypeCode::Timestamp as usize] = Some(read_timestamp);
    table
}

/// Scalar decode table indexed by tag byte.
static SCALAR_READERS: [Option<ScalarReader>; 256] = build_scalar_readers();

#[inline]
pub fn scalar_reader(code: u8) -> Option<ScalarReader> {
    SCALAR_READERS[usize::from(code)]
}

/// Reader for one element of a packed array of `kind`.
pub fn element_reader(kind: PrimitiveKind) -> ScalarReader {
    match kind {
        PrimitiveKind::Bool => read_bool,
        PrimitiveKind::I8 => read_i8,
        PrimitiveKind::U8 => read_u8,
        PrimitiveKind::I16 => read_i16,
        PrimitiveKind::U16 => read_u16,
        PrimitiveKind::I32 => read_i32,
        PrimitiveKind::U32 => read_u32,
        PrimitiveKind::I64 => read_i64,
        PrimitiveKind::U64 => read_u64,
        PrimitiveKind::F32 => read_f32,
        PrimitiveKind::F64 => read_f64,
        PrimitiveKind::Decimal => read_decimal,
    }
}
