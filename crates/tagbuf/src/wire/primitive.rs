// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive kinds and their fixed-width encodings.

use super::coerce::Coerce;
use super::decimal::{self, Decimal};
use super::TypeCode;
use crate::config::DECIMAL_SIZE;
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::CodecResult;

/// Primitive numeric, boolean and decimal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
}

impl PrimitiveKind {
    /// Payload width in bytes (tag excluded).
    pub const fn width(self) -> usize {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::I8 | PrimitiveKind::U8 => 1,
            PrimitiveKind::I16 | PrimitiveKind::U16 => 2,
            PrimitiveKind::I32 | PrimitiveKind::U32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::I64 | PrimitiveKind::U64 | PrimitiveKind::F64 => 8,
            PrimitiveKind::Decimal => DECIMAL_SIZE,
        }
    }

    /// Tag written for a single value of this kind.
    pub const fn code(self) -> TypeCode {
        match self {
            PrimitiveKind::Bool => TypeCode::Boolean,
            PrimitiveKind::I8 => TypeCode::Int8,
            PrimitiveKind::U8 => TypeCode::UInt8,
            PrimitiveKind::I16 => TypeCode::Int16,
            PrimitiveKind::U16 => TypeCode::UInt16,
            PrimitiveKind::I32 => TypeCode::Int32,
            PrimitiveKind::U32 => TypeCode::UInt32,
            PrimitiveKind::I64 => TypeCode::Int64,
            PrimitiveKind::U64 => TypeCode::UInt64,
            PrimitiveKind::F32 => TypeCode::Single,
            PrimitiveKind::F64 => TypeCode::Double,
            PrimitiveKind::Decimal => TypeCode::Decimal,
        }
    }

    /// Packed array tag, `None` for decimals (encoded as generic arrays).
    pub const fn array_code(self) -> Option<TypeCode> {
        match self {
            PrimitiveKind::Bool => Some(TypeCode::BooleanArray),
            PrimitiveKind::I8 => Some(TypeCode::Int8Array),
            PrimitiveKind::U8 => Some(TypeCode::UInt8Array),
            PrimitiveKind::I16 => Some(TypeCode::Int16Array),
            PrimitiveKind::U16 => Some(TypeCode::UInt16Array),
            PrimitiveKind::I32 => Some(TypeCode::Int32Array),
            PrimitiveKind::U32 => Some(TypeCode::UInt32Array),
            PrimitiveKind::I64 => Some(TypeCode::Int64Array),
            PrimitiveKind::U64 => Some(TypeCode::UInt64Array),
            PrimitiveKind::F32 => Some(TypeCode::SingleArray),
            PrimitiveKind::F64 => Some(TypeCode::DoubleArray),
            PrimitiveKind::Decimal => None,
        }
    }

    /// Element kind of a packed array tag.
    pub fn from_array_code(code: u8) -> Option<Self> {
        let kind = match TypeCode::from_u8(code)? {
            TypeCode::BooleanArray => PrimitiveKind::Bool,
            TypeCode::Int8Array => PrimitiveKind::I8,
            TypeCode::UInt8Array => PrimitiveKind::U8,
            TypeCode::Int16Array => PrimitiveKind::I16,
            TypeCode::UInt16Array => PrimitiveKind::U16,
            TypeCode::Int32Array => PrimitiveKind::I32,
            TypeCode::UInt32Array => PrimitiveKind::U32,
            TypeCode::Int64Array => PrimitiveKind::I64,
            TypeCode::UInt64Array => PrimitiveKind::U64,
            TypeCode::SingleArray => PrimitiveKind::F32,
            TypeCode::DoubleArray => PrimitiveKind::F64,
            _ => return None,
        };
        Some(kind)
    }
}

/// Rust type backing a [`PrimitiveKind`].
pub trait Primitive: Coerce + Copy + PartialEq + Send + Sync + 'static {
    const KIND: PrimitiveKind;

    /// Zero value, encoded through the empty fast path.
    fn is_empty(&self) -> bool;

    fn write_le(self, cursor: &mut WriteCursor<'_>) -> CodecResult<()>;

    fn read_le(cursor: &mut ReadCursor<'_>) -> CodecResult<Self>;
}

macro_rules! impl_primitive_int {
    ($type:ty, $kind:ident, $write:ident, $read:ident) => {
        impl Primitive for $type {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            #[inline]
            fn is_empty(&self) -> bool {
                *self == 0
            }

            #[inline]
            fn write_le(self, cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
                cursor.$write(self)
            }

            #[inline]
            fn read_le(cursor: &mut ReadCursor<'_>) -> CodecResult<Self> {
                cursor.$read()
            }
        }
    };
}

impl_primitive_int!(i8, I8, write_i8, read_i8);
impl_primitive_int!(u8, U8, write_u8, read_u8);
impl_primitive_int!(i16, I16, write_i16, read_i16);
impl_primitive_int!(u16, U16, write_u16, read_u16);
impl_primitive_int!(i32, I32, write_i32, read_i32);
impl_primitive_int!(u32, U32, write_u32, read_u32);
impl_primitive_int!(i64, I64, write_i64, read_i64);
impl_primitive_int!(u64, U64, write_u64, read_u64);

macro_rules! impl_primitive_float {
    ($type:ty, $kind:ident, $write:ident, $read:ident) => {
        impl Primitive for $type {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            // Bit test keeps -0.0 off the empty path.
            #[inline]
            fn is_empty(&self) -> bool {
                self.to_bits() == 0
            }

            #[inline]
            fn write_le(self, cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
                cursor.$write(self)
            }

            #[inline]
            fn read_le(cursor: &mut ReadCursor<'_>) -> CodecResult<Self> {
                cursor.$read()
            }
        }
    };
}

impl_primitive_float!(f32, F32, write_f32, read_f32);
impl_primitive_float!(f64, F64, write_f64, read_f64);

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;

    fn is_empty(&self) -> bool {
        !*self
    }

    fn write_le(self, cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
        cursor.write_u8(u8::from(self))
    }

    fn read_le(cursor: &mut ReadCursor<'_>) -> CodecResult<Self> {
        Ok(cursor.read_u8()? != 0)
    }
}

impl Primitive for Decimal {
    const KIND: PrimitiveKind = PrimitiveKind::Decimal;

    fn is_empty(&self) -> bool {
        self.is_zero()
    }

    fn write_le(self, cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
        cursor.write_bytes(&decimal::to_wire(&self))
    }

    fn read_le(cursor: &mut ReadCursor<'_>) -> CodecResult<Self> {
        let mut bytes = [0u8; DECIMAL_SIZE];
        bytes.copy_from_slice(cursor.read_bytes(DECIMAL_SIZE)?);
        Ok(decimal::from_wire(bytes))
    }
}

/// Run `$body` with `$t` bound to the Rust type of a [`PrimitiveKind`].
macro_rules! with_primitive {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            $crate::wire::primitive::PrimitiveKind::Bool => {
                type $t = bool;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::I8 => {
                type $t = i8;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::U8 => {
                type $t = u8;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::I16 => {
                type $t = i16;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::U16 => {
                type $t = u16;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::I32 => {
                type $t = i32;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::U32 => {
                type $t = u32;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::I64 => {
                type $t = i64;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::U64 => {
                type $t = u64;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::F32 => {
                type $t = f32;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::F64 => {
                type $t = f64;
                $body
            }
            $crate::wire::primitive::PrimitiveKind::Decimal => {
                type $t = $crate::wire::decimal::Decimal;
                $body
            }
        }
    };
}

pub(crate) use with_primitive;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_codes_map_back() {
        for kind in [
            PrimitiveKind::Bool,
            PrimitiveKind::I8,
            PrimitiveKind::U8,
            PrimitiveKind::I16,
            PrimitiveKind::U16,
            PrimitiveKind::I32,
            PrimitiveKind::U32,
            PrimitiveKind::I64,
            PrimitiveKind::U64,
            PrimitiveKind::F32,
            PrimitiveKind::F64,
        ] {
            let code = kind.array_code().expect("packed kind");
            assert_eq!(PrimitiveKind::from_array_code(code as u8), Some(kind));
        }
        assert_eq!(PrimitiveKind::Decimal.array_code(), None);
        assert_eq!(PrimitiveKind::from_array_code(TypeCode::Array as u8), None);
    }

    #[test]
    fn test_width_matches_layout() {
        let kinds = [PrimitiveKind::Bool, PrimitiveKind::U16, PrimitiveKind::F32, PrimitiveKind::Decimal];
        for kind in kinds {
            assert_eq!(kind.code().layout(), super::super::Layout::Fixed(kind.width()));
        }
    }

    #[test]
    fn test_float_negative_zero_is_not_empty() {
        assert!(0.0f64.is_empty());
        assert!(!(-0.0f64).is_empty());
        assert!(!f32::NAN.is_empty());
    }

    #[test]
    fn test_with_primitive_binds_type() {
        let width = with_primitive!(PrimitiveKind::U16, T => std::mem::size_of::<T>());
        assert_eq!(width, 2);
    }
}
