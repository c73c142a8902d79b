// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire format, version 1.
//!
//! Every encoded value starts with a one-byte [`TypeCode`]. Each code belongs
//! to a layout family ([`Layout`]) that is enough to step over the value
//! without knowing the type that produced it:
//!
//! | family | codes | payload |
//! |--------|-------|---------|
//! | empty | `Empty` | none |
//! | fixed | primitives, `Guid`, `Timestamp`, `DateTimeNew`, reserved fixed tags | width of the tag |
//! | length-prefixed | `Object`, `Array`, `String`, `*Array`, `Dictionary`, `CustomData`, reserved | u32 byte length, then payload |
//!
//! Composite payloads:
//!
//! ```text
//! Array      [2][len u32][count u32][element]*
//! Dictionary [30][len u32][count u32][key value]*
//! Object     [1][len u32][count u32][(field id u64)(value)]*
//! XArray     [code][len u32][packed little-endian elements]
//! CustomData [35][len u32][user bytes]
//! Timestamp  [36][seconds i64][nanoseconds u32]
//! ```
//!
//! Field ids are FNV-1a 64 of the field's wire name. Empty values (zero,
//! empty string, empty collection, `None`, all-empty struct) encode as the
//! single `Empty` byte.

pub mod coerce;
pub mod decimal;
pub mod primitive;
pub mod timestamp;

use crate::config::{
    DATETIME_MICROS_SIZE, DATETIME_SIZE, DECIMAL_SIZE, FNV_OFFSET_BASIS, FNV_PRIME, GUID_SIZE,
};
use crate::cursor::ReadCursor;
use crate::error::{CodecError, CodecResult};

/// One-byte type tag.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Empty = 0,
    Object = 1,
    Array = 2,
    Int8 = 3,
    UInt8 = 4,
    Int16 = 5,
    UInt16 = 6,
    Int32 = 7,
    UInt32 = 8,
    Int64 = 9,
    UInt64 = 10,
    Single = 11,
    Double = 12,
    Decimal = 13,
    String = 14,
    Guid = 15,
    /// Reserved: enum by name hash.
    Enum = 16,
    Boolean = 17,
    /// Reserved: legacy date/time ticks.
    DateTimeOld = 18,
    Int8Array = 19,
    UInt8Array = 20,
    Int16Array = 21,
    UInt16Array = 22,
    Int32Array = 23,
    UInt32Array = 24,
    Int64Array = 25,
    UInt64Array = 26,
    SingleArray = 27,
    DoubleArray = 28,
    BooleanArray = 29,
    Dictionary = 30,
    /// Microseconds since the Unix epoch, i64. Read only; writers emit `Timestamp`.
    DateTimeNew = 31,
    /// Reserved: back-reference index.
    Reference = 32,
    /// Reserved.
    DateTimeOffset = 33,
    /// Reserved.
    Tuple = 34,
    CustomData = 35,
    /// Seconds and nanoseconds since the Unix epoch.
    Timestamp = 36,
}

const ALL_CODES: [TypeCode; 37] = [
    TypeCode::Empty,
    TypeCode::Object,
    TypeCode::Array,
    TypeCode::Int8,
    TypeCode::UInt8,
    TypeCode::Int16,
    TypeCode::UInt16,
    TypeCode::Int32,
    TypeCode::UInt32,
    TypeCode::Int64,
    TypeCode::UInt64,
    TypeCode::Single,
    TypeCode::Double,
    TypeCode::Decimal,
    TypeCode::String,
    TypeCode::Guid,
    TypeCode::Enum,
    TypeCode::Boolean,
    TypeCode::DateTimeOld,
    TypeCode::Int8Array,
    TypeCode::UInt8Array,
    TypeCode::Int16Array,
    TypeCode::UInt16Array,
    TypeCode::Int32Array,
    TypeCode::UInt32Array,
    TypeCode::Int64Array,
    TypeCode::UInt64Array,
    TypeCode::SingleArray,
    TypeCode::DoubleArray,
    TypeCode::BooleanArray,
    TypeCode::Dictionary,
    TypeCode::DateTimeNew,
    TypeCode::Reference,
    TypeCode::DateTimeOffset,
    TypeCode::Tuple,
    TypeCode::CustomData,
    TypeCode::Timestamp,
];

impl TypeCode {
    pub fn from_u8(code: u8) -> Option<Self> {
        ALL_CODES.get(usize::from(code)).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn layout(self) -> Layout {
        layout(self as u8)
    }
}

/// Layout family of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Unknown,
    Empty,
    Fixed(usize),
    LengthPrefixed,
}

const fn build_layouts() -> [Layout; 256] {
    let mut table = [Layout::Unknown; 256];
    table[TypeCode::Empty as usize] = Layout::Empty;

    table[TypeCode::Int8 as usize] = Layout::Fixed(1);
    table[TypeCode::UInt8 as usize] = Layout::Fixed(1);
    table[TypeCode::Boolean as usize] = Layout::Fixed(1);
    table[TypeCode::Int16 as usize] = Layout::Fixed(2);
    table[TypeCode::UInt16 as usize] = Layout::Fixed(2);
    table[TypeCode::Int32 as usize] = Layout::Fixed(4);
    table[TypeCode::UInt32 as usize] = Layout::Fixed(4);
    table[TypeCode::Single as usize] = Layout::Fixed(4);
    table[TypeCode::Reference as usize] = Layout::Fixed(4);
    table[TypeCode::Int64 as usize] = Layout::Fixed(8);
    table[TypeCode::UInt64 as usize] = Layout::Fixed(8);
    table[TypeCode::Double as usize] = Layout::Fixed(8);
    table[TypeCode::Enum as usize] = Layout::Fixed(8);
    table[TypeCode::DateTimeOld as usize] = Layout::Fixed(DATETIME_MICROS_SIZE);
    table[TypeCode::DateTimeNew as usize] = Layout::Fixed(DATETIME_MICROS_SIZE);
    table[TypeCode::Timestamp as usize] = Layout::Fixed(DATETIME_SIZE);
    table[TypeCode::Decimal as usize] = Layout::Fixed(DECIMAL_SIZE);
    table[TypeCode::Guid as usize] = Layout::Fixed(GUID_SIZE);

    table[TypeCode::Object as usize] = Layout::LengthPrefixed;
    table[TypeCode::Array as usize] = Layout::LengthPrefixed;
    table[TypeCode::String as usize] = Layout::LengthPrefixed;
    table[TypeCode::Dictionary as usize] = Layout::LengthPrefixed;
    table[TypeCode::DateTimeOffset as usize] = Layout::LengthPrefixed;
    table[TypeCode::Tuple as usize] = Layout::LengthPrefixed;
    table[TypeCode::CustomData as usize] = Layout::LengthPrefixed;
    let mut code = TypeCode::Int8Array as usize;
    while code <= TypeCode::BooleanArray as usize {
        table[code] = Layout::LengthPrefixed;
        code += 1;
    }
    table
}

static LAYOUTS: [Layout; 256] = build_layouts();

/// Layout family for any tag byte.
#[inline]
pub fn layout(code: u8) -> Layout {
    LAYOUTS[usize::from(code)]
}

/// Step over one complete value (tag included).
pub fn skip(cursor: &mut ReadCursor<'_>) -> CodecResult<()> {
    let code = cursor.read_u8()?;
    skip_payload(code, cursor)
}

/// Step over the payload of a value whose tag was just consumed.
pub fn skip_payload(code: u8, cursor: &mut ReadCursor<'_>) -> CodecResult<()> {
    match layout(code) {
        Layout::Empty => Ok(()),
        Layout::Fixed(width) => cursor.advance(width),
        Layout::LengthPrefixed => {
            let len = cursor.read_len()?;
            cursor.advance(len)
        }
        Layout::Unknown => Err(CodecError::UnknownTypeCode {
            offset: cursor.offset().saturating_sub(1),
            code,
        }),
    }
}

/// FNV-1a 64 of a field's wire name.
pub const fn field_id(name: &str) -> u64 {
    let bytes = name.as_bytes();
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}
