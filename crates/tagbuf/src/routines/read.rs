// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reader family.
//!
//! Each reader consumes exactly one encoded value. The leading tag picks the
//! path:
//!
//! - `Empty` resets the target to its default
//! - the target's own family decodes (numbers through the coercion table)
//! - any other known tag is skipped and resets the target
//! - an unknown tag is an integrity error
//!
//! Structured readers only touch the fields present in the input.

use std::any::{type_name, Any};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::plan::{Plan, StructPlan};
use super::Reader;
use crate::config::{FIELD_ID_SIZE, GUID_SIZE, LENGTH_PREFIX_SIZE};
use crate::cursor::ReadCursor;
use crate::error::{CodecError, CodecResult};
use crate::registry::Registry;
use crate::types::{descriptor_of, Dynamic, TypeDescriptor};
use crate::wire::coerce::{element_reader, scalar_reader, Coerce};
use crate::wire::decimal::Decimal;
use crate::wire::primitive::{with_primitive, Primitive, PrimitiveKind};
use crate::wire::timestamp;
use crate::wire::{self, TypeCode};

const EMPTY: u8 = TypeCode::Empty as u8;

fn cast_mut<'a, T: Any>(target: &'a mut dyn Any) -> CodecResult<&'a mut T> {
    target.downcast_mut::<T>().ok_or(CodecError::TypeMismatch {
        expected: type_name::<T>(),
    })
}

/// Composite payload bounds: `[len u32][count u32]...`.
struct Frame {
    end: usize,
    count: usize,
}

/// Open a counted composite whose entries take at least `min_entry` bytes.
fn open_frame(cursor: &mut ReadCursor<'_>, min_entry: usize) -> CodecResult<Frame> {
    cursor.enter()?;
    let len = cursor.read_len()?;
    let end = cursor.offset() + len;
    let count = cursor.read_count(len.saturating_sub(LENGTH_PREFIX_SIZE) / min_entry)?;
    Ok(Frame { end, count })
}

fn close_frame(cursor: &mut ReadCursor<'_>, frame: &Frame) -> CodecResult<()> {
    if cursor.offset() != frame.end {
        return Err(CodecError::MalformedPayload {
            offset: cursor.offset(),
            reason: format!(
                "entries end at {} but the length prefix announces {}",
                cursor.offset(),
                frame.end
            ),
        });
    }
    cursor.leave();
    Ok(())
}

/// One tagged scalar coerced to `P`; foreign tags give the default.
fn read_tagged_scalar<P: Primitive>(code: u8, cursor: &mut ReadCursor<'_>) -> CodecResult<P> {
    if code == EMPTY {
        return Ok(P::default());
    }
    match scalar_reader(code) {
        Some(read) => Ok(P::from_scalar(read(cursor)?)),
        None => {
            wire::skip_payload(code, cursor)?;
            Ok(P::default())
        }
    }
}

fn read_primitive<P: Primitive>(
    code: u8,
    cursor: &mut ReadCursor<'_>,
    target: &mut dyn Any,
) -> CodecResult<()> {
    let slot = cast_mut::<P>(target)?;
    *slot = read_tagged_scalar::<P>(code, cursor)?;
    Ok(())
}

fn read_packed<P: Primitive>(
    code: u8,
    cursor: &mut ReadCursor<'_>,
    target: &mut dyn Any,
) -> CodecResult<()> {
    let items = cast_mut::<Vec<P>>(target)?;
    items.clear();

    if code == TypeCode::Array as u8 {
        let frame = open_frame(cursor, 1)?;
        items.reserve(frame.count);
        for _ in 0..frame.count {
            let element = cursor.read_u8()?;
            items.push(read_tagged_scalar::<P>(element, cursor)?);
        }
        return close_frame(cursor, &frame);
    }

    let Some(kind) = PrimitiveKind::from_array_code(code) else {
        return wire::skip_payload(code, cursor);
    };
    let at = cursor.offset();
    let len = cursor.read_len()?;
    if len % kind.width() != 0 {
        return Err(CodecError::MalformedPayload {
            offset: at,
            reason: format!("{} bytes is not a whole number of {:?} elements", len, kind),
        });
    }
    let count = len / kind.width();
    items.reserve(count);
    if kind == P::KIND {
        for _ in 0..count {
            items.push(P::read_le(cursor)?);
        }
    } else {
        let read = element_reader(kind);
        for _ in 0..count {
            items.push(P::from_scalar(read(cursor)?));
        }
    }
    Ok(())
}

/// Natural Rust type for a value decoded into a [`Dynamic`].
fn natural_descriptor(code: u8) -> Option<Arc<TypeDescriptor>> {
    let desc = match TypeCode::from_u8(code)? {
        TypeCode::Boolean => descriptor_of::<bool>(),
        TypeCode::Int8 => descriptor_of::<i8>(),
        TypeCode::UInt8 => descriptor_of::<u8>(),
        TypeCode::Int16 => descriptor_of::<i16>(),
        TypeCode::UInt16 => descriptor_of::<u16>(),
        TypeCode::Int32 => descriptor_of::<i32>(),
        TypeCode::UInt32 => descriptor_of::<u32>(),
        TypeCode::Int64 => descriptor_of::<i64>(),
        TypeCode::UInt64 => descriptor_of::<u64>(),
        TypeCode::Single => descriptor_of::<f32>(),
        TypeCode::Double => descriptor_of::<f64>(),
        TypeCode::Decimal => descriptor_of::<Decimal>(),
        TypeCode::String => descriptor_of::<String>(),
        TypeCode::Guid => descriptor_of::<Uuid>(),
        TypeCode::DateTimeNew | TypeCode::Timestamp => descriptor_of::<DateTime<Utc>>(),
        TypeCode::BooleanArray => descriptor_of::<Vec<bool>>(),
        TypeCode::Int8Array => descriptor_of::<Vec<i8>>(),
        TypeCode::UInt8Array => descriptor_of::<Vec<u8>>(),
        TypeCode::Int16Array => descriptor_of::<Vec<i16>>(),
        TypeCode::UInt16Array => descriptor_of::<Vec<u16>>(),
        TypeCode::Int32Array => descriptor_of::<Vec<i32>>(),
        TypeCode::UInt32Array => descriptor_of::<Vec<u32>>(),
        TypeCode::Int64Array => descriptor_of::<Vec<i64>>(),
        TypeCode::UInt64Array => descriptor_of::<Vec<u64>>(),
        TypeCode::SingleArray => descriptor_of::<Vec<f32>>(),
        TypeCode::DoubleArray => descriptor_of::<Vec<f64>>(),
        TypeCode::Array => descriptor_of::<Vec<Dynamic>>(),
        _ => return None,
    };
    Some(desc)
}

fn read_dynamic(
    cursor: &mut ReadCursor<'_>,
    target: &mut dyn Any,
    registry: &Registry,
) -> CodecResult<()> {
    let slot = cast_mut::<Dynamic>(target)?;
    let code = cursor.peek_u8()?;
    let Some(desc) = natural_descriptor(code) else {
        // Empty, objects, dictionaries and custom payloads carry no type name.
        wire::skip(cursor)?;
        *slot = Dynamic::empty();
        return Ok(());
    };
    let mut value = desc.new_default();
    registry.routines_for(&desc)?.read(cursor, &mut *value, registry)?;
    *slot = Dynamic::from_parts(value, desc);
    Ok(())
}

fn read_structured(
    plan: &StructPlan,
    cursor: &mut ReadCursor<'_>,
    target: &mut dyn Any,
    registry: &Registry,
) -> CodecResult<()> {
    let frame = open_frame(cursor, FIELD_ID_SIZE + 1)?;
    for _ in 0..frame.count {
        let id = cursor.read_u64()?;
        match plan.by_id.get(&id) {
            Some(&index) => {
                let field = &plan.fields[index];
                let slot = field.access.get_mut(target)?;
                field.routines.get().read(cursor, slot, registry)?;
            }
            None => wire::skip(cursor)?,
        }
    }
    close_frame(cursor, &frame)
}

pub(crate) struct ReadRoutine {
    descriptor: Arc<TypeDescriptor>,
    plan: Arc<Plan>,
}

impl ReadRoutine {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor>, plan: Arc<Plan>) -> Self {
        Self { descriptor, plan }
    }

    fn skip_foreign(
        &self,
        code: u8,
        cursor: &mut ReadCursor<'_>,
        target: &mut dyn Any,
    ) -> CodecResult<()> {
        wire::skip_payload(code, cursor)?;
        self.descriptor.reset(target);
        Ok(())
    }

    fn read_tagged(
        &self,
        code: u8,
        cursor: &mut ReadCursor<'_>,
        target: &mut dyn Any,
        registry: &Registry,
    ) -> CodecResult<()> {
        match &*self.plan {
            Plan::Primitive(kind) => {
                with_primitive!(*kind, P => read_primitive::<P>(code, cursor, target))
            }
            Plan::Enum { access, .. } => match scalar_reader(code) {
                Some(read) => access.set_raw(target, i64::from_scalar(read(cursor)?)),
                None => self.skip_foreign(code, cursor, target),
            },
            Plan::String if code == TypeCode::String as u8 => {
                let len = cursor.read_len()?;
                let at = cursor.offset();
                let text = std::str::from_utf8(cursor.read_bytes(len)?)
                    .map_err(|_| CodecError::InvalidUtf8 { offset: at })?;
                let slot = cast_mut::<String>(target)?;
                slot.clear();
                slot.push_str(text);
                Ok(())
            }
            Plan::Guid if code == TypeCode::Guid as u8 => {
                let mut raw = [0u8; GUID_SIZE];
                raw.copy_from_slice(cursor.read_bytes(GUID_SIZE)?);
                *cast_mut::<Uuid>(target)? = Uuid::from_bytes(raw);
                Ok(())
            }
            Plan::DateTime if code == TypeCode::Timestamp as u8 => {
                *cast_mut::<DateTime<Utc>>(target)? = timestamp::read(cursor)?;
                Ok(())
            }
            // Other numeric tags carry microseconds
            Plan::DateTime => match scalar_reader(code) {
                Some(read) => {
                    let micros = i64::from_scalar(read(cursor)?);
                    *cast_mut::<DateTime<Utc>>(target)? =
                        timestamp::from_micros_saturating(micros);
                    Ok(())
                }
                None => self.skip_foreign(code, cursor, target),
            },
            Plan::PrimitiveArray(kind) => {
                with_primitive!(*kind, P => read_packed::<P>(code, cursor, target))
            }
            Plan::Array { element, access } if code == TypeCode::Array as u8 => {
                let frame = open_frame(cursor, 1)?;
                access.reset(target, frame.count)?;
                let routines = element.get();
                for _ in 0..frame.count {
                    let slot = access.push_default(target)?;
                    routines.read(cursor, slot, registry)?;
                }
                close_frame(cursor, &frame)
            }
            Plan::Map {
                key,
                value: item,
                access,
            } if code == TypeCode::Dictionary as u8 => {
                let frame = open_frame(cursor, 2)?;
                access.clear(target)?;
                let (key, item) = (key.get(), item.get());
                for _ in 0..frame.count {
                    access.insert_with(target, &mut |k, v| {
                        key.read(cursor, k, registry)?;
                        item.read(cursor, v, registry)
                    })?;
                }
                close_frame(cursor, &frame)
            }
            Plan::Structured(plan) if code == TypeCode::Object as u8 => {
                read_structured(plan, cursor, target, registry)
            }
            _ => self.skip_foreign(code, cursor, target),
        }
    }
}

impl Reader for ReadRoutine {
    fn read(
        &self,
        cursor: &mut ReadCursor<'_>,
        target: &mut dyn Any,
        registry: &Registry,
    ) -> CodecResult<()> {
        match &*self.plan {
            // Transparent and open shapes look at the tag without consuming it.
            Plan::Boxed { inner, access } => {
                inner.get().read(cursor, access.inner_mut(target)?, registry)
            }
            Plan::Nullable { inner, access } => {
                if cursor.peek_u8()? == EMPTY {
                    cursor.advance(1)?;
                    return access.set_none(target);
                }
                inner
                    .get()
                    .read(cursor, access.inner_or_default(target)?, registry)
            }
            Plan::Dynamic => read_dynamic(cursor, target, registry),
            Plan::Enum { access, .. } => {
                let code = cursor.read_u8()?;
                if code == EMPTY {
                    return access.set_raw(target, 0);
                }
                self.read_tagged(code, cursor, target, registry)
            }
            _ => {
                let code = cursor.read_u8()?;
                if code == EMPTY {
                    self.descriptor.reset(target);
                    return Ok(());
                }
                self.read_tagged(code, cursor, target, registry)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_as<T: crate::Describe>(bytes: &[u8]) -> CodecResult<T> {
        let registry = Registry::new();
        let routines = registry.routines::<T>()?;
        let mut cursor = ReadCursor::new(bytes);
        let mut value = T::default();
        routines.read(&mut cursor, &mut value, &registry)?;
        Ok(value)
    }

    #[test]
    fn test_foreign_tag_is_skipped_to_default() {
        // String "ab" read as i32.
        let bytes = [TypeCode::String as u8, 2, 0, 0, 0, b'a', b'b'];
        assert_eq!(read_as::<i32>(&bytes).expect("tolerated"), 0);
    }

    #[test]
    fn test_unknown_tag_is_integrity_error() {
        let err = read_as::<i32>(&[0xEE]).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownTypeCode {
                offset: 0,
                code: 0xEE
            }
        );
    }

    #[test]
    fn test_packed_length_must_divide_width() {
        let bytes = [TypeCode::Int32Array as u8, 3, 0, 0, 0, 1, 2, 3];
        let err = read_as::<Vec<i32>>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { offset: 1, .. }));
    }

    #[test]
    fn test_packed_other_kind_is_coerced() {
        let bytes = [TypeCode::Int16Array as u8, 4, 0, 0, 0, 0xFF, 0xFF, 7, 0];
        assert_eq!(read_as::<Vec<i64>>(&bytes).expect("coerced"), vec![-1, 7]);
    }

    #[test]
    fn test_generic_array_into_packed_target() {
        // [Array][len 7][count 2][Int8 5][Empty]
        let bytes = [2, 7, 0, 0, 0, 2, 0, 0, 0, 3, 5, 0];
        assert_eq!(read_as::<Vec<u32>>(&bytes).expect("elementwise"), vec![5, 0]);
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [TypeCode::String as u8, 1, 0, 0, 0, 0xFF];
        let err = read_as::<String>(&bytes).unwrap_err();
        assert_eq!(err, CodecError::InvalidUtf8 { offset: 5 });
    }

    #[test]
    fn test_array_length_mismatch_is_malformed() {
        // Length says 6 but the single element only uses 5 of them.
        let bytes = [2, 6, 0, 0, 0, 1, 0, 0, 0, 0, 0];
        let err = read_as::<Vec<String>>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { .. }));
    }

    #[test]
    fn test_dynamic_reads_natural_type() {
        let bytes = [TypeCode::UInt16 as u8, 0x34, 0x12];
        let value = read_as::<Dynamic>(&bytes).expect("dynamic");
        assert_eq!(value.downcast_ref::<u16>(), Some(&0x1234));
    }
}
