// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Writer family.
//!
//! Composite writers reserve their length prefix, write children through the
//! member routines, then patch the prefix. Structured writers leave out fields
//! whose value is empty.

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::plan::{Plan, StructPlan};
use super::size::cast;
use super::Writer;
use crate::cursor::WriteCursor;
use crate::error::{CodecError, CodecResult};
use crate::registry::Registry;
use crate::types::Dynamic;
use crate::wire::primitive::{with_primitive, Primitive, PrimitiveKind};
use crate::wire::{timestamp, TypeCode};

#[inline]
fn write_empty(cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
    cursor.write_u8(TypeCode::Empty as u8)
}

fn write_primitive<P: Primitive>(value: &dyn Any, cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
    let value = *cast::<P>(value)?;
    if value.is_empty() {
        return write_empty(cursor);
    }
    cursor.write_u8(P::KIND.code() as u8)?;
    value.write_le(cursor)
}

fn write_packed<P: Primitive>(value: &dyn Any, cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
    let items = cast::<Vec<P>>(value)?;
    if items.is_empty() {
        return write_empty(cursor);
    }
    let Some(code) = P::KIND.array_code() else {
        return Err(CodecError::TypeMismatch {
            expected: "packed primitive array",
        });
    };
    cursor.write_u8(code as u8)?;
    cursor.write_len(items.len() * P::KIND.width())?;
    items.iter().try_for_each(|item| item.write_le(cursor))
}

/// Write `raw` with the tag of integer `kind`, truncating to its width.
pub(crate) fn write_raw_int(
    raw: i64,
    kind: PrimitiveKind,
    cursor: &mut WriteCursor<'_>,
) -> CodecResult<()> {
    if raw == 0 {
        return write_empty(cursor);
    }
    cursor.write_u8(kind.code() as u8)?;
    match kind {
        PrimitiveKind::I8 => cursor.write_i8(raw as i8),
        PrimitiveKind::U8 => cursor.write_u8(raw as u8),
        PrimitiveKind::I16 => cursor.write_i16(raw as i16),
        PrimitiveKind::U16 => cursor.write_u16(raw as u16),
        PrimitiveKind::I32 => cursor.write_i32(raw as i32),
        PrimitiveKind::U32 => cursor.write_u32(raw as u32),
        PrimitiveKind::I64 => cursor.write_i64(raw),
        PrimitiveKind::U64 => cursor.write_u64(raw as u64),
        _ => Err(CodecError::TypeMismatch {
            expected: "integer enum",
        }),
    }
}

pub(crate) struct WriteRoutine {
    plan: Arc<Plan>,
}

impl WriteRoutine {
    pub(crate) fn new(plan: Arc<Plan>) -> Self {
        Self { plan }
    }
}

impl Writer for WriteRoutine {
    fn write(
        &self,
        value: &dyn Any,
        cursor: &mut WriteCursor<'_>,
        registry: &Registry,
    ) -> CodecResult<()> {
        match &*self.plan {
            Plan::Primitive(kind) => with_primitive!(*kind, P => write_primitive::<P>(value, cursor)),
            Plan::Enum { underlying, access } => {
                write_raw_int(access.to_raw(value)?, *underlying, cursor)
            }
            Plan::String => {
                let text = cast::<String>(value)?;
                if text.is_empty() {
                    return write_empty(cursor);
                }
                cursor.write_u8(TypeCode::String as u8)?;
                cursor.write_len(text.len())?;
                cursor.write_bytes(text.as_bytes())
            }
            Plan::Guid => {
                let guid = cast::<Uuid>(value)?;
                if guid.is_nil() {
                    return write_empty(cursor);
                }
                cursor.write_u8(TypeCode::Guid as u8)?;
                cursor.write_bytes(guid.as_bytes())
            }
            Plan::DateTime => {
                let stamp = cast::<DateTime<Utc>>(value)?;
                if timestamp::is_empty(stamp) {
                    return write_empty(cursor);
                }
                cursor.write_u8(TypeCode::Timestamp as u8)?;
                timestamp::write(stamp, cursor)
            }
            Plan::Nullable { inner, access } => match access.inner(value)? {
                Some(inner_value) => inner.get().write(inner_value, cursor, registry),
                None => write_empty(cursor),
            },
            Plan::Boxed { inner, access } => {
                inner.get().write(access.inner(value)?, cursor, registry)
            }
            Plan::PrimitiveArray(kind) => with_primitive!(*kind, P => write_packed::<P>(value, cursor)),
            Plan::Array { element, access } => {
                let count = access.len(value)?;
                if count == 0 {
                    return write_empty(cursor);
                }
                let routines = element.get();
                cursor.write_u8(TypeCode::Array as u8)?;
                let len_at = cursor.reserve_len()?;
                cursor.write_len(count)?;
                access.for_each(value, &mut |item| routines.write(item, cursor, registry))?;
                cursor.patch_len(len_at)
            }
            Plan::Map {
                key,
                value: item,
                access,
            } => {
                let count = access.len(value)?;
                if count == 0 {
                    return write_empty(cursor);
                }
                let (key, item) = (key.get(), item.get());
                cursor.write_u8(TypeCode::Dictionary as u8)?;
                let len_at = cursor.reserve_len()?;
                cursor.write_len(count)?;
                access.for_each(value, &mut |k, v| {
                    key.write(k, cursor, registry)?;
                    item.write(v, cursor, registry)
                })?;
                cursor.patch_len(len_at)
            }
            Plan::Structured(plan) => write_structured(plan, value, cursor, registry),
            Plan::Dynamic => match cast::<Dynamic>(value)?.parts() {
                Some((held, desc)) => registry.routines_for(desc)?.write(held, cursor, registry),
                None => write_empty(cursor),
            },
        }
    }
}

fn write_structured(
    plan: &StructPlan,
    value: &dyn Any,
    cursor: &mut WriteCursor<'_>,
    registry: &Registry,
) -> CodecResult<()> {
    // Header is written on the first non-empty field so an all-empty struct
    // never needs more than its one byte.
    let mut header: Option<(usize, usize)> = None;
    let mut written = 0u32;
    for field in &plan.fields {
        let routines = field.routines.get();
        let field_value = field.access.get(value)?;
        if routines.is_empty(field_value, registry)? {
            continue;
        }
        if header.is_none() {
            cursor.write_u8(TypeCode::Object as u8)?;
            let len_at = cursor.reserve_len()?;
            let count_at = cursor.reserve_len()?;
            header = Some((len_at, count_at));
        }
        cursor.write_u64(field.id)?;
        routines.write(field_value, cursor, registry)?;
        written += 1;
    }

    match header {
        Some((len_at, count_at)) => {
            cursor.patch_u32(count_at, written);
            cursor.patch_len(len_at)
        }
        None => write_empty(cursor),
    }
}
