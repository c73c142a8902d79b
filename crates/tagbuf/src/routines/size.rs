// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Size-counter family.

use std::any::{type_name, Any};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::plan::{Plan, StructPlan};
use super::SizeCounter;
use crate::config::{
    DATETIME_SIZE, EMPTY_SIZE, FIELD_ID_SIZE, GUID_SIZE, LENGTH_PREFIX_SIZE, TAG_SIZE,
};
use crate::error::{CodecError, CodecResult};
use crate::registry::Registry;
use crate::types::Dynamic;
use crate::wire::primitive::{with_primitive, Primitive, PrimitiveKind};
use crate::wire::timestamp;

pub(crate) fn cast<'a, T: Any>(value: &'a dyn Any) -> CodecResult<&'a T> {
    value.downcast_ref::<T>().ok_or(CodecError::TypeMismatch {
        expected: type_name::<T>(),
    })
}

fn primitive_size<P: Primitive>(value: &dyn Any) -> CodecResult<usize> {
    if cast::<P>(value)?.is_empty() {
        Ok(EMPTY_SIZE)
    } else {
        Ok(TAG_SIZE + P::KIND.width())
    }
}

fn packed_size<P: Primitive>(value: &dyn Any) -> CodecResult<usize> {
    let items = cast::<Vec<P>>(value)?;
    if items.is_empty() {
        Ok(EMPTY_SIZE)
    } else {
        Ok(TAG_SIZE + LENGTH_PREFIX_SIZE + items.len() * P::KIND.width())
    }
}

/// Size of an enum or any raw integer written with `kind`'s tag.
pub(crate) fn raw_int_size(raw: i64, kind: PrimitiveKind) -> usize {
    if raw == 0 {
        EMPTY_SIZE
    } else {
        TAG_SIZE + kind.width()
    }
}

pub(crate) struct SizeRoutine {
    plan: Arc<Plan>,
}

impl SizeRoutine {
    pub(crate) fn new(plan: Arc<Plan>) -> Self {
        Self { plan }
    }
}

impl SizeCounter for SizeRoutine {
    fn count_size(&self, value: &dyn Any, registry: &Registry) -> CodecResult<usize> {
        match &*self.plan {
            Plan::Primitive(kind) => with_primitive!(*kind, P => primitive_size::<P>(value)),
            Plan::Enum { underlying, access } => {
                Ok(raw_int_size(access.to_raw(value)?, *underlying))
            }
            Plan::String => {
                let text = cast::<String>(value)?;
                if text.is_empty() {
                    Ok(EMPTY_SIZE)
                } else {
                    Ok(TAG_SIZE + LENGTH_PREFIX_SIZE + text.len())
                }
            }
            Plan::Guid => {
                if cast::<Uuid>(value)?.is_nil() {
                    Ok(EMPTY_SIZE)
                } else {
                    Ok(TAG_SIZE + GUID_SIZE)
                }
            }
            Plan::DateTime => {
                if timestamp::is_empty(cast::<DateTime<Utc>>(value)?) {
                    Ok(EMPTY_SIZE)
                } else {
                    Ok(TAG_SIZE + DATETIME_SIZE)
                }
            }
            Plan::Nullable { inner, access } => match access.inner(value)? {
                Some(inner_value) => inner.get().count_size(inner_value, registry),
                None => Ok(EMPTY_SIZE),
            },
            Plan::Boxed { inner, access } => inner.get().count_size(access.inner(value)?, registry),
            Plan::PrimitiveArray(kind) => with_primitive!(*kind, P => packed_size::<P>(value)),
            Plan::Array { element, access } => {
                if access.len(value)? == 0 {
                    return Ok(EMPTY_SIZE);
                }
                let routines = element.get();
                let mut total = TAG_SIZE + 2 * LENGTH_PREFIX_SIZE;
                access.for_each(value, &mut |item| {
                    total += routines.count_size(item, registry)?;
                    Ok(())
                })?;
                Ok(total)
            }
            Plan::Map {
                key,
                value: item,
                access,
            } => {
                if access.len(value)? == 0 {
                    return Ok(EMPTY_SIZE);
                }
                let (key, item) = (key.get(), item.get());
                let mut total = TAG_SIZE + 2 * LENGTH_PREFIX_SIZE;
                access.for_each(value, &mut |k, v| {
                    total += key.count_size(k, registry)? + item.count_size(v, registry)?;
                    Ok(())
                })?;
                Ok(total)
            }
            Plan::Structured(plan) => structured_size(plan, value, registry),
            Plan::Dynamic => match cast::<Dynamic>(value)?.parts() {
                Some((held, desc)) => registry.routines_for(desc)?.count_size(held, registry),
                None => Ok(EMPTY_SIZE),
            },
        }
    }

    fn is_empty(&self, value: &dyn Any, registry: &Registry) -> CodecResult<bool> {
        match &*self.plan {
            Plan::Primitive(kind) => with_primitive!(*kind, P => Ok(cast::<P>(value)?.is_empty())),
            Plan::Enum { access, .. } => Ok(access.to_raw(value)? == 0),
            Plan::String => Ok(cast::<String>(value)?.is_empty()),
            Plan::Guid => Ok(cast::<Uuid>(value)?.is_nil()),
            Plan::DateTime => Ok(timestamp::is_empty(cast::<DateTime<Utc>>(value)?)),
            Plan::Nullable { inner, access } => match access.inner(value)? {
                Some(inner_value) => inner.get().is_empty(inner_value, registry),
                None => Ok(true),
            },
            Plan::Boxed { inner, access } => inner.get().is_empty(access.inner(value)?, registry),
            Plan::PrimitiveArray(kind) => {
                with_primitive!(*kind, P => Ok(cast::<Vec<P>>(value)?.is_empty()))
            }
            Plan::Array { access, .. } => Ok(access.len(value)? == 0),
            Plan::Map { access, .. } => Ok(access.len(value)? == 0),
            Plan::Structured(plan) => {
                for field in &plan.fields {
                    if !field.routines.get().is_empty(field.access.get(value)?, registry)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Plan::Dynamic => match cast::<Dynamic>(value)?.parts() {
                Some((held, desc)) => registry.routines_for(desc)?.is_empty(held, registry),
                None => Ok(true),
            },
        }
    }
}

fn structured_size(plan: &StructPlan, value: &dyn Any, registry: &Registry) -> CodecResult<usize> {
    let mut body = 0;
    for field in &plan.fields {
        let size = field
            .routines
            .get()
            .count_size(field.access.get(value)?, registry)?;
        // Empty fields are left out of the entry list.
        if size > EMPTY_SIZE {
            body += FIELD_ID_SIZE + size;
        }
    }
    if body == 0 {
        Ok(EMPTY_SIZE)
    } else {
        Ok(TAG_SIZE + 2 * LENGTH_PREFIX_SIZE + body)
    }
}
