// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled shapes.
//!
//! A [`Plan`] is a [`Shape`] whose member descriptors have been replaced by
//! routine references obtained from the build closure. Size, write and read
//! routines of one type share the same plan.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CodecError, CodecResult};
use crate::registry::closure::{BuildClosure, RoutineRef};
use crate::shape::Shape;
use crate::types::access::{BoxAccess, EnumAccess, FieldAccess, MapAccess, NullableAccess, SeqAccess};
use crate::types::TypeDescriptor;
use crate::wire::primitive::PrimitiveKind;

pub(crate) struct FieldPlan {
    pub(crate) id: u64,
    pub(crate) routines: RoutineRef,
    pub(crate) access: Arc<dyn FieldAccess>,
}

pub(crate) struct StructPlan {
    pub(crate) fields: Vec<FieldPlan>,
    /// Field id -> index in `fields`.
    pub(crate) by_id: HashMap<u64, usize>,
}

pub(crate) enum Plan {
    Primitive(PrimitiveKind),
    Enum {
        underlying: PrimitiveKind,
        access: Arc<dyn EnumAccess>,
    },
    String,
    DateTime,
    Guid,
    Nullable {
        inner: RoutineRef,
        access: Arc<dyn NullableAccess>,
    },
    Boxed {
        inner: RoutineRef,
        access: Arc<dyn BoxAccess>,
    },
    PrimitiveArray(PrimitiveKind),
    Array {
        element: RoutineRef,
        access: Arc<dyn SeqAccess>,
    },
    Map {
        key: RoutineRef,
        value: RoutineRef,
        access: Arc<dyn MapAccess>,
    },
    Structured(StructPlan),
    Dynamic,
}

impl Plan {
    /// Compile `shape`, resolving members through `closure`.
    pub(crate) fn compile(
        desc: &TypeDescriptor,
        shape: &Shape,
        closure: &mut BuildClosure<'_>,
    ) -> CodecResult<Self> {
        let plan = match shape {
            Shape::Primitive(kind) => Plan::Primitive(*kind),
            Shape::String => Plan::String,
            Shape::DateTime => Plan::DateTime,
            Shape::Guid => Plan::Guid,
            Shape::Enum { underlying, access } => Plan::Enum {
                underlying: *underlying,
                access: Arc::clone(access),
            },
            Shape::Nullable { inner, access } => Plan::Nullable {
                inner: closure.resolve(inner)?,
                access: Arc::clone(access),
            },
            Shape::Boxed { inner, access } => Plan::Boxed {
                inner: closure.resolve(inner)?,
                access: Arc::clone(access),
            },
            Shape::PrimitiveArray(kind) => Plan::PrimitiveArray(*kind),
            Shape::Array { element, access } => Plan::Array {
                element: closure.resolve(element)?,
                access: Arc::clone(access),
            },
            Shape::Map { key, value, access } => Plan::Map {
                key: closure.resolve(key)?,
                value: closure.resolve(value)?,
                access: Arc::clone(access),
            },
            Shape::Structured(fields) => {
                let mut plans = Vec::with_capacity(fields.len());
                let mut by_id = HashMap::with_capacity(fields.len());
                for field in fields.iter() {
                    if by_id.insert(field.id, plans.len()).is_some() {
                        return Err(CodecError::UnsupportedType {
                            type_name: desc.name(),
                            reason: format!("duplicate field id for `{}`", field.name),
                        });
                    }
                    plans.push(FieldPlan {
                        id: field.id,
                        routines: closure.resolve(&field.descriptor)?,
                        access: Arc::clone(&field.access),
                    });
                }
                Plan::Structured(StructPlan {
                    fields: plans,
                    by_id,
                })
            }
            Shape::Dynamic => Plan::Dynamic,
            Shape::Custom(_) => {
                return Err(CodecError::UnsupportedType {
                    type_name: desc.name(),
                    reason: "custom shapes install hooks, not plans".into(),
                })
            }
        };
        Ok(plan)
    }
}
