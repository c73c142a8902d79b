// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shape classifier.
//!
//! Maps a [`TypeDescriptor`] to exactly one [`Shape`]. First match wins:
//!
//! 1. custom hooks declared -> `Custom` (all three hooks required)
//! 2. string, date/time, GUID -> dedicated shapes
//! 3. fieldless enum -> `Enum(underlying)`
//! 4. primitive numeric/bool/decimal -> `Primitive`
//! 5. `Option<T>` -> `Nullable`, `Box<T>` -> `Boxed`
//! 6. `Vec<T>` -> `PrimitiveArray` when `T` is a packable primitive, else `Array`
//! 7. maps -> `Map`
//! 8. [`Dynamic`](crate::Dynamic) -> `Dynamic`
//! 9. struct -> `Structured` (declaration order)
//!
//! Composite shapes reference member *descriptors*, not member shapes, so a
//! recursive type classifies in finite time. Member shapes are cached in their
//! own descriptors.

use std::fmt;
use std::sync::Arc;

use crate::error::{CodecError, CodecResult};
use crate::routines::custom::ErasedHooks;
use crate::types::access::{BoxAccess, EnumAccess, FieldAccess, MapAccess, NullableAccess, SeqAccess};
use crate::types::{TypeDescriptor, TypeKind};
use crate::wire::primitive::PrimitiveKind;

/// Field of a `Structured` shape with its descriptor resolved.
#[derive(Clone)]
pub struct ShapeField {
    pub name: &'static str,
    pub id: u64,
    pub descriptor: Arc<TypeDescriptor>,
    pub(crate) access: Arc<dyn FieldAccess>,
}

/// Codec classification of a type.
#[derive(Clone)]
pub enum Shape {
    Primitive(PrimitiveKind),
    String,
    DateTime,
    Guid,
    Enum {
        underlying: PrimitiveKind,
        access: Arc<dyn EnumAccess>,
    },
    Nullable {
        inner: Arc<TypeDescriptor>,
        access: Arc<dyn NullableAccess>,
    },
    Boxed {
        inner: Arc<TypeDescriptor>,
        access: Arc<dyn BoxAccess>,
    },
    PrimitiveArray(PrimitiveKind),
    Array {
        element: Arc<TypeDescriptor>,
        access: Arc<dyn SeqAccess>,
    },
    Map {
        key: Arc<TypeDescriptor>,
        value: Arc<TypeDescriptor>,
        access: Arc<dyn MapAccess>,
    },
    Custom(Arc<dyn ErasedHooks>),
    Structured(Arc<[ShapeField]>),
    Dynamic,
}

impl Shape {
    pub fn label(&self) -> &'static str {
        match self {
            Shape::Primitive(_) => "Primitive",
            Shape::String => "String",
            Shape::DateTime => "DateTime",
            Shape::Guid => "Guid",
            Shape::Enum { .. } => "Enum",
            Shape::Nullable { .. } => "Nullable",
            Shape::Boxed { .. } => "Boxed",
            Shape::PrimitiveArray(_) => "PrimitiveArray",
            Shape::Array { .. } => "Array",
            Shape::Map { .. } => "Map",
            Shape::Custom(_) => "Custom",
            Shape::Structured(_) => "Structured",
            Shape::Dynamic => "Dynamic",
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Primitive(kind) => write!(f, "Primitive({:?})", kind),
            Shape::Enum { underlying, .. } => write!(f, "Enum({:?})", underlying),
            Shape::Nullable { inner, .. } => write!(f, "Nullable({})", inner.name()),
            Shape::Boxed { inner, .. } => write!(f, "Boxed({})", inner.name()),
            Shape::PrimitiveArray(kind) => write!(f, "PrimitiveArray({:?})", kind),
            Shape::Array { element, .. } => write!(f, "Array({})", element.name()),
            Shape::Map { key, value, .. } => write!(f, "Map({}, {})", key.name(), value.name()),
            Shape::Structured(fields) => {
                let names: Vec<_> = fields.iter().map(|field| field.name).collect();
                write!(f, "Structured({:?})", names)
            }
            other => f.write_str(other.label()),
        }
    }
}

fn is_integer(kind: PrimitiveKind) -> bool {
    !matches!(
        kind,
        PrimitiveKind::Bool | PrimitiveKind::F32 | PrimitiveKind::F64 | PrimitiveKind::Decimal
    )
}

/// Classify a descriptor. Deterministic; configuration errors are not cached.
pub fn classify(desc: &TypeDescriptor) -> CodecResult<Shape> {
    if let Some(hooks) = desc.custom() {
        if let Some(hook) = hooks.missing() {
            return Err(CodecError::MissingCustomHook {
                type_name: desc.name(),
                hook,
            });
        }
        return Ok(Shape::Custom(Arc::clone(hooks)));
    }

    let shape = match desc.kind() {
        TypeKind::String => Shape::String,
        TypeKind::DateTime => Shape::DateTime,
        TypeKind::Guid => Shape::Guid,
        TypeKind::Enum(decl) => {
            if !is_integer(decl.underlying) {
                return Err(CodecError::UnsupportedType {
                    type_name: desc.name(),
                    reason: format!("enum over non-integer kind {:?}", decl.underlying),
                });
            }
            Shape::Enum {
                underlying: decl.underlying,
                access: Arc::clone(&decl.access),
            }
        }
        TypeKind::Primitive(kind) => Shape::Primitive(*kind),
        TypeKind::Nullable(decl) => Shape::Nullable {
            inner: (decl.inner)(),
            access: Arc::clone(&decl.access),
        },
        TypeKind::Boxed(decl) => Shape::Boxed {
            inner: (decl.inner)(),
            access: Arc::clone(&decl.access),
        },
        TypeKind::Sequence(decl) => {
            let element = (decl.element)();
            match element.kind() {
                TypeKind::Primitive(kind)
                    if element.custom().is_none() && kind.array_code().is_some() =>
                {
                    Shape::PrimitiveArray(*kind)
                }
                _ => Shape::Array {
                    element,
                    access: Arc::clone(&decl.access),
                },
            }
        }
        TypeKind::Map(decl) => Shape::Map {
            key: (decl.key)(),
            value: (decl.value)(),
            access: Arc::clone(&decl.access),
        },
        TypeKind::Dynamic => Shape::Dynamic,
        TypeKind::Struct(fields) => Shape::Structured(
            fields
                .iter()
                .map(|field| ShapeField {
                    name: field.name(),
                    id: field.id(),
                    descriptor: field.descriptor(),
                    access: Arc::clone(field.access()),
                })
                .collect(),
        ),
        TypeKind::Unsupported(reason) => {
            return Err(CodecError::UnsupportedType {
                type_name: desc.name(),
                reason: reason.clone(),
            })
        }
    };
    Ok(shape)
}

/// Cached shape of a descriptor, classified on first use.
pub fn shape_of(desc: &TypeDescriptor) -> CodecResult<&Shape> {
    if let Some(shape) = desc.shape.get() {
        return Ok(shape);
    }
    let shape = classify(desc)?;
    Ok(desc.shape.get_or_init(|| shape))
}
