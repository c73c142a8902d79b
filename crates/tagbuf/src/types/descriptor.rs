// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the codec's view of a Rust type.
//!
//! A [`TypeDescriptor`] pairs a `TypeId` with the type's raw declaration
//! ([`TypeKind`]) and, optionally, user-supplied custom hooks. Child types
//! are referenced through [`ChildFn`] so that describing a recursive type
//! never recurses; the child descriptor is fetched when the shape is first
//! classified.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::access::{
    BoxAccess, EnumAccess, FieldAccess, MapAccess, NullableAccess, SeqAccess, TypedEnum,
    TypedField,
};
use super::Describe;
use crate::routines::custom::{CustomHooks, ErasedHooks};
use crate::shape::Shape;
use crate::wire::field_id;
use crate::wire::primitive::PrimitiveKind;

/// Lazily resolved child descriptor.
pub type ChildFn = fn() -> Arc<TypeDescriptor>;

/// Raw declaration of a type, before classification.
pub enum TypeKind {
    Primitive(PrimitiveKind),
    String,
    DateTime,
    Guid,
    Enum(EnumDecl),
    Nullable(NullableDecl),
    /// Owning pointer, wire-transparent.
    Boxed(BoxDecl),
    Sequence(SeqDecl),
    Map(MapDecl),
    Dynamic,
    /// Ordered field list (declaration order).
    Struct(Vec<FieldDescriptor>),
    /// No decomposition path; classification fails with this reason.
    Unsupported(String),
}

impl TypeKind {
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Primitive(_) => "primitive",
            TypeKind::String => "string",
            TypeKind::DateTime => "datetime",
            TypeKind::Guid => "guid",
            TypeKind::Enum(_) => "enum",
            TypeKind::Nullable(_) => "nullable",
            TypeKind::Boxed(_) => "boxed",
            TypeKind::Sequence(_) => "sequence",
            TypeKind::Map(_) => "map",
            TypeKind::Dynamic => "dynamic",
            TypeKind::Struct(_) => "struct",
            TypeKind::Unsupported(_) => "unsupported",
        }
    }
}

/// Fieldless enum over an integer kind.
pub struct EnumDecl {
    pub(crate) underlying: PrimitiveKind,
    pub(crate) access: Arc<dyn EnumAccess>,
}

impl EnumDecl {
    pub fn new<E: Describe>(
        underlying: PrimitiveKind,
        to_raw: fn(&E) -> i64,
        from_raw: fn(i64) -> Option<E>,
    ) -> Self {
        Self {
            underlying,
            access: Arc::new(TypedEnum { to_raw, from_raw }),
        }
    }

    pub fn underlying(&self) -> PrimitiveKind {
        self.underlying
    }
}

pub struct NullableDecl {
    pub(crate) inner: ChildFn,
    pub(crate) access: Arc<dyn NullableAccess>,
}

impl NullableDecl {
    pub fn new(inner: ChildFn, access: Arc<dyn NullableAccess>) -> Self {
        Self { inner, access }
    }
}

pub struct BoxDecl {
    pub(crate) inner: ChildFn,
    pub(crate) access: Arc<dyn BoxAccess>,
}

impl BoxDecl {
    pub fn new(inner: ChildFn, access: Arc<dyn BoxAccess>) -> Self {
        Self { inner, access }
    }
}

pub struct SeqDecl {
    pub(crate) element: ChildFn,
    pub(crate) access: Arc<dyn SeqAccess>,
}

impl SeqDecl {
    pub fn new(element: ChildFn, access: Arc<dyn SeqAccess>) -> Self {
        Self { element, access }
    }
}

pub struct MapDecl {
    pub(crate) key: ChildFn,
    pub(crate) value: ChildFn,
    pub(crate) access: Arc<dyn MapAccess>,
}

impl MapDecl {
    pub fn new(key: ChildFn, value: ChildFn, access: Arc<dyn MapAccess>) -> Self {
        Self { key, value, access }
    }
}

/// One field of a structured type.
pub struct FieldDescriptor {
    name: &'static str,
    id: u64,
    ty: ChildFn,
    access: Arc<dyn FieldAccess>,
}

impl FieldDescriptor {
    /// Field whose wire id is the FNV-1a 64 hash of `name`.
    pub fn new<S: Describe, F: Describe>(
        name: &'static str,
        get: fn(&S) -> &F,
        get_mut: fn(&mut S) -> &mut F,
    ) -> Self {
        Self::with_id(name, field_id(name), get, get_mut)
    }

    /// Field with a precomputed wire id (used by the derive).
    pub fn with_id<S: Describe, F: Describe>(
        name: &'static str,
        id: u64,
        get: fn(&S) -> &F,
        get_mut: fn(&mut S) -> &mut F,
    ) -> Self {
        Self {
            name,
            id,
            ty: super::descriptor_of::<F>,
            access: Arc::new(TypedField { get, get_mut }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn descriptor(&self) -> Arc<TypeDescriptor> {
        (self.ty)()
    }

    pub(crate) fn access(&self) -> &Arc<dyn FieldAccess> {
        &self.access
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("id", &format_args!("{:#018x}", self.id))
            .finish()
    }
}

fn reset_value<T: Describe>(value: &mut dyn std::any::Any) {
    if let Some(slot) = value.downcast_mut::<T>() {
        *slot = T::default();
    }
}

fn boxed_default<T: Describe>() -> Box<dyn std::any::Any + Send + Sync> {
    Box::new(T::default())
}

/// Descriptor of one Rust type. One instance per type per process.
pub struct TypeDescriptor {
    type_id: TypeId,
    name: &'static str,
    kind: TypeKind,
    custom: Option<Arc<dyn ErasedHooks>>,
    reset: fn(&mut dyn std::any::Any),
    new_default: fn() -> Box<dyn std::any::Any + Send + Sync>,
    pub(crate) shape: OnceLock<Shape>,
}

impl TypeDescriptor {
    pub fn new<T: Describe>(kind: TypeKind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind,
            custom: None,
            reset: reset_value::<T>,
            new_default: boxed_default::<T>,
            shape: OnceLock::new(),
        }
    }

    /// Override the reported type name.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Attach user size/write/read hooks; they take precedence over `kind`.
    #[must_use]
    pub fn with_custom<T: Describe>(mut self, hooks: CustomHooks<T>) -> Self {
        debug_assert_eq!(self.type_id, TypeId::of::<T>(), "hooks for another type");
        self.custom = Some(Arc::new(hooks));
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub(crate) fn custom(&self) -> Option<&Arc<dyn ErasedHooks>> {
        self.custom.as_ref()
    }

    /// Reset `value` to the type's default (no-op on a type mismatch).
    pub fn reset(&self, value: &mut dyn std::any::Any) {
        (self.reset)(value);
    }

    pub fn new_default(&self) -> Box<dyn std::any::Any + Send + Sync> {
        (self.new_default)()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind.label())
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
