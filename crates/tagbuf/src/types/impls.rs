// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`Describe`] for standard and well-known types.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::access::{BTreeMapOps, BoxOps, HashMapOps, OptionOps, VecOps};
use super::descriptor::{BoxDecl, MapDecl, NullableDecl, SeqDecl, TypeDescriptor, TypeKind};
use super::dynamic::Dynamic;
use super::{descriptor_of, Describe};
use crate::wire::decimal::Decimal;
use crate::wire::primitive::PrimitiveKind;

macro_rules! describe_primitive {
    ($($type:ty => $kind:ident),* $(,)?) => {$(
        impl Describe for $type {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::new::<Self>(TypeKind::Primitive(PrimitiveKind::$kind))
            }
        }
    )*};
}

describe_primitive!(
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
);

impl Describe for String {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::String)
    }
}

impl Describe for Uuid {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Guid)
    }
}

impl Describe for DateTime<Utc> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::DateTime)
    }
}

impl Describe for Dynamic {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Dynamic)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Nullable(NullableDecl::new(
            descriptor_of::<T>,
            Arc::new(OptionOps::<T>::new()),
        )))
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Boxed(BoxDecl::new(
            descriptor_of::<T>,
            Arc::new(BoxOps::<T>::new()),
        )))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Sequence(SeqDecl::new(
            descriptor_of::<T>,
            Arc::new(VecOps::<T>::new()),
        )))
    }
}

impl<K, V> Describe for HashMap<K, V>
where
    K: Describe + Eq + Hash,
    V: Describe,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Map(MapDecl::new(
            descriptor_of::<K>,
            descriptor_of::<V>,
            Arc::new(HashMapOps::<K, V>::new()),
        )))
    }
}

impl<K, V> Describe for BTreeMap<K, V>
where
    K: Describe + Ord,
    V: Describe,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Map(MapDecl::new(
            descriptor_of::<K>,
            descriptor_of::<V>,
            Arc::new(BTreeMapOps::<K, V>::new()),
        )))
    }
}
