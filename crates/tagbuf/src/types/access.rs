// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased accessors used by the routines.
//!
//! Routines see values as `&dyn Any`. Each composite declaration carries an
//! accessor that knows the concrete Rust type and downcasts once per call.
//! A value of the wrong type yields [`CodecError::TypeMismatch`].

use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::{CodecError, CodecResult};

fn cast<'a, T: Any>(value: &'a dyn Any) -> CodecResult<&'a T> {
    value.downcast_ref::<T>().ok_or(CodecError::TypeMismatch {
        expected: type_name::<T>(),
    })
}

fn cast_mut<'a, T: Any>(value: &'a mut dyn Any) -> CodecResult<&'a mut T> {
    value.downcast_mut::<T>().ok_or(CodecError::TypeMismatch {
        expected: type_name::<T>(),
    })
}

/// Visitor over one element.
pub type ElementVisitor<'v> = dyn FnMut(&dyn Any) -> CodecResult<()> + 'v;
/// Visitor over one key/value pair.
pub type EntryVisitor<'v> = dyn FnMut(&dyn Any, &dyn Any) -> CodecResult<()> + 'v;
/// Filler for a freshly defaulted key/value pair.
pub type EntryFiller<'v> = dyn FnMut(&mut dyn Any, &mut dyn Any) -> CodecResult<()> + 'v;

// ============================================================================
// Structured fields
// ============================================================================

/// Borrow one field out of its owner.
pub trait FieldAccess: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Any) -> CodecResult<&'a dyn Any>;
    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any>;
}

pub(crate) struct TypedField<S, F> {
    pub(crate) get: fn(&S) -> &F,
    pub(crate) get_mut: fn(&mut S) -> &mut F,
}

impl<S: Any, F: Any> FieldAccess for TypedField<S, F> {
    fn get<'a>(&self, owner: &'a dyn Any) -> CodecResult<&'a dyn Any> {
        Ok((self.get)(cast::<S>(owner)?))
    }

    fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any> {
        Ok((self.get_mut)(cast_mut::<S>(owner)?))
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Fieldless enum <-> underlying integer.
pub trait EnumAccess: Send + Sync {
    fn to_raw(&self, value: &dyn Any) -> CodecResult<i64>;
    /// Unknown discriminants leave the enum's default.
    fn set_raw(&self, value: &mut dyn Any, raw: i64) -> CodecResult<()>;
}

pub(crate) struct TypedEnum<E> {
    pub(crate) to_raw: fn(&E) -> i64,
    pub(crate) from_raw: fn(i64) -> Option<E>,
}

impl<E: Any + Default> EnumAccess for TypedEnum<E> {
    fn to_raw(&self, value: &dyn Any) -> CodecResult<i64> {
        Ok((self.to_raw)(cast::<E>(value)?))
    }

    fn set_raw(&self, value: &mut dyn Any, raw: i64) -> CodecResult<()> {
        *cast_mut::<E>(value)? = (self.from_raw)(raw).unwrap_or_default();
        Ok(())
    }
}

// ============================================================================
// Option<T> / Box<T>
// ============================================================================

pub trait NullableAccess: Send + Sync {
    fn inner<'a>(&self, value: &'a dyn Any) -> CodecResult<Option<&'a dyn Any>>;
    fn set_none(&self, value: &mut dyn Any) -> CodecResult<()>;
    /// Inner value, inserting a default first when absent.
    fn inner_or_default<'a>(&self, value: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any>;
}

pub(crate) struct OptionOps<T>(PhantomData<fn() -> T>);

impl<T> OptionOps<T> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Any + Default> NullableAccess for OptionOps<T> {
    fn inner<'a>(&self, value: &'a dyn Any) -> CodecResult<Option<&'a dyn Any>> {
        Ok(cast::<Option<T>>(value)?.as_ref().map(|v| v as &dyn Any))
    }

    fn set_none(&self, value: &mut dyn Any) -> CodecResult<()> {
        *cast_mut::<Option<T>>(value)? = None;
        Ok(())
    }

    fn inner_or_default<'a>(&self, value: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any> {
        Ok(cast_mut::<Option<T>>(value)?.get_or_insert_with(T::default))
    }
}

pub trait BoxAccess: Send + Sync {
    fn inner<'a>(&self, value: &'a dyn Any) -> CodecResult<&'a dyn Any>;
    fn inner_mut<'a>(&self, value: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any>;
}

pub(crate) struct BoxOps<T>(PhantomData<fn() -> T>);

impl<T> BoxOps<T> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Any> BoxAccess for BoxOps<T> {
    fn inner<'a>(&self, value: &'a dyn Any) -> CodecResult<&'a dyn Any> {
        Ok(&**cast::<Box<T>>(value)?)
    }

    fn inner_mut<'a>(&self, value: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any> {
        Ok(&mut **cast_mut::<Box<T>>(value)?)
    }
}

// ============================================================================
// Vec<T>
// ============================================================================

pub trait SeqAccess: Send + Sync {
    fn len(&self, value: &dyn Any) -> CodecResult<usize>;
    fn for_each(&self, value: &dyn Any, visit: &mut ElementVisitor<'_>) -> CodecResult<()>;
    /// Empty the sequence and reserve room for `capacity` elements.
    fn reset(&self, value: &mut dyn Any, capacity: usize) -> CodecResult<()>;
    fn push_default<'a>(&self, value: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any>;
}

pub(crate) struct VecOps<T>(PhantomData<fn() -> T>);

impl<T> VecOps<T> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Any + Default> SeqAccess for VecOps<T> {
    fn len(&self, value: &dyn Any) -> CodecResult<usize> {
        Ok(cast::<Vec<T>>(value)?.len())
    }

    fn for_each(&self, value: &dyn Any, visit: &mut ElementVisitor<'_>) -> CodecResult<()> {
        cast::<Vec<T>>(value)?
            .iter()
            .try_for_each(|item| visit(item))
    }

    fn reset(&self, value: &mut dyn Any, capacity: usize) -> CodecResult<()> {
        let vec = cast_mut::<Vec<T>>(value)?;
        vec.clear();
        vec.reserve(capacity);
        Ok(())
    }

    fn push_default<'a>(&self, value: &'a mut dyn Any) -> CodecResult<&'a mut dyn Any> {
        let vec = cast_mut::<Vec<T>>(value)?;
        vec.push(T::default());
        let last = vec.len() - 1;
        Ok(&mut vec[last])
    }
}

// ============================================================================
// Maps
// ============================================================================

pub trait MapAccess: Send + Sync {
    fn len(&self, value: &dyn Any) -> CodecResult<usize>;
    fn for_each(&self, value: &dyn Any, visit: &mut EntryVisitor<'_>) -> CodecResult<()>;
    fn clear(&self, value: &mut dyn Any) -> CodecResult<()>;
    /// Default a key and a value, let `fill` decode them, then insert.
    fn insert_with(&self, value: &mut dyn Any, fill: &mut EntryFiller<'_>) -> CodecResult<()>;
}

pub(crate) struct HashMapOps<K, V>(PhantomData<fn() -> (K, V)>);

impl<K, V> HashMapOps<K, V> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K, V> MapAccess for HashMapOps<K, V>
where
    K: Any + Default + Eq + Hash,
    V: Any + Default,
{
    fn len(&self, value: &dyn Any) -> CodecResult<usize> {
        Ok(cast::<HashMap<K, V>>(value)?.len())
    }

    fn for_each(&self, value: &dyn Any, visit: &mut EntryVisitor<'_>) -> CodecResult<()> {
        cast::<HashMap<K, V>>(value)?
            .iter()
            .try_for_each(|(k, v)| visit(k, v))
    }

    fn clear(&self, value: &mut dyn Any) -> CodecResult<()> {
        cast_mut::<HashMap<K, V>>(value)?.clear();
        Ok(())
    }

    fn insert_with(&self, value: &mut dyn Any, fill: &mut EntryFiller<'_>) -> CodecResult<()> {
        let map = cast_mut::<HashMap<K, V>>(value)?;
        let mut key = K::default();
        let mut item = V::default();
        fill(&mut key, &mut item)?;
        map.insert(key, item);
        Ok(())
    }
}

pub(crate) struct BTreeMapOps<K, V>(PhantomData<fn() -> (K, V)>);

impl<K, V> BTreeMapOps<K, V> {
    pub(crate) fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K, V> MapAccess for BTreeMapOps<K, V>
where
    K: Any + Default + Ord,
    V: Any + Default,
{
    fn len(&self, value: &dyn Any) -> CodecResult<usize> {
        Ok(cast::<BTreeMap<K, V>>(value)?.len())
    }

    fn for_each(&self, value: &dyn Any, visit: &mut EntryVisitor<'_>) -> CodecResult<()> {
        cast::<BTreeMap<K, V>>(value)?
            .iter()
            .try_for_each(|(k, v)| visit(k, v))
    }

    fn clear(&self, value: &mut dyn Any) -> CodecResult<()> {
        cast_mut::<BTreeMap<K, V>>(value)?.clear();
        Ok(())
    }

    fn insert_with(&self, value: &mut dyn Any, fill: &mut EntryFiller<'_>) -> CodecResult<()> {
        let map = cast_mut::<BTreeMap<K, V>>(value)?;
        let mut key = K::default();
        let mut item = V::default();
        fill(&mut key, &mut item)?;
        map.insert(key, item);
        Ok(())
    }
}
