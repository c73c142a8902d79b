// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type description layer.
//!
//! A type takes part in encoding by implementing [`Describe`], usually through
//! `#[derive(Describe)]`. Descriptors are interned per `TypeId` in a
//! process-wide table so that every lookup returns the same `Arc`.

pub mod access;
pub mod descriptor;
pub mod dynamic;
mod impls;

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

pub use descriptor::{
    BoxDecl, ChildFn, EnumDecl, FieldDescriptor, MapDecl, NullableDecl, SeqDecl, TypeDescriptor,
    TypeKind,
};
pub use dynamic::Dynamic;

/// A type the codec can describe.
///
/// `describe` must not call [`descriptor_of`] for child types eagerly; use the
/// lazy [`ChildFn`] references so recursive types stay describable.
pub trait Describe: Any + Send + Sync + Default {
    fn describe() -> TypeDescriptor;
}

fn descriptors() -> &'static DashMap<TypeId, Arc<TypeDescriptor>> {
    static DESCRIPTORS: OnceLock<DashMap<TypeId, Arc<TypeDescriptor>>> = OnceLock::new();
    DESCRIPTORS.get_or_init(DashMap::new)
}

/// Interned descriptor of `T`.
pub fn descriptor_of<T: Describe>() -> Arc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    let hit = descriptors().get(&id).map(|d| Arc::clone(d.value()));
    if let Some(desc) = hit {
        return desc;
    }
    // Built outside the shard lock; first insert wins.
    let built = Arc::new(T::describe());
    Arc::clone(descriptors().entry(id).or_insert(built).value())
}
