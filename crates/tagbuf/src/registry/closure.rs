// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cycle resolver.
//!
//! A build closure compiles a root type and every member type that is not yet
//! published. Before a member's body is compiled it gets a slot in the
//! closure's [`ConstantsTable`]; every reference to a closure member (including
//! back-edges to a type still being compiled) is a [`RoutineRef::Slot`].
//! When all bodies are done the table is filled in one `OnceLock::set`, and
//! only then are the members published. No caller can reach a slot before the
//! table is complete.
//!
//! Published routines and their tables reference each other through `Arc`s;
//! they live as long as the process, like the registry entries themselves.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::Registry;
use crate::error::CodecResult;
use crate::routines::plan::Plan;
use crate::routines::Routines;
use crate::shape::{shape_of, Shape};
use crate::types::TypeDescriptor;

/// Slot table of one build closure.
pub struct ConstantsTable {
    slots: OnceLock<Box<[Arc<Routines>]>>,
}

impl ConstantsTable {
    fn new() -> Self {
        Self {
            slots: OnceLock::new(),
        }
    }

    /// Fill every slot at once. Returns false if already filled.
    fn initialize(&self, bodies: Vec<Arc<Routines>>) -> bool {
        self.slots.set(bodies.into_boxed_slice()).is_ok()
    }

    pub fn is_initialized(&self) -> bool {
        self.slots.get().is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.get().map_or(0, |slots| slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, index: usize) -> &Arc<Routines> {
        #[allow(clippy::expect_used)] // tables are filled before any member is published
        let slots = self
            .slots
            .get()
            .expect("constants table initialized before publish");
        &slots[index]
    }
}

impl fmt::Debug for ConstantsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstantsTable")
            .field("initialized", &self.is_initialized())
            .field("len", &self.len())
            .finish()
    }
}

/// Reference from a plan to a member's routines.
pub(crate) enum RoutineRef {
    /// Member published before this closure started.
    Direct(Arc<Routines>),
    /// Member compiled in the same closure.
    Slot {
        table: Arc<ConstantsTable>,
        index: usize,
    },
}

impl RoutineRef {
    #[inline]
    pub(crate) fn get(&self) -> &Routines {
        match self {
            RoutineRef::Direct(routines) => routines,
            RoutineRef::Slot { table, index } => table.slot(*index),
        }
    }

    fn to_arc(&self) -> Arc<Routines> {
        match self {
            RoutineRef::Direct(routines) => Arc::clone(routines),
            RoutineRef::Slot { table, index } => Arc::clone(table.slot(*index)),
        }
    }
}

/// In-progress build of one root and its unpublished members.
pub(crate) struct BuildClosure<'r> {
    registry: &'r Registry,
    table: Arc<ConstantsTable>,
    slots: HashMap<TypeId, usize>,
    bodies: Vec<Option<Routines>>,
}

impl<'r> BuildClosure<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            table: Arc::new(ConstantsTable::new()),
            slots: HashMap::new(),
            bodies: Vec::new(),
        }
    }

    /// Routine reference for `desc`, compiling it into this closure if needed.
    pub(crate) fn resolve(&mut self, desc: &Arc<TypeDescriptor>) -> CodecResult<RoutineRef> {
        let id = desc.type_id();
        if let Some(published) = self.registry.peek(id) {
            return Ok(RoutineRef::Direct(published));
        }
        if let Some(&index) = self.slots.get(&id) {
            return Ok(self.slot_ref(index));
        }

        let index = self.reserve(id);
        let body = self.compile(desc)?;
        self.bodies[index] = Some(body);
        Ok(self.slot_ref(index))
    }

    fn reserve(&mut self, id: TypeId) -> usize {
        let index = self.bodies.len();
        self.bodies.push(None);
        self.slots.insert(id, index);
        index
    }

    fn slot_ref(&self, index: usize) -> RoutineRef {
        RoutineRef::Slot {
            table: Arc::clone(&self.table),
            index,
        }
    }

    fn compile(&mut self, desc: &Arc<TypeDescriptor>) -> CodecResult<Routines> {
        let shape = shape_of(desc)?;
        log::debug!("[registry] compiling {} as {:?}", desc.name(), shape);
        match shape {
            Shape::Custom(hooks) => Ok(Routines::custom(Arc::clone(desc), Arc::clone(hooks))),
            other => {
                let plan = Plan::compile(desc, other, self)?;
                Ok(Routines::synthesized(Arc::clone(desc), plan))
            }
        }
    }

    /// Fill the constants table and hand back every compiled member.
    pub(crate) fn finish(self, root: &RoutineRef) -> (Arc<Routines>, Vec<Arc<Routines>>) {
        let bodies: Vec<Arc<Routines>> = self
            .bodies
            .into_iter()
            .map(|body| {
                #[allow(clippy::expect_used)] // every reserved slot is compiled before resolve returns Ok
                Arc::new(body.expect("slot compiled"))
            })
            .collect();
        let filled = self.table.initialize(bodies.clone());
        debug_assert!(filled, "constants table filled twice");
        (root.to_arc(), bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::descriptor_of;

    #[test]
    fn test_leaf_closure_has_one_slot() {
        let registry = Registry::new();
        let desc = descriptor_of::<u32>();
        let mut closure = BuildClosure::new(&registry);
        let root = closure.resolve(&desc).expect("resolve");
        assert!(matches!(root, RoutineRef::Slot { index: 0, .. }));
        let table = Arc::clone(&closure.table);
        assert!(!table.is_initialized());

        let (routines, members) = closure.finish(&root);
        assert!(table.is_initialized());
        assert_eq!(members.len(), 1);
        assert!(Arc::ptr_eq(&routines, &members[0]));
    }

    #[test]
    fn test_published_member_is_direct() {
        let registry = Registry::new();
        registry.routines::<String>().expect("publish string");

        let mut closure = BuildClosure::new(&registry);
        let root = closure
            .resolve(&descriptor_of::<Vec<String>>())
            .expect("resolve");
        let (_, members) = closure.finish(&root);
        // Only Vec<String> was compiled; String came from the registry.
        assert_eq!(members.len(), 1);
    }
}
