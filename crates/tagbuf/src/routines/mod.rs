// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Routine triples: size counter, writer and reader for one type.
//!
//! Routines are trait objects selected by shape. Synthesized routines share a
//! compiled [`Plan`](plan::Plan) that holds references to member routines;
//! custom types install their user hooks instead.
//!
//! Invariant: for every value `v`, `write` emits exactly `count_size(v)` bytes.

pub mod custom;
pub(crate) mod plan;
mod read;
mod size;
mod write;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::config::EMPTY_SIZE;
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::CodecResult;
use crate::registry::Registry;
use crate::types::TypeDescriptor;

use self::custom::{CustomRoutine, ErasedHooks};
use self::plan::Plan;

/// Exact encoded size of a value.
pub trait SizeCounter: Send + Sync {
    fn count_size(&self, value: &dyn Any, registry: &Registry) -> CodecResult<usize>;

    /// True when the value encodes as the single empty byte.
    fn is_empty(&self, value: &dyn Any, registry: &Registry) -> CodecResult<bool> {
        Ok(self.count_size(value, registry)? == EMPTY_SIZE)
    }
}

/// Encode a value at the cursor.
pub trait Writer: Send + Sync {
    fn write(&self, value: &dyn Any, cursor: &mut WriteCursor<'_>, registry: &Registry)
        -> CodecResult<()>;
}

/// Decode one value at the cursor into `target`.
///
/// Fields absent from the input keep whatever `target` held, which is what
/// makes merge-decoding possible.
pub trait Reader: Send + Sync {
    fn read(&self, cursor: &mut ReadCursor<'_>, target: &mut dyn Any, registry: &Registry)
        -> CodecResult<()>;
}

/// Published {size, write, read} for one type. Immutable.
pub struct Routines {
    descriptor: Arc<TypeDescriptor>,
    size: Box<dyn SizeCounter>,
    write: Box<dyn Writer>,
    read: Box<dyn Reader>,
}

impl Routines {
    pub(crate) fn synthesized(descriptor: Arc<TypeDescriptor>, plan: Plan) -> Self {
        let plan = Arc::new(plan);
        Self {
            size: Box::new(size::SizeRoutine::new(Arc::clone(&plan))),
            write: Box::new(write::WriteRoutine::new(Arc::clone(&plan))),
            read: Box::new(read::ReadRoutine::new(Arc::clone(&descriptor), plan)),
            descriptor,
        }
    }

    pub(crate) fn custom(descriptor: Arc<TypeDescriptor>, hooks: Arc<dyn ErasedHooks>) -> Self {
        let routine = Arc::new(CustomRoutine::new(Arc::clone(&descriptor), hooks));
        Self {
            size: Box::new(Shared(Arc::clone(&routine))),
            write: Box::new(Shared(Arc::clone(&routine))),
            read: Box::new(Shared(routine)),
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    #[inline]
    pub fn count_size(&self, value: &dyn Any, registry: &Registry) -> CodecResult<usize> {
        self.size.count_size(value, registry)
    }

    #[inline]
    pub fn is_empty(&self, value: &dyn Any, registry: &Registry) -> CodecResult<bool> {
        self.size.is_empty(value, registry)
    }

    #[inline]
    pub fn write(
        &self,
        value: &dyn Any,
        cursor: &mut WriteCursor<'_>,
        registry: &Registry,
    ) -> CodecResult<()> {
        self.write.write(value, cursor, registry)
    }

    #[inline]
    pub fn read(
        &self,
        cursor: &mut ReadCursor<'_>,
        target: &mut dyn Any,
        registry: &Registry,
    ) -> CodecResult<()> {
        self.read.read(cursor, target, registry)
    }
}

impl fmt::Debug for Routines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routines")
            .field("type", &self.descriptor.name())
            .finish()
    }
}

/// One object serving several roles of the triple.
struct Shared<R>(Arc<R>);

impl<R: SizeCounter> SizeCounter for Shared<R> {
    fn count_size(&self, value: &dyn Any, registry: &Registry) -> CodecResult<usize> {
        self.0.count_size(value, registry)
    }

    fn is_empty(&self, value: &dyn Any, registry: &Registry) -> CodecResult<bool> {
        self.0.is_empty(value, registry)
    }
}

impl<R: Writer> Writer for Shared<R> {
    fn write(
        &self,
        value: &dyn Any,
        cursor: &mut WriteCursor<'_>,
        registry: &Registry,
    ) -> CodecResult<()> {
        self.0.write(value, cursor, registry)
    }
}

impl<R: Reader> Reader for Shared<R> {
    fn read(
        &self,
        cursor: &mut ReadCursor<'_>,
        target: &mut dyn Any,
        registry: &Registry,
    ) -> CodecResult<()> {
        self.0.read(cursor, target, registry)
    }
}
