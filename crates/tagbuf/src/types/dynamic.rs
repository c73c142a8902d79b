// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open "any" value.
//!
//! A [`Dynamic`] holds a value of any [`Describe`] type together with its
//! descriptor. It encodes exactly as the held value would; decoding maps each
//! tag to its natural Rust type (`Int32` -> `i32`, `String` -> `String`,
//! `Array` -> `Vec<Dynamic>`, ...). Objects, dictionaries and custom payloads
//! have no natural type and decode to an empty `Dynamic`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::descriptor::TypeDescriptor;
use super::{descriptor_of, Describe};

struct Held {
    value: Box<dyn Any + Send + Sync>,
    descriptor: Arc<TypeDescriptor>,
}

/// Value whose type is resolved at encode time.
#[derive(Default)]
pub struct Dynamic {
    held: Option<Held>,
}

impl Dynamic {
    pub fn new<T: Describe>(value: T) -> Self {
        Self {
            held: Some(Held {
                value: Box::new(value),
                descriptor: descriptor_of::<T>(),
            }),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    pub fn downcast_ref<T: Describe>(&self) -> Option<&T> {
        self.held.as_ref()?.value.downcast_ref::<T>()
    }

    pub fn descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        self.held.as_ref().map(|h| &h.descriptor)
    }

    /// Take the held value back out.
    pub fn into_inner<T: Describe>(self) -> Result<T, Self> {
        match self.held {
            Some(held) if held.value.is::<T>() => match held.value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(value) => Err(Self {
                    held: Some(Held {
                        value,
                        descriptor: held.descriptor,
                    }),
                }),
            },
            held => Err(Self { held }),
        }
    }

    pub(crate) fn parts(&self) -> Option<(&dyn Any, &Arc<TypeDescriptor>)> {
        self.held
            .as_ref()
            .map(|h| (&*h.value as &dyn Any, &h.descriptor))
    }

    pub(crate) fn from_parts(
        value: Box<dyn Any + Send + Sync>,
        descriptor: Arc<TypeDescriptor>,
    ) -> Self {
        Self {
            held: Some(Held { value, descriptor }),
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.held {
            Some(held) => write!(f, "Dynamic({})", held.descriptor.name()),
            None => write!(f, "Dynamic(empty)"),
        }
    }
}
