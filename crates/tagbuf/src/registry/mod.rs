// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Routine registry.
//!
//! Maps each Rust type to its published [`Routines`]. Lookups are served from a
//! sharded map; a miss takes a per-type single-flight lock, re-checks, then
//! builds the type's closure (the type plus every unpublished member) and
//! publishes all of it. Unrelated types build concurrently.
//!
//! Configuration errors (unsupported type, missing custom hook) are returned
//! to every caller and never cached.

pub mod closure;

use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::config::CodecConfig;
use crate::error::CodecResult;
use crate::routines::Routines;
use crate::types::{descriptor_of, Describe, TypeDescriptor};

use self::closure::BuildClosure;

/// Registry hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    /// Closures built and published.
    pub builds: u64,
    /// Builds rejected with a configuration error.
    pub failures: u64,
    /// Types currently published.
    pub published: usize,
    pub last_build_ns: u64,
}

pub struct Registry {
    config: CodecConfig,
    published: DashMap<TypeId, Arc<Routines>>,
    in_flight: DashMap<TypeId, Arc<Mutex<()>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    builds: AtomicU64,
    failures: AtomicU64,
    last_build_ns: AtomicU64,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    #[must_use]
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            published: DashMap::new(),
            in_flight: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            builds: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            last_build_ns: AtomicU64::new(0),
        }
    }

    /// Process-wide registry behind the free functions.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub(crate) fn peek(&self, id: TypeId) -> Option<Arc<Routines>> {
        self.published.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Routines for `T`, building them on first use.
    pub fn routines<T: Describe>(&self) -> CodecResult<Arc<Routines>> {
        self.routines_for(&descriptor_of::<T>())
    }

    pub fn routines_for(&self, desc: &Arc<TypeDescriptor>) -> CodecResult<Arc<Routines>> {
        let id = desc.type_id();
        if let Some(hit) = self.peek(id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let gate = Arc::clone(
            self.in_flight
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let result = {
            let _guard = gate.lock();
            match self.peek(id) {
                Some(hit) => Ok(hit),
                None => self.build(desc),
            }
        };
        self.in_flight
            .remove_if(&id, |_, current| Arc::ptr_eq(current, &gate));
        result
    }

    fn build(&self, desc: &Arc<TypeDescriptor>) -> CodecResult<Arc<Routines>> {
        let start = Instant::now();
        let mut closure = BuildClosure::new(self);
        let root = match closure.resolve(desc) {
            Ok(root) => root,
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("[registry] cannot build {}: {}", desc.name(), err);
                return Err(err);
            }
        };

        let (routines, members) = closure.finish(&root);
        let count = members.len();
        for member in members {
            // Overlapping closures may race on a shared member; first wins.
            self.published
                .entry(member.descriptor().type_id())
                .or_insert(member);
        }

        let elapsed = start.elapsed();
        self.builds.fetch_add(1, Ordering::Relaxed);
        self.last_build_ns
            .store(elapsed.as_nanos() as u64, Ordering::Relaxed);
        log::debug!(
            "[registry] built {} ({} members) in {:?}",
            desc.name(),
            count,
            elapsed
        );

        Ok(self.peek(desc.type_id()).unwrap_or(routines))
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        LookupStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            published: self.published.len(),
            last_build_ns: self.last_build_ns.load(Ordering::Relaxed),
        }
    }

    /// Number of published types.
    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("published", &self.published.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
