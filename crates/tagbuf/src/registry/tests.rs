// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//! Tests for Registry.

use super::*;
use crate::error::CodecError;
use crate::types::{FieldDescriptor, TypeKind};
use std::sync::Barrier;
use std::thread;

#[derive(Default)]
struct Node {
    value: i32,
    next: Option<Box<Node>>,
}

impl Describe for Node {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Struct(vec![
            FieldDescriptor::new::<Self, i32>("value", |n| &n.value, |n| &mut n.value),
            FieldDescriptor::new::<Self, Option<Box<Node>>>("next", |n| &n.next, |n| &mut n.next),
        ]))
    }
}

#[derive(Default)]
struct Left {
    right: Vec<Right>,
}

#[derive(Default)]
struct Right {
    left: Option<Box<Left>>,
    tag: String,
}

impl Describe for Left {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Struct(vec![FieldDescriptor::new::<
            Self,
            Vec<Right>,
        >(
            "right",
            |l| &l.right,
            |l| &mut l.right,
        )]))
    }
}

impl Describe for Right {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Struct(vec![
            FieldDescriptor::new::<Self, Option<Box<Left>>>("left", |r| &r.left, |r| &mut r.left),
            FieldDescriptor::new::<Self, String>("tag", |r| &r.tag, |r| &mut r.tag),
        ]))
    }
}

#[derive(Default)]
struct Opaque;

impl Describe for Opaque {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Unsupported("raw handle".into()))
    }
}

#[derive(Default)]
struct HoldsOpaque {
    inner: Opaque,
}

impl Describe for HoldsOpaque {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Struct(vec![FieldDescriptor::new::<
            Self,
            Opaque,
        >(
            "inner",
            |h| &h.inner,
            |h| &mut h.inner,
        )]))
    }
}

#[test]
fn test_second_lookup_is_a_hit() {
    let registry = Registry::new();
    let first = registry.routines::<u32>().expect("u32");
    let second = registry.routines::<u32>().expect("u32");
    assert!(Arc::ptr_eq(&first, &second));

    let stats = registry.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.builds, 1);
    assert_eq!(stats.published, 1);
}

#[test]
fn test_closure_publishes_members() {
    let registry = Registry::new();
    registry.routines::<Vec<String>>().expect("vec");
    assert_eq!(registry.len(), 2);
    assert!(registry.peek(TypeId::of::<String>()).is_some());
}

#[test]
fn test_self_recursive_type_builds() {
    let registry = Registry::new();
    let routines = registry.routines::<Node>().expect("node");

    // Node, Option<Box<Node>>, Box<Node>, i32
    assert_eq!(registry.len(), 4);
    assert_eq!(registry.stats().builds, 1);

    let list = Node {
        value: 1,
        next: Some(Box::new(Node {
            value: 2,
            next: None,
        })),
    };
    // [1][len][count][id][Int32 1][id][Object [len][count][id][Int32 2]]
    let inner = 1 + 4 + 4 + 8 + 5;
    let outer = 1 + 4 + 4 + (8 + 5) + (8 + inner);
    assert_eq!(routines.count_size(&list, &registry).expect("size"), outer);
}

#[test]
fn test_mutual_recursion_builds_in_one_closure() {
    let registry = Registry::new();
    registry.routines::<Left>().expect("left");
    assert_eq!(registry.stats().builds, 1);
    assert!(registry.peek(TypeId::of::<Right>()).is_some());

    // Right was published by Left's closure.
    registry.routines::<Right>().expect("right");
    assert_eq!(registry.stats().builds, 1);
    assert_eq!(registry.stats().hits, 1);
}

#[test]
fn test_configuration_error_is_not_cached() {
    let registry = Registry::new();
    for _ in 0..2 {
        let err = registry.routines::<HoldsOpaque>().unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, CodecError::UnsupportedType { .. }));
    }
    let stats = registry.stats();
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.published, 0);
    assert!(registry.is_empty());
}

#[test]
fn test_concurrent_first_lookups_share_one_build() {
    const THREADS: usize = 8;
    let registry = Arc::new(Registry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.routines::<Node>().expect("node")
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .collect();
    for routines in &results[1..] {
        assert!(Arc::ptr_eq(routines, &results[0]));
    }
    assert_eq!(registry.stats().builds, 1);
    assert!(registry.in_flight.is_empty());
}

#[test]
fn test_unrelated_roots_build_concurrently() {
    let registry = Arc::new(Registry::new());
    let barrier = Arc::new(Barrier::new(2));

    let left = {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            registry.routines::<Vec<u64>>().map(|_| ())
        })
    };
    barrier.wait();
    registry.routines::<Option<String>>().expect("option");
    left.join().expect("thread").expect("vec");

    assert_eq!(registry.stats().builds, 2);
}
