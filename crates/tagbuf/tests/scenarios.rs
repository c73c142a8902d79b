// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end encode/decode scenarios.

use tagbuf::{deserialize, serialize, Describe, Registry, TypeCode};
use uuid::Uuid;

#[derive(Describe, Default, Debug, PartialEq)]
struct WithOptionalItems {
    items: Option<Vec<i32>>,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct WithItems {
    items: Vec<i32>,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct PairV2 {
    a: i32,
    b: i32,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct PairV1 {
    a: i32,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct Node {
    value: i32,
    next: Option<Box<Node>>,
}

/// `Folder` and `Entry` reach each other.
#[derive(Describe, Default, Debug, PartialEq)]
struct Folder {
    name: String,
    entries: Vec<Entry>,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct Entry {
    size: u64,
    folder: Option<Box<Folder>>,
}

fn tree(depth: u32) -> Folder {
    Folder {
        name: format!("level-{}", depth),
        entries: vec![
            Entry {
                size: u64::from(depth) + 1,
                folder: None,
            },
            Entry {
                size: 0,
                folder: (depth > 0).then(|| Box::new(tree(depth - 1))),
            },
        ],
    }
}

#[test]
fn test_zero_int32_is_one_byte_and_widens() {
    let bytes = serialize(&0i32).expect("encode");
    assert_eq!(bytes, vec![TypeCode::Empty as u8]);
    assert_eq!(deserialize::<i64>(&bytes).expect("decode"), 0i64);
}

#[test]
fn test_null_array_decodes_as_empty_array() {
    let bytes = serialize(&WithOptionalItems { items: None }).expect("encode");
    let decoded: WithItems = deserialize(&bytes).expect("decode");
    assert_eq!(decoded.items, Vec::<i32>::new());

    // A present but empty array canonicalizes to the same encoding.
    let present = serialize(&WithOptionalItems {
        items: Some(Vec::new()),
    })
    .expect("encode");
    assert_eq!(present, bytes);
}

#[test]
fn test_guid_is_seventeen_bytes() {
    let guid = Uuid::from_u128(1);
    let bytes = serialize(&guid).expect("encode");
    assert_eq!(bytes.len(), 17);
    assert_eq!(bytes[0], TypeCode::Guid as u8);
    assert_eq!(deserialize::<Uuid>(&bytes).expect("decode"), guid);
}

#[test]
fn test_superset_decodes_into_subset() {
    let bytes = serialize(&PairV2 { a: 5, b: 7 }).expect("encode");
    let decoded: PairV1 = deserialize(&bytes).expect("decode");
    assert_eq!(decoded, PairV1 { a: 5 });
}

#[test]
fn test_large_double_saturates_into_int32() {
    let bytes = serialize(&1e20f64).expect("encode");
    assert_eq!(deserialize::<i32>(&bytes).expect("decode"), i32::MAX);
}

#[test]
fn test_self_referencing_chain_round_trips() {
    let registry = Registry::new();
    let chain = Node {
        value: 1,
        next: Some(Box::new(Node {
            value: 2,
            next: None,
        })),
    };
    let bytes = registry.serialize(&chain).expect("encode");
    let decoded: Node = registry.deserialize(&bytes).expect("decode");
    assert_eq!(decoded, chain);

    let deeper = Node {
        value: 1,
        next: Some(Box::new(Node {
            value: 2,
            next: Some(Box::new(Node {
                value: 3,
                next: None,
            })),
        })),
    };
    let bytes = registry.serialize(&deeper).expect("encode");
    assert_eq!(registry.deserialize::<Node>(&bytes).expect("decode"), deeper);
}

#[test]
fn test_mutually_recursive_types_round_trip() {
    for depth in 0..3 {
        let registry = Registry::new();
        let root = tree(depth);
        let bytes = registry.serialize(&root).expect("encode");
        assert_eq!(bytes.len(), registry.count_size(&root).expect("size"));
        assert_eq!(registry.deserialize::<Folder>(&bytes).expect("decode"), root);
    }

    // Building from the other side of the cycle first gives the same routines.
    let registry = Registry::new();
    let entry = Entry {
        size: 9,
        folder: Some(Box::new(tree(2))),
    };
    let bytes = registry.serialize(&entry).expect("encode");
    assert_eq!(registry.deserialize::<Entry>(&bytes).expect("decode"), entry);
    let root = tree(1);
    assert_eq!(registry.copy(&root).expect("copy"), root);
}
