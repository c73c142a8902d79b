// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema drift between producer and consumer types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tagbuf::{change_type, merge, serialize, Describe, Registry};

#[derive(Describe, Default, Debug, PartialEq, Clone)]
struct CustomerV1 {
    id: u32,
    name: String,
}

#[derive(Describe, Default, Debug, PartialEq, Clone)]
struct CustomerV2 {
    id: u64,
    name: String,
    email: String,
    tags: Vec<String>,
    address: Option<Address>,
}

#[derive(Describe, Default, Debug, PartialEq, Clone)]
struct Address {
    city: String,
    zip: u32,
}

/// Same wire names as `CustomerV1`, different Rust names.
#[derive(Describe, Default, Debug, PartialEq)]
struct Renamed {
    #[tagbuf(rename = "id")]
    number: i64,
    #[tagbuf(rename = "name")]
    label: String,
    #[tagbuf(skip)]
    cache: u32,
}

#[derive(Describe, Default, Debug, PartialEq, Clone, Copy)]
#[repr(u8)]
enum StatusV2 {
    #[default]
    Unknown = 0,
    Active = 1,
    Suspended = 2,
    Archived = 3,
}

#[derive(Describe, Default, Debug, PartialEq, Clone, Copy)]
#[repr(i32)]
enum StatusV1 {
    #[default]
    Unknown = 0,
    Active = 1,
    Suspended = 2,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct Account {
    status: StatusV2,
    balance: i32,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct AccountV1 {
    status: StatusV1,
    balance: i64,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct Point(i32, i32);

#[derive(Describe, Default, Debug, PartialEq)]
struct PointV2(i64, i64, i64);

fn customer_v2() -> CustomerV2 {
    CustomerV2 {
        id: 42,
        name: "Ada".into(),
        email: "ada@example.org".into(),
        tags: vec!["vip".into(), "eu".into()],
        address: Some(Address {
            city: "Paris".into(),
            zip: 75001,
        }),
    }
}

#[test]
fn test_forward_compatibility_drops_unknown_fields() {
    let v1: CustomerV1 = change_type(&customer_v2()).expect("v2 -> v1");
    assert_eq!(
        v1,
        CustomerV1 {
            id: 42,
            name: "Ada".into()
        }
    );
}

#[test]
fn test_backward_compatibility_defaults_new_fields() {
    let v1 = CustomerV1 {
        id: 7,
        name: "Bob".into(),
    };
    let v2: CustomerV2 = change_type(&v1).expect("v1 -> v2");
    assert_eq!(v2.id, 7);
    assert_eq!(v2.name, "Bob");
    assert!(v2.email.is_empty());
    assert!(v2.tags.is_empty());
    assert_eq!(v2.address, None);
}

#[test]
fn test_rename_and_skip() {
    let renamed: Renamed = change_type(&CustomerV1 {
        id: 9,
        name: "Cy".into(),
    })
    .expect("by wire name");
    assert_eq!(renamed.number, 9);
    assert_eq!(renamed.label, "Cy");

    let source = Renamed {
        number: 3,
        label: "x".into(),
        cache: 99,
    };
    let back: Renamed = change_type(&source).expect("round trip");
    assert_eq!(back.cache, 0);
    assert_eq!(back.number, 3);
}

#[test]
fn test_enum_widening_and_unknown_discriminant() {
    let account = Account {
        status: StatusV2::Suspended,
        balance: -5,
    };
    let v1: AccountV1 = change_type(&account).expect("narrower enum");
    assert_eq!(v1.status, StatusV1::Suspended);
    assert_eq!(v1.balance, -5);

    // Archived has no counterpart and falls back to the default.
    let archived = Account {
        status: StatusV2::Archived,
        balance: 1,
    };
    let v1: AccountV1 = change_type(&archived).expect("unknown variant");
    assert_eq!(v1.status, StatusV1::Unknown);
}

#[test]
fn test_tuple_struct_positions() {
    let wider: PointV2 = change_type(&Point(3, -4)).expect("tuple");
    assert_eq!(wider, PointV2(3, -4, 0));
}

#[test]
fn test_merge_keeps_absent_fields() {
    let mut target = customer_v2();
    let update = serialize(&CustomerV1 {
        id: 43,
        name: String::new(),
    })
    .expect("encode");
    merge(&mut target, &update).expect("merge");

    assert_eq!(target.id, 43);
    // Empty strings are not written, so the current value survives.
    assert_eq!(target.name, "Ada");
    assert_eq!(target.email, "ada@example.org");
    assert_eq!(target.tags.len(), 2);
}

#[test]
fn test_map_value_drift() {
    let registry = Registry::new();
    let mut source: BTreeMap<String, CustomerV2> = BTreeMap::new();
    source.insert("a".into(), customer_v2());
    let narrowed: BTreeMap<String, CustomerV1> =
        registry.change_type(&source).expect("map values");
    assert_eq!(narrowed["a"].name, "Ada");
    assert_eq!(narrowed["a"].id, 42);
}

#[test]
fn test_scalar_to_composite_is_tolerated() {
    let registry = Registry::new();
    let customer: CustomerV1 = registry.change_type(&12345u32).expect("foreign tag");
    assert_eq!(customer, CustomerV1::default());

    let number: u32 = registry.change_type(&customer_v2()).expect("foreign tag");
    assert_eq!(number, 0);
}

#[derive(Describe, Default, Debug, PartialEq)]
struct EventV1 {
    stamp: i64,
    keep: u32,
}

#[derive(Describe, Default, Debug, PartialEq)]
struct EventV2 {
    stamp: DateTime<Utc>,
    keep: u32,
}

#[test]
fn test_integer_stamp_saturates_into_datetime() {
    let registry = Registry::new();

    let late: EventV2 = registry
        .change_type(&EventV1 {
            stamp: i64::MAX,
            keep: 7,
        })
        .expect("saturates high");
    assert_eq!(late.stamp, DateTime::<Utc>::MAX_UTC);
    assert_eq!(late.keep, 7);

    let early: EventV2 = registry
        .change_type(&EventV1 {
            stamp: i64::MIN,
            keep: 8,
        })
        .expect("saturates low");
    assert_eq!(early.stamp, DateTime::<Utc>::MIN_UTC);
    assert_eq!(early.keep, 8);

    // In range, the integer is microseconds since the epoch.
    let exact: EventV2 = registry
        .change_type(&EventV1 {
            stamp: 1_500_000,
            keep: 1,
        })
        .expect("in range");
    assert_eq!(exact.stamp, DateTime::from_timestamp(1, 500_000_000).expect("in range"));

    // And back: a datetime read as an integer is truncated to microseconds.
    let back: EventV1 = registry
        .change_type(&EventV2 {
            stamp: DateTime::from_timestamp(2, 1_999).expect("in range"),
            keep: 3,
        })
        .expect("datetime to integer");
    assert_eq!(back, EventV1 { stamp: 2_000_001, keep: 3 });
}
