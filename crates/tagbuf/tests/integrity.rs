// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Malformed input and configuration errors.

use tagbuf::{
    CodecError, CustomHooks, Describe, Registry, TypeCode, TypeDescriptor, TypeKind,
};

#[derive(Describe, Default, Debug, PartialEq)]
struct Record {
    id: u32,
    name: String,
    values: Vec<i64>,
}

fn record_bytes(registry: &Registry) -> Vec<u8> {
    registry
        .serialize(&Record {
            id: 1,
            name: "abc".into(),
            values: vec![1, 2],
        })
        .expect("encode")
}

#[test]
fn test_every_truncation_is_an_integrity_error() {
    let registry = Registry::new();
    let bytes = record_bytes(&registry);
    for cut in 0..bytes.len() {
        let err = registry
            .deserialize::<Record>(&bytes[..cut])
            .expect_err("truncated input");
        assert!(err.is_integrity(), "cut at {}: {:?}", cut, err);
    }
}

#[test]
fn test_length_beyond_buffer() {
    let registry = Registry::new();
    let bytes = [TypeCode::String as u8, 0xFF, 0, 0, 0, b'a'];
    let err = registry.deserialize::<String>(&bytes).unwrap_err();
    assert_eq!(
        err,
        CodecError::LengthOutOfBounds {
            offset: 1,
            length: 255,
            remaining: 1
        }
    );
}

#[test]
fn test_unknown_tag_inside_struct() {
    let registry = Registry::new();
    let mut bytes = vec![TypeCode::Object as u8];
    bytes.extend_from_slice(&14u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&0xDEADu64.to_le_bytes());
    bytes.extend_from_slice(&[200, 0]);
    let err = registry.deserialize::<Record>(&bytes).unwrap_err();
    assert_eq!(err, CodecError::UnknownTypeCode { offset: 17, code: 200 });
}

#[test]
fn test_count_larger_than_payload() {
    let registry = Registry::new();
    let mut bytes = vec![TypeCode::Array as u8];
    bytes.extend_from_slice(&5u32.to_le_bytes());
    bytes.extend_from_slice(&1000u32.to_le_bytes());
    bytes.push(0);
    let err = registry.deserialize::<Vec<String>>(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::MalformedPayload { offset: 5, .. }));
}

#[test]
fn test_collection_limit() {
    let config = tagbuf::CodecConfig::builder().max_collection_len(2).build();
    let registry = Registry::with_config(config);
    let bytes = registry
        .serialize(&vec!["a".to_string(), "b".into(), "c".into()])
        .expect("encode");
    let err = registry.deserialize::<Vec<String>>(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::MalformedPayload { .. }));
}

#[test]
fn test_unknown_field_is_skipped() {
    let registry = Registry::new();
    let mut bytes = vec![TypeCode::Object as u8];
    // count + unknown (id + Guid) + id field (id + UInt32)
    let len = 4 + (8 + 17) + (8 + 5);
    bytes.extend_from_slice(&(len as u32).to_le_bytes());
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&0xDEADu64.to_le_bytes());
    bytes.push(TypeCode::Guid as u8);
    bytes.extend_from_slice(&[7u8; 16]);
    bytes.extend_from_slice(&tagbuf::wire::field_id("id").to_le_bytes());
    bytes.push(TypeCode::UInt32 as u8);
    bytes.extend_from_slice(&9u32.to_le_bytes());

    let record: Record = registry.deserialize(&bytes).expect("tolerated");
    assert_eq!(record.id, 9);
    assert!(record.name.is_empty());
}

#[derive(Default, Debug, PartialEq)]
struct HalfCustom(u8);

impl Describe for HalfCustom {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(TypeKind::Unsupported("opaque byte".into())).with_custom(
            CustomHooks::new()
                .size(|_: &HalfCustom| 1)
                .write(|v, buf, pos| {
                    buf[pos] = v.0;
                    pos + 1
                }),
        )
    }
}

#[derive(Describe, Default)]
struct UsesHalfCustom {
    inner: HalfCustom,
}

#[test]
fn test_missing_hook_fails_at_first_use() {
    let registry = Registry::new();
    let err = registry.routines::<HalfCustom>().unwrap_err();
    assert_eq!(
        err,
        CodecError::MissingCustomHook {
            type_name: std::any::type_name::<HalfCustom>(),
            hook: "read"
        }
    );

    // Containing types fail the same way, on every attempt.
    for _ in 0..2 {
        let err = registry
            .serialize(&UsesHalfCustom::default())
            .unwrap_err();
        assert!(err.is_configuration());
    }
    assert!(registry.is_empty());
}

#[test]
fn test_errors_leave_registry_usable() {
    let registry = Registry::new();
    let _ = registry.deserialize::<Record>(&[TypeCode::Object as u8, 1]);
    let bytes = record_bytes(&registry);
    assert_eq!(
        registry.deserialize::<Record>(&bytes).expect("decode").name,
        "abc"
    );
}
