// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use tagbuf::{Decimal, Describe, Registry};

#[derive(Describe, Default, Debug)]
struct Record {
    id: u64,
    name: String,
    ratio: f32,
    amount: Decimal,
    flags: Vec<bool>,
    tags: Vec<String>,
    attributes: HashMap<String, i64>,
    next: Option<Box<Record>>,
}

fuzz_target!(|data: &[u8]| {
    let registry = Registry::new();

    // Anything that decodes must re-encode with a consistent size
    if let Ok(record) = registry.deserialize::<Record>(data) {
        let bytes = registry.serialize(&record).expect("decoded value encodes");
        assert_eq!(bytes.len(), registry.count_size(&record).expect("size"));
    }

    let mut target = Record::default();
    let _ = registry.merge(&mut target, data);
});
