// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagbuf::{CodecConfig, Dynamic, Registry};

fuzz_target!(|data: &[u8]| {
    // Tight limits so deep or wide frames hit the bounds quickly
    let registry = Registry::with_config(
        CodecConfig::builder()
            .max_depth(16)
            .max_collection_len(1024)
            .build(),
    );

    let _ = registry.deserialize::<Dynamic>(data);
    let _ = registry.deserialize::<Vec<f64>>(data);
    let _ = registry.deserialize_from::<String>(data, 0);
});
