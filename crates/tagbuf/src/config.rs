// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! tagbuf configuration - single source of truth.
//!
//! - **Level 1 (Static)**: wire constants (prefix widths, field id hashing,
//!   format version). **NEVER hardcode elsewhere!**
//! - **Level 2 (Runtime)**: [`CodecConfig`], owned by a [`Registry`](crate::Registry),
//!   bounding what a decode call accepts.
//!
//! # Example
//!
//! ```ignore
//! use tagbuf::{CodecConfig, Registry};
//!
//! let config = CodecConfig::builder()
//!     .max_depth(32)
//!     .max_collection_len(1 << 20)
//!     .build();
//! let registry = Registry::with_config(config);
//! ```

// =======================================================================
// Wire format
// =======================================================================

/// Wire format version documented by this crate.
pub const WIRE_FORMAT_VERSION: u8 = 1;

/// Width of a type tag.
pub const TAG_SIZE: usize = 1;

/// Width of every length prefix and element count.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Width of a structured field identifier.
pub const FIELD_ID_SIZE: usize = 8;

/// Size of an encoded empty value (the tag alone).
pub const EMPTY_SIZE: usize = TAG_SIZE;

/// FNV-1a 64-bit offset basis (field identifiers).
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime (field identifiers).
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Size of a raw GUID payload.
pub const GUID_SIZE: usize = 16;

/// Size of a decimal payload (lo, mid, hi, flags).
pub const DECIMAL_SIZE: usize = 16;

/// Size of a timestamp payload (i64 seconds, u32 nanoseconds).
pub const DATETIME_SIZE: usize = 12;

/// Size of a legacy microsecond timestamp payload.
pub const DATETIME_MICROS_SIZE: usize = 8;

// =======================================================================
// Decode limits
// =======================================================================

/// Default nesting limit for composite values during decode.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default upper bound on decoded element/entry counts.
pub const DEFAULT_MAX_COLLECTION_LEN: usize = u32::MAX as usize;

/// Runtime limits applied by a registry's decode calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum nesting of arrays, maps and structured values.
    pub max_depth: usize,
    /// Maximum element count accepted for one array or map.
    pub max_collection_len: usize,
    /// Reject input that continues after the top-level value.
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_collection_len: DEFAULT_MAX_COLLECTION_LEN,
            reject_trailing_bytes: true,
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }
}

/// Fluent builder for [`CodecConfig`].
#[derive(Debug, Default, Clone)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    #[must_use]
    pub fn max_collection_len(mut self, len: usize) -> Self {
        self.config.max_collection_len = len;
        self
    }

    #[must_use]
    pub fn reject_trailing_bytes(mut self, reject: bool) -> Self {
        self.config.reject_trailing_bytes = reject;
        self
    }

    pub fn build(self) -> CodecConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_collection_len, u32::MAX as usize);
        assert!(config.reject_trailing_bytes);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CodecConfig::builder()
            .max_depth(8)
            .max_collection_len(100)
            .reject_trailing_bytes(false)
            .build();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.max_collection_len, 100);
        assert!(!config.reject_trailing_bytes);
    }
}
