// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # tagbuf - tagged binary codec
//!
//! Compact self-describing binary serialization for plain Rust types. Every
//! value is written as a one-byte type tag followed by its payload, and
//! structured values identify fields by a 64-bit hash of their name. Readers
//! tolerate schema drift: unknown fields are skipped, missing fields keep their
//! defaults, and numbers are coerced between widths and kinds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tagbuf::Describe;
//!
//! #[derive(Describe, Default, Debug, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     celsius: f64,
//!     samples: Vec<i32>,
//! }
//!
//! fn main() -> tagbuf::CodecResult<()> {
//!     let reading = Reading { sensor: "t1".into(), celsius: 21.5, samples: vec![1, 2] };
//!     let bytes = tagbuf::serialize(&reading)?;
//!     let back: Reading = tagbuf::deserialize(&bytes)?;
//!     assert_eq!(back, reading);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |  codec: serialize / deserialize / merge / change_type / copy |
//! +--------------------------------------------------------------+
//! |  registry: TypeId -> Routines, single-flight closure builds   |
//! +--------------------------------------------------------------+
//! |  routines: size / write / read per shape, custom hooks       |
//! +--------------------------------------------------------------+
//! |  shape classifier  |  type descriptors (derive / built-in)   |
//! +--------------------------------------------------------------+
//! |  wire: tags, layouts, skip, coercion  |  cursors             |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`codec`] - public encode/decode operations
//! - [`registry`] - routine registry and cycle resolver
//! - [`shape`] - shape classifier
//! - [`types`] - [`Describe`] trait and type descriptors
//! - [`wire`] - wire format v1

// Allow the derive macro to work inside this crate's tests
extern crate self as tagbuf;

/// Public encode/decode operations.
pub mod codec;
/// Wire constants and runtime decode limits.
pub mod config;
/// Bounds-checked little-endian cursors.
pub mod cursor;
pub mod error;
/// Routine registry and cycle resolver.
pub mod registry;
/// Size, write and read routines.
pub mod routines;
/// Shape classifier.
pub mod shape;
/// Type descriptors and the [`Describe`] trait.
pub mod types;
/// Wire format: tags, layouts, skipping, numeric coercion.
pub mod wire;

pub use codec::{
    change_type, copy, count_size, deserialize, deserialize_from, merge, serialize,
    serialize_into,
};
pub use config::{CodecConfig, CodecConfigBuilder};
pub use error::{CodecError, CodecResult};
pub use registry::{LookupStats, Registry};
pub use routines::custom::CustomHooks;
pub use routines::Routines;
pub use shape::Shape;
pub use types::{
    descriptor_of, Describe, Dynamic, EnumDecl, FieldDescriptor, TypeDescriptor, TypeKind,
};
pub use wire::decimal::Decimal;
pub use wire::primitive::PrimitiveKind;
pub use wire::TypeCode;

// Derive macro (for #[derive(tagbuf::Describe)])
pub use tagbuf_codegen::Describe;

/// Wire format version written by this crate.
pub const VERSION: u8 = config::WIRE_FORMAT_VERSION;
