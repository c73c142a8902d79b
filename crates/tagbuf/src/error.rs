// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec error type shared by the registry, the routines and the public surface.
//!
//! Errors fall in three groups:
//!
//! - **Configuration**: raised the first time a type's routines are requested
//!   (missing custom hook, type with no decomposition path). Never cached.
//! - **Integrity**: raised by a single decode call (truncated input, length
//!   prefix past the end of the buffer, unknown tag family).
//! - **Encode**: caller buffer too small, length that does not fit the u32
//!   prefix, size pass and write pass disagreeing.
//!
//! Schema drift (unknown fields, foreign tags, out-of-range numbers) is never
//! an error.

use std::fmt;

/// Error raised by size, write and read routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A type declared custom hooks but left one of them out.
    MissingCustomHook {
        type_name: &'static str,
        hook: &'static str,
    },
    /// The classifier found no shape for the type.
    UnsupportedType {
        type_name: &'static str,
        reason: String,
    },
    /// Input ended before a fixed-width payload was complete.
    UnexpectedEof { offset: usize, needed: usize },
    /// A length prefix announces more bytes than the buffer holds.
    LengthOutOfBounds {
        offset: usize,
        length: usize,
        remaining: usize,
    },
    /// Tag byte belongs to no known layout family.
    UnknownTypeCode { offset: usize, code: u8 },
    InvalidUtf8 { offset: usize },
    /// Payload framing is inconsistent (count vs length, trailing entry bytes).
    MalformedPayload { offset: usize, reason: String },
    DepthLimitExceeded { limit: usize },
    TrailingBytes { consumed: usize, total: usize },
    BufferTooSmall {
        offset: usize,
        needed: usize,
        capacity: usize,
    },
    /// Collection or string too large for a u32 length prefix.
    LengthOverflow { length: usize },
    /// Bytes written differ from the size pass.
    SizeMismatch { expected: usize, actual: usize },
    /// A routine received a value of another type.
    TypeMismatch { expected: &'static str },
}

impl CodecError {
    /// True for errors raised while building routines.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CodecError::MissingCustomHook { .. } | CodecError::UnsupportedType { .. }
        )
    }

    /// True for errors caused by malformed or truncated input.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            CodecError::UnexpectedEof { .. }
                | CodecError::LengthOutOfBounds { .. }
                | CodecError::UnknownTypeCode { .. }
                | CodecError::InvalidUtf8 { .. }
                | CodecError::MalformedPayload { .. }
                | CodecError::DepthLimitExceeded { .. }
                | CodecError::TrailingBytes { .. }
        )
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::MissingCustomHook { type_name, hook } => {
                write!(f, "type {} declares custom hooks without `{}`", type_name, hook)
            }
            CodecError::UnsupportedType { type_name, reason } => {
                write!(f, "unsupported type {}: {}", type_name, reason)
            }
            CodecError::UnexpectedEof { offset, needed } => {
                write!(f, "unexpected end of buffer at offset {} ({} bytes needed)", offset, needed)
            }
            CodecError::LengthOutOfBounds {
                offset,
                length,
                remaining,
            } => write!(
                f,
                "length {} at offset {} exceeds remaining {} bytes",
                length, offset, remaining
            ),
            CodecError::UnknownTypeCode { offset, code } => {
                write!(f, "unknown type code {} at offset {}", code, offset)
            }
            CodecError::InvalidUtf8 { offset } => write!(f, "invalid UTF-8 string at offset {}", offset),
            CodecError::MalformedPayload { offset, reason } => {
                write!(f, "malformed payload at offset {}: {}", offset, reason)
            }
            CodecError::DepthLimitExceeded { limit } => {
                write!(f, "nesting depth limit {} exceeded", limit)
            }
            CodecError::TrailingBytes { consumed, total } => {
                write!(f, "decoded {} of {} bytes, trailing data left", consumed, total)
            }
            CodecError::BufferTooSmall {
                offset,
                needed,
                capacity,
            } => write!(
                f,
                "buffer too small: {} bytes needed at offset {}, capacity {}",
                needed, offset, capacity
            ),
            CodecError::LengthOverflow { length } => {
                write!(f, "length {} does not fit a u32 prefix", length)
            }
            CodecError::SizeMismatch { expected, actual } => {
                write!(f, "size pass announced {} bytes, write pass produced {}", expected, actual)
            }
            CodecError::TypeMismatch { expected } => {
                write!(f, "routine for {} received a value of another type", expected)
            }
        }
    }
}

impl std::error::Error for CodecError {}

pub type CodecResult<T> = core::result::Result<T, CodecError>;
