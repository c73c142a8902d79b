// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Public codec surface.
//!
//! Every operation exists as a [`Registry`] method and as a free function over
//! [`Registry::global`]. Encoding runs the size pass, allocates exactly once,
//! then writes; decoding starts from `T::default()` (or the caller's value for
//! [`merge`]).

use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{CodecError, CodecResult};
use crate::registry::Registry;
use crate::types::Describe;

fn check_written(expected: usize, actual: usize) -> CodecResult<()> {
    if expected != actual {
        return Err(CodecError::SizeMismatch { expected, actual });
    }
    Ok(())
}

impl Registry {
    /// Encoded size of `value`.
    pub fn count_size<T: Describe>(&self, value: &T) -> CodecResult<usize> {
        self.routines::<T>()?.count_size(value, self)
    }

    pub fn serialize<T: Describe>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let routines = self.routines::<T>()?;
        let size = routines.count_size(value, self)?;
        let mut buffer = vec![0u8; size];
        let mut cursor = WriteCursor::new(&mut buffer);
        routines.write(value, &mut cursor, self)?;
        check_written(size, cursor.offset())?;
        Ok(buffer)
    }

    /// Encode into `buffer` at `offset`; returns the offset past the value.
    pub fn serialize_into<T: Describe>(
        &self,
        value: &T,
        buffer: &mut [u8],
        offset: usize,
    ) -> CodecResult<usize> {
        let routines = self.routines::<T>()?;
        let size = routines.count_size(value, self)?;
        if offset.saturating_add(size) > buffer.len() {
            return Err(CodecError::BufferTooSmall {
                offset,
                needed: size,
                capacity: buffer.len(),
            });
        }
        let mut cursor = WriteCursor::at(buffer, offset)?;
        routines.write(value, &mut cursor, self)?;
        check_written(size, cursor.offset() - offset)?;
        Ok(cursor.offset())
    }

    /// Decode one value spanning the whole of `bytes`.
    pub fn deserialize<T: Describe>(&self, bytes: &[u8]) -> CodecResult<T> {
        let (value, end) = self.deserialize_from(bytes, 0)?;
        self.check_trailing(end, bytes.len())?;
        Ok(value)
    }

    /// Decode one value starting at `offset`; returns it with the offset past it.
    pub fn deserialize_from<T: Describe>(
        &self,
        bytes: &[u8],
        offset: usize,
    ) -> CodecResult<(T, usize)> {
        let mut value = T::default();
        let end = self.read_into(&mut value, bytes, offset)?;
        Ok((value, end))
    }

    /// Decode into an existing value. Fields absent from `bytes` keep their
    /// current contents.
    pub fn merge<T: Describe>(&self, target: &mut T, bytes: &[u8]) -> CodecResult<()> {
        let end = self.read_into(target, bytes, 0)?;
        self.check_trailing(end, bytes.len())
    }

    /// Encode as `A`, decode as `B`.
    pub fn change_type<A: Describe, B: Describe>(&self, value: &A) -> CodecResult<B> {
        let bytes = self.serialize(value)?;
        self.deserialize(&bytes)
    }

    /// Deep copy through the wire format.
    pub fn copy<T: Describe>(&self, value: &T) -> CodecResult<T> {
        self.change_type::<T, T>(value)
    }

    fn read_into<T: Describe>(
        &self,
        target: &mut T,
        bytes: &[u8],
        offset: usize,
    ) -> CodecResult<usize> {
        let routines = self.routines::<T>()?;
        let mut cursor = ReadCursor::with_config(bytes, self.config());
        cursor.seek(offset)?;
        routines.read(&mut cursor, target, self)?;
        Ok(cursor.offset())
    }

    fn check_trailing(&self, consumed: usize, total: usize) -> CodecResult<()> {
        if self.config().reject_trailing_bytes && consumed != total {
            return Err(CodecError::TrailingBytes { consumed, total });
        }
        Ok(())
    }
}

/// Encoded size of `value`.
pub fn count_size<T: Describe>(value: &T) -> CodecResult<usize> {
    Registry::global().count_size(value)
}

/// Encode `value` into a new buffer of exactly its encoded size.
pub fn serialize<T: Describe>(value: &T) -> CodecResult<Vec<u8>> {
    Registry::global().serialize(value)
}

/// Encode into a caller buffer at `offset`; returns the new offset.
pub fn serialize_into<T: Describe>(value: &T, buffer: &mut [u8], offset: usize) -> CodecResult<usize> {
    Registry::global().serialize_into(value, buffer, offset)
}

/// Decode a `T` from the whole of `bytes`.
pub fn deserialize<T: Describe>(bytes: &[u8]) -> CodecResult<T> {
    Registry::global().deserialize(bytes)
}

/// Decode one `T` at `offset`; returns it with the offset past it.
pub fn deserialize_from<T: Describe>(bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
    Registry::global().deserialize_from(bytes, offset)
}

/// Decode into an existing value, keeping fields absent from the input.
pub fn merge<T: Describe>(target: &mut T, bytes: &[u8]) -> CodecResult<()> {
    Registry::global().merge(target, bytes)
}

/// Encode as `A`, decode as `B`.
pub fn change_type<A: Describe, B: Describe>(value: &A) -> CodecResult<B> {
    Registry::global().change_type(value)
}

/// Deep copy through the wire format.
pub fn copy<T: Describe>(value: &T) -> CodecResult<T> {
    Registry::global().copy(value)
}
