// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors over caller-owned buffers.
//!
//! Both cursors are bounds-checked and little-endian. The write cursor can
//! reserve a length prefix and patch it once the payload is written. The read
//! cursor tracks nesting depth against the registry's [`CodecConfig`].

use crate::config::{CodecConfig, LENGTH_PREFIX_SIZE};
use crate::error::{CodecError, CodecResult};

/// Generate little-endian write methods for fixed-width values.
macro_rules! impl_write_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> CodecResult<()> {
            self.ensure($size)?;
            self.buffer[self.offset..self.offset + $size].copy_from_slice(&value.to_le_bytes());
            self.offset += $size;
            Ok(())
        }
    };
}

/// Generate little-endian read methods for fixed-width values.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> CodecResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Generate accessors shared by both cursors.
macro_rules! impl_cursor_common {
    () => {
        pub fn offset(&self) -> usize {
            self.offset
        }

        pub fn remaining(&self) -> usize {
            self.buffer.len().saturating_sub(self.offset)
        }

        pub fn len(&self) -> usize {
            self.buffer.len()
        }

        pub fn is_empty(&self) -> bool {
            self.buffer.is_empty()
        }
    };
}

/// Mutable cursor for writing (bounds-checked, zero-copy).
pub struct WriteCursor<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> WriteCursor<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Cursor positioned at `offset` inside `buffer`.
    pub fn at(buffer: &'a mut [u8], offset: usize) -> CodecResult<Self> {
        if offset > buffer.len() {
            return Err(CodecError::BufferTooSmall {
                offset,
                needed: 0,
                capacity: buffer.len(),
            });
        }
        Ok(Self { buffer, offset })
    }

    fn ensure(&self, needed: usize) -> CodecResult<()> {
        if needed > self.remaining() {
            return Err(CodecError::BufferTooSmall {
                offset: self.offset,
                needed,
                capacity: self.buffer.len(),
            });
        }
        Ok(())
    }

    impl_write_le!(write_u8, u8, 1);
    impl_write_le!(write_u16, u16, 2);
    impl_write_le!(write_u32, u32, 4);
    impl_write_le!(write_u64, u64, 8);
    impl_write_le!(write_i8, i8, 1);
    impl_write_le!(write_i16, i16, 2);
    impl_write_le!(write_i32, i32, 4);
    impl_write_le!(write_i64, i64, 8);
    impl_write_le!(write_f32, f32, 4);
    impl_write_le!(write_f64, f64, 8);

    pub fn write_bytes(&mut self, data: &[u8]) -> CodecResult<()> {
        self.ensure(data.len())?;
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Write a u32 length, failing if `len` does not fit.
    pub fn write_len(&mut self, len: usize) -> CodecResult<()> {
        let len = u32::try_from(len).map_err(|_| CodecError::LengthOverflow { length: len })?;
        self.write_u32(len)
    }

    /// Reserve a u32 length prefix; returns its position for [`Self::patch_len`].
    pub fn reserve_len(&mut self) -> CodecResult<usize> {
        let at = self.offset;
        self.write_u32(0)?;
        Ok(at)
    }

    /// Patch a reserved prefix with the number of bytes written after it.
    pub fn patch_len(&mut self, at: usize) -> CodecResult<()> {
        let len = self.offset - at - LENGTH_PREFIX_SIZE;
        let len = u32::try_from(len).map_err(|_| CodecError::LengthOverflow { length: len })?;
        self.buffer[at..at + LENGTH_PREFIX_SIZE].copy_from_slice(&len.to_le_bytes());
        Ok(())
    }

    /// Patch a reserved u32 slot with an explicit value (element counts).
    pub fn patch_u32(&mut self, at: usize, value: u32) {
        self.buffer[at..at + LENGTH_PREFIX_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    /// Raw buffer access for custom hooks.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.buffer
    }

    /// Move forward over bytes a custom hook wrote in place.
    pub fn advance(&mut self, len: usize) -> CodecResult<()> {
        self.ensure(len)?;
        self.offset += len;
        Ok(())
    }

    impl_cursor_common!();
}

/// Immutable cursor for reading (bounds-checked, zero-copy).
pub struct ReadCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
    depth: usize,
    max_depth: usize,
    max_collection_len: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_config(buffer, &CodecConfig::default())
    }

    pub fn with_config(buffer: &'a [u8], config: &CodecConfig) -> Self {
        Self {
            buffer,
            offset: 0,
            depth: 0,
            max_depth: config.max_depth,
            max_collection_len: config.max_collection_len,
        }
    }

    /// Move to an absolute position (start offset of a multi-value buffer).
    pub fn seek(&mut self, offset: usize) -> CodecResult<()> {
        if offset > self.buffer.len() {
            return Err(CodecError::UnexpectedEof {
                offset: self.buffer.len(),
                needed: offset - self.buffer.len(),
            });
        }
        self.offset = offset;
        Ok(())
    }

    impl_read_le!(read_u16, u16, 2);
    impl_read_le!(read_u32, u32, 4);
    impl_read_le!(read_u64, u64, 8);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_i16, i16, 2);
    impl_read_le!(read_i32, i32, 4);
    impl_read_le!(read_i64, i64, 8);
    impl_read_le!(read_f32, f32, 4);
    impl_read_le!(read_f64, f64, 8);

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        let byte = self.peek_u8()?;
        self.offset += 1;
        Ok(byte)
    }

    pub fn peek_u8(&self) -> CodecResult<u8> {
        self.buffer
            .get(self.offset)
            .copied()
            .ok_or(CodecError::UnexpectedEof {
                offset: self.offset,
                needed: 1,
            })
    }

    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::UnexpectedEof {
                offset: self.offset,
                needed: len,
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn advance(&mut self, len: usize) -> CodecResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Read a u32 length prefix and check the span fits the buffer.
    pub fn read_len(&mut self) -> CodecResult<usize> {
        let at = self.offset;
        let len = self.read_u32()? as usize;
        if len > self.remaining() {
            return Err(CodecError::LengthOutOfBounds {
                offset: at,
                length: len,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }

    /// Read an element count bounded by the configured limit and by `max`.
    pub fn read_count(&mut self, max: usize) -> CodecResult<usize> {
        let at = self.offset;
        let count = self.read_u32()? as usize;
        if count > self.max_collection_len || count > max {
            return Err(CodecError::MalformedPayload {
                offset: at,
                reason: format!("element count {} exceeds payload", count),
            });
        }
        Ok(count)
    }

    /// Enter a composite value.
    pub fn enter(&mut self) -> CodecResult<()> {
        if self.depth >= self.max_depth {
            return Err(CodecError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Underlying buffer (custom hooks read it with absolute positions).
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    impl_cursor_common!();

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_U16: u16 = 0xCDEF;
    const TEST_U32: u32 = 0x1234_5678;
    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_write_overflow_reports_offset() {
        let mut buffer = [0u8; 2];
        let mut cursor = WriteCursor::new(&mut buffer);
        cursor.write_u16(TEST_U16).expect("Write u16 should succeed");

        let err = cursor.write_u8(0xFF).unwrap_err();
        assert_eq!(
            err,
            CodecError::BufferTooSmall {
                offset: 2,
                needed: 1,
                capacity: 2
            }
        );
    }

    #[test]
    fn test_read_overflow_reports_offset() {
        let buffer = [0u8; 1];
        let mut cursor = ReadCursor::new(&buffer);
        assert_eq!(cursor.read_u8().expect("Read u8 should succeed"), 0);

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(err, CodecError::UnexpectedEof { offset: 1, needed: 4 });
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buffer = [0u8; 14];
        let mut cursor = WriteCursor::new(&mut buffer);
        cursor.write_u16(TEST_U16).expect("u16");
        cursor.write_u32(TEST_U32).expect("u32");
        cursor.write_u64(TEST_U64).expect("u64");
        assert_eq!(&buffer[0..2], &[0xEF, 0xCD]);
        assert_eq!(&buffer[2..6], &[0x78, 0x56, 0x34, 0x12]);

        let mut reader = ReadCursor::new(&buffer);
        assert_eq!(reader.read_u16().expect("u16"), TEST_U16);
        assert_eq!(reader.read_u32().expect("u32"), TEST_U32);
        assert_eq!(reader.read_u64().expect("u64"), TEST_U64);
        assert!(reader.is_eof());
    }

    #[test]
    fn test_reserve_and_patch_len() {
        let mut buffer = [0u8; 8];
        let mut cursor = WriteCursor::new(&mut buffer);
        let at = cursor.reserve_len().expect("reserve");
        cursor.write_bytes(&[1, 2, 3]).expect("payload");
        cursor.patch_len(at).expect("patch");
        assert_eq!(cursor.offset(), 7);
        assert_eq!(&buffer[0..4], &3u32.to_le_bytes());
    }

    #[test]
    fn test_read_len_out_of_bounds() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&100u32.to_le_bytes());
        buffer.extend_from_slice(&[0u8; 3]);
        let mut cursor = ReadCursor::new(&buffer);
        let err = cursor.read_len().unwrap_err();
        assert_eq!(
            err,
            CodecError::LengthOutOfBounds {
                offset: 0,
                length: 100,
                remaining: 3
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let config = CodecConfig::builder().max_depth(2).build();
        let buffer = [0u8; 0];
        let mut cursor = ReadCursor::with_config(&buffer, &config);
        cursor.enter().expect("depth 1");
        cursor.enter().expect("depth 2");
        assert_eq!(
            cursor.enter().unwrap_err(),
            CodecError::DepthLimitExceeded { limit: 2 }
        );
        cursor.leave();
        cursor.enter().expect("depth 2 again");
    }

    #[test]
    fn test_write_len_overflow() {
        let mut buffer = [0u8; 4];
        let mut cursor = WriteCursor::new(&mut buffer);
        let too_long = u32::MAX as usize + 1;
        assert_eq!(
            cursor.write_len(too_long).unwrap_err(),
            CodecError::LengthOverflow { length: too_long }
        );
    }
}
