// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Custom hook adapter.
//!
//! A type may supply its own size/write/read functions. When all three are
//! present the registry installs them as the type's routines, framed as
//! `[CustomData][len u32][user bytes]`; a hook size of zero takes the empty
//! fast path. A missing hook is a configuration error raised the first time
//! the type is requested.
//!
//! ```ignore
//! impl Describe for Rgb {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::new::<Self>(TypeKind::Unsupported("packed".into())).with_custom(
//!             CustomHooks::new()
//!                 .size(|_| 3)
//!                 .write(|v, buf, pos| { buf[pos..pos + 3].copy_from_slice(&[v.r, v.g, v.b]); pos + 3 })
//!                 .read(|buf, pos| Ok((Rgb { r: buf[pos], g: buf[pos + 1], b: buf[pos + 2] }, pos + 3))),
//!         )
//!     }
//! }
//! ```

use std::any::{type_name, Any};
use std::sync::Arc;

use super::{Reader, SizeCounter, Writer};
use crate::config::{EMPTY_SIZE, LENGTH_PREFIX_SIZE, TAG_SIZE};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{CodecError, CodecResult};
use crate::registry::Registry;
use crate::types::{Describe, TypeDescriptor};
use crate::wire::{self, TypeCode};

/// `(value) -> size`
pub type SizeHook<T> = fn(&T) -> usize;
/// `(value, buffer, position) -> position`
pub type WriteHook<T> = fn(&T, &mut [u8], usize) -> usize;
/// `(buffer, position) -> (value, position)`
pub type ReadHook<T> = fn(&[u8], usize) -> CodecResult<(T, usize)>;

/// User-declared routines for `T`.
pub struct CustomHooks<T> {
    size: Option<SizeHook<T>>,
    write: Option<WriteHook<T>>,
    read: Option<ReadHook<T>>,
}

impl<T> Default for CustomHooks<T> {
    fn default() -> Self {
        Self {
            size: None,
            write: None,
            read: None,
        }
    }
}

impl<T> CustomHooks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(mut self, hook: SizeHook<T>) -> Self {
        self.size = Some(hook);
        self
    }

    #[must_use]
    pub fn write(mut self, hook: WriteHook<T>) -> Self {
        self.write = Some(hook);
        self
    }

    #[must_use]
    pub fn read(mut self, hook: ReadHook<T>) -> Self {
        self.read = Some(hook);
        self
    }
}

/// Object-safe view of [`CustomHooks`].
pub trait ErasedHooks: Send + Sync {
    fn type_name(&self) -> &'static str;
    /// Name of the first hook left out.
    fn missing(&self) -> Option<&'static str>;
    fn size(&self, value: &dyn Any) -> CodecResult<usize>;
    fn write(&self, value: &dyn Any, buffer: &mut [u8], position: usize) -> CodecResult<usize>;
    fn read(&self, buffer: &[u8], position: usize, target: &mut dyn Any) -> CodecResult<usize>;
}

impl<T: Describe> CustomHooks<T> {
    fn cast<'a>(&self, value: &'a dyn Any) -> CodecResult<&'a T> {
        value.downcast_ref::<T>().ok_or(CodecError::TypeMismatch {
            expected: type_name::<T>(),
        })
    }

    fn hook_missing(&self, hook: &'static str) -> CodecError {
        CodecError::MissingCustomHook {
            type_name: type_name::<T>(),
            hook,
        }
    }
}

impl<T: Describe> ErasedHooks for CustomHooks<T> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn missing(&self) -> Option<&'static str> {
        if self.size.is_none() {
            Some("size")
        } else if self.write.is_none() {
            Some("write")
        } else if self.read.is_none() {
            Some("read")
        } else {
            None
        }
    }

    fn size(&self, value: &dyn Any) -> CodecResult<usize> {
        let hook = self.size.ok_or_else(|| self.hook_missing("size"))?;
        Ok(hook(self.cast(value)?))
    }

    fn write(&self, value: &dyn Any, buffer: &mut [u8], position: usize) -> CodecResult<usize> {
        let hook = self.write.ok_or_else(|| self.hook_missing("write"))?;
        Ok(hook(self.cast(value)?, buffer, position))
    }

    fn read(&self, buffer: &[u8], position: usize, target: &mut dyn Any) -> CodecResult<usize> {
        let hook = self.read.ok_or_else(|| self.hook_missing("read"))?;
        let (value, end) = hook(buffer, position)?;
        let slot = target.downcast_mut::<T>().ok_or(CodecError::TypeMismatch {
            expected: type_name::<T>(),
        })?;
        *slot = value;
        Ok(end)
    }
}

/// Size, write and read routines backed by user hooks.
pub(crate) struct CustomRoutine {
    descriptor: Arc<TypeDescriptor>,
    hooks: Arc<dyn ErasedHooks>,
}

impl CustomRoutine {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor>, hooks: Arc<dyn ErasedHooks>) -> Self {
        Self { descriptor, hooks }
    }
}

impl SizeCounter for CustomRoutine {
    fn count_size(&self, value: &dyn Any, _registry: &Registry) -> CodecResult<usize> {
        let payload = self.hooks.size(value)?;
        if payload == 0 {
            return Ok(EMPTY_SIZE);
        }
        Ok(TAG_SIZE + LENGTH_PREFIX_SIZE + payload)
    }
}

impl Writer for CustomRoutine {
    fn write(
        &self,
        value: &dyn Any,
        cursor: &mut WriteCursor<'_>,
        _registry: &Registry,
    ) -> CodecResult<()> {
        let payload = self.hooks.size(value)?;
        if payload == 0 {
            return cursor.write_u8(TypeCode::Empty as u8);
        }
        cursor.write_u8(TypeCode::CustomData as u8)?;
        cursor.write_len(payload)?;
        if payload > cursor.remaining() {
            return Err(CodecError::BufferTooSmall {
                offset: cursor.offset(),
                needed: payload,
                capacity: cursor.len(),
            });
        }
        let start = cursor.offset();
        let end = {
            let region = &mut cursor.buffer_mut()[..start + payload];
            self.hooks.write(value, region, start)?
        };
        if end != start + payload {
            return Err(CodecError::SizeMismatch {
                expected: payload,
                actual: end.saturating_sub(start),
            });
        }
        cursor.advance(payload)
    }
}

impl Reader for CustomRoutine {
    fn read(
        &self,
        cursor: &mut ReadCursor<'_>,
        target: &mut dyn Any,
        _registry: &Registry,
    ) -> CodecResult<()> {
        let code = cursor.read_u8()?;
        if code != TypeCode::CustomData as u8 {
            if code != TypeCode::Empty as u8 {
                wire::skip_payload(code, cursor)?;
            }
            self.descriptor.reset(target);
            return Ok(());
        }
        let len = cursor.read_len()?;
        let start = cursor.offset();
        let region = &cursor.buffer()[..start + len];
        let end = self.hooks.read(region, start, target)?;
        if end != start + len {
            return Err(CodecError::MalformedPayload {
                offset: start,
                reason: format!(
                    "custom reader for {} consumed {} of {} bytes",
                    self.hooks.type_name(),
                    end.saturating_sub(start),
                    len
                ),
            });
        }
        cursor.advance(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::descriptor_of;

    #[derive(Default, Debug, PartialEq)]
    struct Pair(u8, u8);

    fn pair_hooks() -> CustomHooks<Pair> {
        CustomHooks::new()
            .size(|p: &Pair| if *p == Pair(0, 0) { 0 } else { 2 })
            .write(|p, buf, pos| {
                buf[pos] = p.0;
                buf[pos + 1] = p.1;
                pos + 2
            })
            .read(|buf, pos| Ok((Pair(buf[pos], buf[pos + 1]), pos + 2)))
    }

    impl Describe for Pair {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new::<Self>(crate::types::TypeKind::Unsupported("packed pair".into()))
                .with_custom(pair_hooks())
        }
    }

    #[test]
    fn test_missing_reports_first_gap() {
        let hooks: CustomHooks<Pair> = CustomHooks::new().size(|_| 1);
        assert_eq!(ErasedHooks::missing(&hooks), Some("write"));
        assert_eq!(ErasedHooks::missing(&pair_hooks()), None);
    }

    #[test]
    fn test_framing_and_empty_path() {
        let registry = Registry::new();
        let routine = CustomRoutine::new(descriptor_of::<Pair>(), Arc::new(pair_hooks()));
        let value = Pair(7, 9);
        assert_eq!(routine.count_size(&value, &registry).expect("size"), 7);
        assert_eq!(routine.count_size(&Pair(0, 0), &registry).expect("size"), 1);

        let mut buffer = vec![0u8; 7];
        let mut cursor = WriteCursor::new(&mut buffer);
        Writer::write(&routine, &value, &mut cursor, &registry).expect("write");
        assert_eq!(buffer, vec![TypeCode::CustomData as u8, 2, 0, 0, 0, 7, 9]);

        let mut decoded = Pair::default();
        let mut reader = ReadCursor::new(&buffer);
        Reader::read(&routine, &mut reader, &mut decoded, &registry).expect("read");
        assert_eq!(decoded, value);
        assert!(reader.is_eof());
    }

    #[test]
    fn test_short_hook_write_is_size_mismatch() {
        let hooks: CustomHooks<Pair> = CustomHooks::new()
            .size(|_| 2)
            .write(|_, _, pos| pos + 1)
            .read(|_, pos| Ok((Pair::default(), pos)));
        let registry = Registry::new();
        let routine = CustomRoutine::new(descriptor_of::<Pair>(), Arc::new(hooks));
        let mut buffer = vec![0u8; 7];
        let mut cursor = WriteCursor::new(&mut buffer);
        let err = Writer::write(&routine, &Pair(1, 1), &mut cursor, &registry).unwrap_err();
        assert_eq!(err, CodecError::SizeMismatch { expected: 2, actual: 1 });
    }
}
