// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Timestamp payloads.
//!
//! `Timestamp` carries i64 seconds then u32 nanoseconds since the Unix epoch
//! and keeps full `chrono` precision, leap seconds included. Integer tags
//! (and the legacy `DateTimeNew` tag) read as microseconds and saturate at
//! the range `chrono` can represent.

use chrono::{DateTime, Utc};

use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{CodecError, CodecResult};

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// The epoch is the empty timestamp.
#[inline]
pub fn is_empty(value: &DateTime<Utc>) -> bool {
    *value == DateTime::<Utc>::UNIX_EPOCH
}

pub fn write(value: &DateTime<Utc>, cursor: &mut WriteCursor<'_>) -> CodecResult<()> {
    cursor.write_i64(value.timestamp())?;
    cursor.write_u32(value.timestamp_subsec_nanos())
}

/// Read a seconds/nanoseconds payload. Seconds outside `chrono`'s range
/// saturate; a nanosecond field that no `DateTime` can hold is malformed.
pub fn read(cursor: &mut ReadCursor<'_>) -> CodecResult<DateTime<Utc>> {
    let at = cursor.offset();
    let secs = cursor.read_i64()?;
    let nanos = cursor.read_u32()?;
    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(stamp) => Ok(stamp),
        None if nanos < NANOS_PER_SEC => Ok(saturate(secs < 0)),
        None => Err(CodecError::MalformedPayload {
            offset: at,
            reason: format!("timestamp nanoseconds {} out of range", nanos),
        }),
    }
}

/// Microseconds since the epoch, clamped to what `chrono` represents.
pub fn from_micros_saturating(micros: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_micros(micros).unwrap_or_else(|| saturate(micros < 0))
}

pub fn to_micros(value: &DateTime<Utc>) -> i64 {
    value.timestamp_micros()
}

fn saturate(negative: bool) -> DateTime<Utc> {
    if negative {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DATETIME_SIZE;

    fn encode(value: &DateTime<Utc>) -> Vec<u8> {
        let mut buf = vec![0u8; DATETIME_SIZE];
        let mut cursor = WriteCursor::new(&mut buf);
        write(value, &mut cursor).expect("fits");
        assert_eq!(cursor.offset(), DATETIME_SIZE);
        buf
    }

    #[test]
    fn test_keeps_nanoseconds() {
        let stamp = DateTime::from_timestamp(1_700_000_000, 123_456_789).expect("in range");
        let buf = encode(&stamp);
        assert_eq!(&buf[0..8], &1_700_000_000i64.to_le_bytes());
        assert_eq!(&buf[8..12], &123_456_789u32.to_le_bytes());
        assert_eq!(read(&mut ReadCursor::new(&buf)).expect("decode"), stamp);
    }

    #[test]
    fn test_before_epoch() {
        let stamp = DateTime::from_timestamp(-1, 999_999_999).expect("in range");
        let back = read(&mut ReadCursor::new(&encode(&stamp))).expect("decode");
        assert_eq!(back, stamp);
        assert_eq!(back.timestamp_nanos_opt(), Some(-1));
    }

    #[test]
    fn test_only_epoch_is_empty() {
        assert!(is_empty(&DateTime::<Utc>::UNIX_EPOCH));
        assert!(is_empty(&DateTime::<Utc>::default()));
        assert!(!is_empty(&DateTime::from_timestamp(0, 500).expect("in range")));
    }

    #[test]
    fn test_seconds_out_of_range_saturate() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&i64::MAX.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(read(&mut ReadCursor::new(&buf)).expect("decode"), DateTime::<Utc>::MAX_UTC);

        buf[0..8].copy_from_slice(&i64::MIN.to_le_bytes());
        assert_eq!(read(&mut ReadCursor::new(&buf)).expect("decode"), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_bad_nanoseconds_are_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&10i64.to_le_bytes());
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = read(&mut ReadCursor::new(&buf)).expect_err("nanos");
        assert!(matches!(err, CodecError::MalformedPayload { offset: 0, .. }));
    }

    #[test]
    fn test_micros_saturate() {
        assert_eq!(from_micros_saturating(i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(from_micros_saturating(i64::MIN), DateTime::<Utc>::MIN_UTC);
        assert_eq!(to_micros(&from_micros_saturating(1_234_567)), 1_234_567);
    }
}
