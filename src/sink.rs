//! Output sinks and error policies.
//!
//! [`UnitSink`] is where single-unit conversion writes its results.
//! [`ErrorSink`] decides what happens to a unit that has no mapping.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::BAD_INPUT;

/// Failure reported by a [`UnitSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("output sink rejected unit 0x{unit:X}")]
pub struct SinkError {
    /// The unit that could not be written.
    pub unit: u32,
}

/// Destination for units produced one at a time.
pub trait UnitSink<T> {
    /// Append one unit. An error aborts the conversion that produced it.
    fn put(&mut self, unit: T) -> Result<(), SinkError>;

    /// Append the units produced for one input unit.
    ///
    /// Sinks that know their capacity write all of `units` or none of them.
    /// The default forwards to [`put`](UnitSink::put) one unit at a time.
    fn put_all(&mut self, units: &[T]) -> Result<(), SinkError>
    where
        T: Copy,
    {
        units.iter().try_for_each(|&unit| self.put(unit))
    }
}

impl<T> UnitSink<T> for Vec<T> {
    fn put(&mut self, unit: T) -> Result<(), SinkError> {
        self.push(unit);
        Ok(())
    }

    fn put_all(&mut self, units: &[T]) -> Result<(), SinkError>
    where
        T: Copy,
    {
        self.extend_from_slice(units);
        Ok(())
    }
}

/// Adapts a closure into a [`UnitSink`].
pub struct FnSink<F>(pub F);

impl<T, F> UnitSink<T> for FnSink<F>
where
    F: FnMut(T) -> Result<(), SinkError>,
{
    fn put(&mut self, unit: T) -> Result<(), SinkError> {
        (self.0)(unit)
    }
}

/// Sink that only counts what it is given.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    /// Units received so far.
    pub count: usize,
}

impl<T> UnitSink<T> for Counter {
    fn put(&mut self, _unit: T) -> Result<(), SinkError> {
        self.count += 1;
        Ok(())
    }

    fn put_all(&mut self, units: &[T]) -> Result<(), SinkError>
    where
        T: Copy,
    {
        self.count += units.len();
        Ok(())
    }
}

/// Sink over a caller-owned slice. Fails once the slice is full.
pub struct SliceSink<'a, T> {
    buf: &'a mut [T],
    len: usize,
}

impl<'a, T> SliceSink<'a, T> {
    /// Wrap an empty destination slice.
    pub fn new(buf: &'a mut [T]) -> Self {
        Self { buf, len: 0 }
    }

    /// Units written so far.
    pub fn written(&self) -> &[T] {
        &self.buf[..self.len]
    }
}

impl<T: Copy + Into<u32>> UnitSink<T> for SliceSink<'_, T> {
    fn put(&mut self, unit: T) -> Result<(), SinkError> {
        let slot = self
            .buf
            .get_mut(self.len)
            .ok_or(SinkError { unit: unit.into() })?;
        *slot = unit;
        self.len += 1;
        Ok(())
    }

    fn put_all(&mut self, units: &[T]) -> Result<(), SinkError> {
        let end = self.len + units.len();
        let slots = self.buf.get_mut(self.len..end).ok_or(SinkError {
            unit: units.first().map_or(BAD_INPUT, |&unit| unit.into()),
        })?;
        slots.copy_from_slice(units);
        self.len = end;
        Ok(())
    }
}

/// Direction of the conversion that hit an unmappable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Bytes to code points.
    Decode,
    /// Code points to bytes.
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decode => f.write_str("decode"),
            Direction::Encode => f.write_str("encode"),
        }
    }
}

/// What to do with a unit that has no mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Emit this character instead.
    Substitute(char),
    /// Emit this sequence instead, converted like ordinary input.
    Escape(String),
    /// Drop the unit.
    Skip,
    /// Stop the conversion with [`Error::Unmappable`](crate::Error::Unmappable).
    Abort,
}

/// Policy consulted for every unmappable unit.
///
/// `unit` is the offending byte when decoding and the offending code point
/// (possibly [`BAD_INPUT`]) when encoding.
pub trait ErrorSink {
    /// Decide how to recover from `unit`.
    fn unmappable(&mut self, unit: u32, direction: Direction) -> Recovery;
}

impl<F> ErrorSink for F
where
    F: FnMut(u32, Direction) -> Recovery,
{
    fn unmappable(&mut self, unit: u32, direction: Direction) -> Recovery {
        self(unit, direction)
    }
}

/// Built-in error policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Substitute a fixed character.
    Replace(char),
    /// Drop the unit.
    Skip,
    /// Substitute `U+XXXX`.
    Long,
    /// Substitute an HTML hexadecimal character reference, `&#xXXXX;`.
    Entity,
    /// Abort the conversion.
    Strict,
}

impl Default for ErrorMode {
    fn default() -> Self {
        ErrorMode::Replace('?')
    }
}

impl ErrorSink for ErrorMode {
    fn unmappable(&mut self, unit: u32, direction: Direction) -> Recovery {
        // A byte that failed to decode has no code point to spell out.
        let spelled = direction == Direction::Encode && unit != BAD_INPUT && unit <= 0x10FFFF;
        match *self {
            ErrorMode::Replace(c) => Recovery::Substitute(c),
            ErrorMode::Skip => Recovery::Skip,
            ErrorMode::Long if spelled => Recovery::Escape(format!("U+{unit:04X}")),
            ErrorMode::Entity if spelled => Recovery::Escape(format!("&#x{unit:X};")),
            ErrorMode::Long | ErrorMode::Entity => Recovery::Substitute('?'),
            ErrorMode::Strict => Recovery::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_appends() {
        let mut out: Vec<u32> = Vec::new();
        out.put(0x41).unwrap();
        out.put(0x20AC).unwrap();
        assert_eq!(out, vec![0x41, 0x20AC]);
    }

    #[test]
    fn test_slice_sink_fails_when_full() {
        let mut buf = [0u8; 2];
        let mut sink = SliceSink::new(&mut buf);
        sink.put(1u8).unwrap();
        sink.put(2u8).unwrap();
        assert_eq!(sink.put(3u8), Err(SinkError { unit: 3 }));
        assert_eq!(sink.written(), &[1, 2]);
    }

    #[test]
    fn test_slice_sink_put_all_is_all_or_nothing() {
        let mut buf = [0u8; 4];
        let mut sink = SliceSink::new(&mut buf);
        sink.put_all(b"ab").unwrap();
        assert_eq!(sink.put_all(b"cde"), Err(SinkError { unit: u32::from(b'c') }));
        assert_eq!(sink.written(), b"ab");
        sink.put_all(b"cd").unwrap();
        sink.put_all(&[]).unwrap();
        assert_eq!(sink.written(), b"abcd");
    }

    #[test]
    fn test_counter_and_closure_sinks() {
        let mut counter = Counter::default();
        for b in 0..5u8 {
            counter.put(b).unwrap();
        }
        assert_eq!(counter.count, 5);

        let mut seen = Vec::new();
        let mut sink = FnSink(|unit: u32| {
            seen.push(unit);
            Ok(())
        });
        sink.put(7).unwrap();
        drop(sink);
        assert_eq!(seen, vec![7]);
    }

    #[test]
    fn test_default_mode_replaces_with_question_mark() {
        let mut mode = ErrorMode::default();
        assert_eq!(
            mode.unmappable(0x4E2D, Direction::Encode),
            Recovery::Substitute('?')
        );
    }

    #[test]
    fn test_long_and_entity_escapes() {
        assert_eq!(
            ErrorMode::Long.unmappable(0x20AC, Direction::Encode),
            Recovery::Escape("U+20AC".to_string())
        );
        assert_eq!(
            ErrorMode::Long.unmappable(0xE9, Direction::Encode),
            Recovery::Escape("U+00E9".to_string())
        );
        assert_eq!(
            ErrorMode::Entity.unmappable(0x1F600, Direction::Encode),
            Recovery::Escape("&#x1F600;".to_string())
        );
    }

    #[test]
    fn test_escapes_fall_back_for_bad_input() {
        assert_eq!(
            ErrorMode::Long.unmappable(BAD_INPUT, Direction::Encode),
            Recovery::Substitute('?')
        );
        assert_eq!(
            ErrorMode::Entity.unmappable(0x81, Direction::Decode),
            Recovery::Substitute('?')
        );
    }

    #[test]
    fn test_closure_error_sink() {
        let mut calls = 0;
        let mut sink = |_unit: u32, _direction: Direction| {
            calls += 1;
            Recovery::Skip
        };
        assert_eq!(sink.unmappable(1, Direction::Decode), Recovery::Skip);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_error_mode_serde() {
        let json = serde_json::to_string(&ErrorMode::Replace('*')).unwrap();
        assert_eq!(json, r#"{"replace":"*"}"#);
        let mode: ErrorMode = serde_json::from_str(r#""entity""#).unwrap();
        assert_eq!(mode, ErrorMode::Entity);
    }
}
