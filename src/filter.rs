//! One-unit-at-a-time conversion into an output sink.

use crate::encoding::Encoding;
use crate::sink::{ErrorMode, ErrorSink, SinkError, UnitSink};
use crate::Result;

/// Feeds bytes one at a time and writes code points to a sink.
pub struct DecodeFilter<S> {
    encoding: &'static Encoding,
    sink: S,
}

impl<S: UnitSink<u32>> DecodeFilter<S> {
    /// Create a filter writing into `sink`.
    pub fn new(encoding: &'static Encoding, sink: S) -> Self {
        Self { encoding, sink }
    }

    /// Convert one byte. `None` stands for input already flagged invalid
    /// upstream and produces [`BAD_INPUT`](crate::BAD_INPUT).
    pub fn feed(&mut self, input: Option<u8>) -> std::result::Result<(), SinkError> {
        self.encoding.decode_unit_to(input, &mut self.sink)
    }

    /// Convert every byte of `input`, stopping at the first sink failure.
    pub fn feed_all(&mut self, input: &[u8]) -> std::result::Result<(), SinkError> {
        input.iter().try_for_each(|&byte| self.feed(Some(byte)))
    }

    /// Single-byte decoding keeps no state, so there is nothing to flush.
    pub fn flush(&mut self) -> std::result::Result<(), SinkError> {
        Ok(())
    }

    /// Release the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Feeds code points one at a time and writes bytes to a sink.
pub struct EncodeFilter<S, E = ErrorMode> {
    encoding: &'static Encoding,
    sink: S,
    errors: E,
}

impl<S: UnitSink<u8>> EncodeFilter<S> {
    /// Create a filter with the default error policy.
    pub fn new(encoding: &'static Encoding, sink: S) -> Self {
        Self::with_errors(encoding, sink, ErrorMode::default())
    }
}

impl<S: UnitSink<u8>, E: ErrorSink> EncodeFilter<S, E> {
    /// Create a filter with a custom error policy.
    pub fn with_errors(encoding: &'static Encoding, sink: S, errors: E) -> Self {
        Self {
            encoding,
            sink,
            errors,
        }
    }

    /// Convert one code point.
    pub fn feed(&mut self, cp: u32) -> Result<()> {
        self.encoding.encode_unit_to(cp, &mut self.sink, &mut self.errors)
    }

    /// Convert every code point of `input`, stopping at the first failure.
    pub fn feed_all(&mut self, input: &[u32]) -> Result<()> {
        input.iter().try_for_each(|&cp| self.feed(cp))
    }

    /// Single-byte encoding keeps no state, so there is nothing to flush.
    pub fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
