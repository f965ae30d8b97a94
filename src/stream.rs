//! Streaming conversion over caller-supplied buffers.
//!
//! A [`Decoder`] turns bytes into code points and an [`Encoder`] turns code
//! points into bytes. Both accept input in arbitrarily sized chunks and report
//! how far they got, so a stream of any length can be converted in bounded
//! memory. Output that has been written is never taken back, even when a later
//! unit fails.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::encoding::Encoding;
use crate::mapping::UnitCodec;
use crate::sink::{Direction, ErrorMode, ErrorSink, Recovery};
use crate::table::BAD_INPUT;
use crate::{Error, Result};

/// Outcome of a (potentially partial) conversion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoderResult {
    /// All input was consumed.
    ///
    /// If `last` was set, the stream is complete. Otherwise the caller should
    /// call again with more input.
    InputEmpty,
    /// The output buffer is full.
    ///
    /// This is flow control, not an error: call again with more output space
    /// and the input that was not yet read.
    OutputFull,
}

/// Progress of a resumable conversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Input units consumed so far.
    pub read: usize,
    /// Output units produced so far.
    pub written: usize,
}

/// Options for whole-stream conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Policy for unmappable units.
    pub errors: ErrorMode,
    /// Chunk size in bytes.
    pub buffer_size: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            errors: ErrorMode::default(),
            buffer_size: 64 * 1024,
        }
    }
}

/// Counts how often the wrapped policy is consulted.
struct Tally<'a, E: ?Sized> {
    inner: &'a mut E,
    count: &'a mut usize,
}

impl<E: ErrorSink + ?Sized> ErrorSink for Tally<'_, E> {
    fn unmappable(&mut self, unit: u32, direction: Direction) -> Recovery {
        *self.count += 1;
        self.inner.unmappable(unit, direction)
    }
}

/// Streaming byte to code point converter.
pub struct Decoder<E = ErrorMode> {
    encoding: &'static Encoding,
    errors: E,
    illegal: usize,
    finished: bool,
}

impl Decoder {
    /// Create a decoder with the default error policy.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self::with_errors(encoding, ErrorMode::default())
    }
}

impl<E: ErrorSink> Decoder<E> {
    /// Create a decoder with a custom error policy.
    pub fn with_errors(encoding: &'static Encoding, errors: E) -> Self {
        Self {
            encoding,
            errors,
            illegal: 0,
            finished: false,
        }
    }

    /// The encoding being decoded.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Number of units the error policy has been consulted for.
    pub fn illegal_count(&self) -> usize {
        self.illegal
    }

    /// Whether a call with `last` set has consumed all of its input.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn begin(&mut self) {
        debug_assert!(!self.finished, "decoder fed after the last chunk");
        self.finished = false;
    }

    fn end(&mut self, result: CoderResult, last: bool) {
        if result == CoderResult::InputEmpty && last {
            self.finished = true;
            trace!(encoding = self.encoding.name(), "decode finished");
        }
    }

    /// Decode into code points, leaving unassigned bytes as
    /// [`BAD_INPUT`].
    ///
    /// Returns the result, the number of bytes read and the number of code
    /// points written; the two counts are always equal.
    pub fn decode_to_units(
        &mut self,
        src: &[u8],
        dst: &mut [u32],
        last: bool,
    ) -> (CoderResult, usize, usize) {
        self.begin();
        let mut input = src;
        let written = self.encoding.bytes_to_codepoints(&mut input, dst);
        let result = if input.is_empty() {
            CoderResult::InputEmpty
        } else {
            trace!(
                encoding = self.encoding.name(),
                written,
                remaining = input.len(),
                "output full"
            );
            CoderResult::OutputFull
        };
        self.end(result, last);
        (result, written, written)
    }

    /// Continue decoding `src` into `dst` from `cursor`, advancing it.
    ///
    /// The same `src` and `dst` must be supplied on every call; `dst` may
    /// grow between calls. A cursor that points past either buffer is
    /// rejected.
    pub fn decode_resume(
        &mut self,
        src: &[u8],
        dst: &mut [u32],
        cursor: &mut Cursor,
        last: bool,
    ) -> Result<CoderResult> {
        if cursor.read > src.len() || cursor.written > dst.len() {
            return Err(Error::InvalidCursor {
                read: cursor.read,
                written: cursor.written,
            });
        }
        let (result, read, written) =
            self.decode_to_units(&src[cursor.read..], &mut dst[cursor.written..], last);
        cursor.read += read;
        cursor.written += written;
        Ok(result)
    }

    /// Decode all of `src` and append it to `dst` as text, applying the
    /// error policy to unassigned bytes.
    ///
    /// Returns the number of bytes read, which is `src.len()` unless the
    /// policy aborts.
    pub fn decode_to_string(&mut self, src: &[u8], dst: &mut String, last: bool) -> Result<usize> {
        self.begin();
        let start = dst.len();
        dst.reserve(src.len());
        let encoding = self.encoding;
        let mut errors = Tally {
            inner: &mut self.errors,
            count: &mut self.illegal,
        };
        for (position, &byte) in src.iter().enumerate() {
            let cp = encoding.decode_unit(byte);
            if cp != BAD_INPUT {
                dst.push(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
                continue;
            }
            if !encoding.replace_undecodable(byte, &mut errors, dst) {
                return Err(Error::Unmappable {
                    unit: u32::from(byte),
                    position,
                    written: dst.len() - start,
                    direction: Direction::Decode,
                });
            }
        }
        self.end(CoderResult::InputEmpty, last);
        Ok(src.len())
    }
}

/// Streaming code point to byte converter.
pub struct Encoder<E = ErrorMode> {
    encoding: &'static Encoding,
    errors: E,
    illegal: usize,
    finished: bool,
    pending: Vec<u8>,
    pending_pos: usize,
}

impl Encoder {
    /// Create an encoder with the default error policy.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self::with_errors(encoding, ErrorMode::default())
    }
}

impl<E: ErrorSink> Encoder<E> {
    /// Create an encoder with a custom error policy.
    pub fn with_errors(encoding: &'static Encoding, errors: E) -> Self {
        Self {
            encoding,
            errors,
            illegal: 0,
            finished: false,
            pending: Vec::new(),
            pending_pos: 0,
        }
    }

    /// The encoding being produced.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Number of units the error policy has been consulted for.
    pub fn illegal_count(&self) -> usize {
        self.illegal
    }

    /// Whether a call with `last` set has consumed and flushed everything.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a replacement sequence is waiting for output space.
    pub fn has_pending(&self) -> bool {
        self.pending_pos < self.pending.len()
    }

    fn begin(&mut self) {
        debug_assert!(!self.finished, "encoder fed after the last chunk");
        self.finished = false;
    }

    fn end(&mut self, last: bool) {
        if last && !self.has_pending() {
            self.finished = true;
            trace!(encoding = self.encoding.name(), "encode finished");
        }
    }

    /// Encode all of `src`, appending to `dst` and growing it as needed.
    ///
    /// Returns the number of bytes appended.
    pub fn encode_from_units(&mut self, src: &[u32], dst: &mut Vec<u8>, last: bool) -> Result<usize> {
        self.begin();
        let start = dst.len();
        self.flush_pending_into(dst);
        let flushed = dst.len() - start;
        let mut errors = Tally {
            inner: &mut self.errors,
            count: &mut self.illegal,
        };
        self.encoding
            .codepoints_to_bytes(src, dst, last, &mut errors)
            .map_err(|err| match err {
                Error::Unmappable {
                    unit,
                    position,
                    written,
                    direction,
                } => Error::Unmappable {
                    unit,
                    position,
                    written: flushed + written,
                    direction,
                },
                other => other,
            })?;
        self.end(last);
        Ok(dst.len() - start)
    }

    /// Encode the characters of `src`, appending to `dst`.
    pub fn encode_str(&mut self, src: &str, dst: &mut Vec<u8>, last: bool) -> Result<usize> {
        let units: Vec<u32> = src.chars().map(u32::from).collect();
        self.encode_from_units(&units, dst, last)
    }

    /// Encode into a fixed-size buffer.
    ///
    /// Returns the result, the number of code points read and the number of
    /// bytes written. A replacement sequence that does not fit is kept and
    /// written first on the next call; its code point counts as read.
    pub fn encode_into(
        &mut self,
        src: &[u32],
        dst: &mut [u8],
        last: bool,
    ) -> Result<(CoderResult, usize, usize)> {
        self.begin();
        let mut written = self.drain_pending(dst);
        if self.has_pending() {
            return Ok((CoderResult::OutputFull, 0, written));
        }
        let encoding = self.encoding;
        for (position, &cp) in src.iter().enumerate() {
            if written == dst.len() {
                trace!(encoding = encoding.name(), read = position, written, "output full");
                return Ok((CoderResult::OutputFull, position, written));
            }
            if let Some(byte) = encoding.encode_unit(cp) {
                dst[written] = byte;
                written += 1;
                continue;
            }
            self.pending.clear();
            self.pending_pos = 0;
            let mut errors = Tally {
                inner: &mut self.errors,
                count: &mut self.illegal,
            };
            if !encoding.replace_unmappable(cp, &mut errors, &mut self.pending) {
                return Err(Error::Unmappable {
                    unit: cp,
                    position,
                    written,
                    direction: Direction::Encode,
                });
            }
            written += self.drain_pending(&mut dst[written..]);
            if self.has_pending() {
                return Ok((CoderResult::OutputFull, position + 1, written));
            }
        }
        self.end(last);
        Ok((CoderResult::InputEmpty, src.len(), written))
    }

    fn drain_pending(&mut self, dst: &mut [u8]) -> usize {
        let rest = &self.pending[self.pending_pos..];
        let n = rest.len().min(dst.len());
        dst[..n].copy_from_slice(&rest[..n]);
        self.pending_pos += n;
        n
    }

    fn flush_pending_into(&mut self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.pending[self.pending_pos..]);
        self.pending_pos = self.pending.len();
    }
}
