//! # fast-sbcs - Table-Driven Single-Byte Encoding Conversion
//!
//! Converts byte streams in legacy single-byte encodings (the ISO-8859
//! family, Windows and DOS code pages, KOI8, ArmSCII, ASCII) to Unicode code
//! points and back.
//!
//! ## Features
//!
//! - **One algorithm, many tables**: every encoding is a [`Mapping`] value
//!   driven by the same forward and reverse lookup code
//! - **Streaming support** over caller-supplied buffers of any size
//! - **Pluggable error policies** for unmappable input, from `?` substitution
//!   to `U+XXXX` escapes or a hard stop
//! - **Thread-safe**: the catalogue is immutable `static` data
//!
//! ## Quick Start
//!
//! ```rust
//! use fast_sbcs::{Encoding, ISO_8859_7};
//!
//! let mut decoder = ISO_8859_7.new_decoder();
//! let mut text = String::new();
//! decoder.decode_to_string(&[0xE1, 0xE2, 0xE3], &mut text, true).unwrap();
//! assert_eq!(text, "αβγ");
//!
//! let koi8 = Encoding::for_label("koi8r").unwrap();
//! let mut bytes = Vec::new();
//! koi8.new_encoder().encode_str("мир", &mut bytes, true).unwrap();
//! assert_eq!(bytes, [0xCD, 0xC9, 0xD2]);
//! ```

#![deny(missing_docs)]

use thiserror::Error;

pub mod encoding;
pub mod filter;
pub mod mapping;
pub mod sink;
pub mod stream;
pub mod table;
mod tables;

pub use encoding::{
    ARMSCII_8, ASCII, CP850, CP866, Encoding, EncodingClass, EncodingId, ISO_8859_1, ISO_8859_2,
    ISO_8859_3, ISO_8859_4, ISO_8859_5, ISO_8859_6, ISO_8859_7, ISO_8859_8, ISO_8859_9,
    ISO_8859_10, ISO_8859_13, ISO_8859_14, ISO_8859_15, ISO_8859_16, KOI8_R, KOI8_U, WINDOWS_1251,
    WINDOWS_1252, WINDOWS_1254,
};
pub use filter::{DecodeFilter, EncodeFilter};
pub use mapping::{Mapping, UnitCodec};
pub use sink::{Direction, ErrorMode, ErrorSink, Recovery, SinkError, UnitSink};
pub use stream::{CoderResult, ConvertOptions, Cursor, Decoder, Encoder};
pub use table::{BAD_INPUT, CodeTable};

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during conversion
///
/// A full output buffer is not an error; it is reported as
/// [`CoderResult::OutputFull`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The error policy aborted on a unit with no mapping
    #[error("cannot {direction} unit 0x{unit:X} at position {position}")]
    Unmappable {
        /// The offending byte or code point
        unit: u32,
        /// Index of the unit in the input of the failing call
        position: usize,
        /// Output units committed by the failing call before it stopped
        written: usize,
        /// Which way the conversion was going
        direction: Direction,
    },
    /// The output sink refused a unit, or the output buffer could not grow
    #[error(transparent)]
    SinkFailure(#[from] SinkError),
    /// A resumed conversion was handed a cursor outside its buffers
    #[error("cursor (read {read}, written {written}) lies outside the supplied buffers")]
    InvalidCursor {
        /// Cursor input position
        read: usize,
        /// Cursor output position
        written: usize,
    },
    /// No encoding in the catalogue answers to this label
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Unmappable {
            unit: 0x20AC,
            position: 3,
            written: 3,
            direction: Direction::Encode,
        };
        assert_eq!(err.to_string(), "cannot encode unit 0x20AC at position 3");
        assert_eq!(
            Error::from(SinkError { unit: 0x41 }).to_string(),
            "output sink rejected unit 0x41"
        );
        assert_eq!(
            Error::UnknownEncoding("EBCDIC".into()).to_string(),
            "unknown encoding: EBCDIC"
        );
    }

    #[test]
    fn test_catalogue_is_shareable_across_threads() {
        fn assert_sync<T: Sync>(_: &T) {}
        assert_sync(&ISO_8859_7);
        assert_sync(&CodeTable::new(0x80, &tables::KOI8_R));
    }
}
