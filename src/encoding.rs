//! Encoding descriptors and the process-wide catalogue.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::mapping::{Mapping, UnitCodec};
use crate::sink::{Direction, ErrorSink, Recovery, SinkError, UnitSink};
use crate::stream::{Decoder, Encoder};
use crate::table::{BAD_INPUT, CodeTable};
use crate::{Error, Result, tables};

/// Identity of a catalogue encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(non_camel_case_types)]
pub enum EncodingId {
    /// US-ASCII (7-bit)
    Ascii,
    /// ISO-8859-1 (Latin-1)
    Iso8859_1,
    /// ISO-8859-2 (Latin-2)
    Iso8859_2,
    /// ISO-8859-3 (Latin-3)
    Iso8859_3,
    /// ISO-8859-4 (Latin-4)
    Iso8859_4,
    /// ISO-8859-5 (Cyrillic)
    Iso8859_5,
    /// ISO-8859-6 (Arabic)
    Iso8859_6,
    /// ISO-8859-7 (Greek)
    Iso8859_7,
    /// ISO-8859-8 (Hebrew)
    Iso8859_8,
    /// ISO-8859-9 (Latin-5, Turkish)
    Iso8859_9,
    /// ISO-8859-10 (Latin-6, Nordic)
    Iso8859_10,
    /// ISO-8859-13 (Latin-7, Baltic Rim)
    Iso8859_13,
    /// ISO-8859-14 (Latin-8, Celtic)
    Iso8859_14,
    /// ISO-8859-15 (Latin-9)
    Iso8859_15,
    /// ISO-8859-16 (Latin-10)
    Iso8859_16,
    /// Windows-1251 (Cyrillic)
    Windows1251,
    /// Windows-1252 (Western European)
    Windows1252,
    /// Windows-1254 (Turkish)
    Windows1254,
    /// DOS code page 866 (Russian)
    Cp866,
    /// DOS code page 850 (Western European)
    Cp850,
    /// KOI8-R (Russian)
    Koi8R,
    /// KOI8-U (Ukrainian)
    Koi8U,
    /// ArmSCII-8 (Armenian)
    ArmScii8,
}

/// Broad class of an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum EncodingClass {
    /// Exactly one byte per code point.
    SingleByte,
}

/// Immutable descriptor of one encoding.
///
/// Descriptors are `static` items and are always handled as
/// `&'static Encoding`.
pub struct Encoding {
    id: EncodingId,
    name: &'static str,
    mime_name: &'static str,
    aliases: &'static [&'static str],
    class: EncodingClass,
    mapping: Mapping,
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encoding {{ {} }}", self.name)
    }
}

impl PartialEq for Encoding {
    fn eq(&self, other: &Encoding) -> bool {
        self.id == other.id
    }
}

impl Eq for Encoding {}

macro_rules! single_byte {
    ($id:ident, $name:expr, $mime:expr, [$($alias:expr),* $(,)?], $mapping:expr) => {
        Encoding {
            id: EncodingId::$id,
            name: $name,
            mime_name: $mime,
            aliases: &[$($alias),*],
            class: EncodingClass::SingleByte,
            mapping: $mapping,
        }
    };
}

/// US-ASCII.
pub static ASCII: Encoding = single_byte!(
    Ascii,
    "ASCII",
    "US-ASCII",
    [
        "US-ASCII",
        "ANSI_X3.4-1968",
        "iso-ir-6",
        "ANSI_X3.4-1986",
        "ISO_646.irv:1991",
        "ISO646-US",
        "us",
        "IBM367",
        "IBM-367",
        "cp367",
        "csASCII",
    ],
    Mapping::Identity { limit: 0x80 }
);

/// ISO-8859-1. Every byte maps to the code point of the same value.
pub static ISO_8859_1: Encoding = single_byte!(
    Iso8859_1,
    "ISO-8859-1",
    "ISO-8859-1",
    ["ISO8859-1", "latin1"],
    Mapping::Identity { limit: 0x100 }
);

/// ISO-8859-2 (Latin-2).
pub static ISO_8859_2: Encoding = single_byte!(
    Iso8859_2,
    "ISO-8859-2",
    "ISO-8859-2",
    ["ISO8859-2", "latin2"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_2))
);

/// ISO-8859-3 (Latin-3).
pub static ISO_8859_3: Encoding = single_byte!(
    Iso8859_3,
    "ISO-8859-3",
    "ISO-8859-3",
    ["ISO8859-3", "latin3"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_3))
);

/// ISO-8859-4 (Latin-4).
pub static ISO_8859_4: Encoding = single_byte!(
    Iso8859_4,
    "ISO-8859-4",
    "ISO-8859-4",
    ["ISO8859-4", "latin4"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_4))
);

/// ISO-8859-5 (Cyrillic).
pub static ISO_8859_5: Encoding = single_byte!(
    Iso8859_5,
    "ISO-8859-5",
    "ISO-8859-5",
    ["ISO8859-5", "cyrillic"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_5))
);

/// ISO-8859-6 (Arabic).
pub static ISO_8859_6: Encoding = single_byte!(
    Iso8859_6,
    "ISO-8859-6",
    "ISO-8859-6",
    ["ISO8859-6", "arabic"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_6))
);

/// ISO-8859-7 (Greek).
pub static ISO_8859_7: Encoding = single_byte!(
    Iso8859_7,
    "ISO-8859-7",
    "ISO-8859-7",
    ["ISO8859-7", "greek"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_7))
);

/// ISO-8859-8 (Hebrew).
pub static ISO_8859_8: Encoding = single_byte!(
    Iso8859_8,
    "ISO-8859-8",
    "ISO-8859-8",
    ["ISO8859-8", "hebrew"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_8))
);

/// ISO-8859-9 (Latin-5).
pub static ISO_8859_9: Encoding = single_byte!(
    Iso8859_9,
    "ISO-8859-9",
    "ISO-8859-9",
    ["ISO8859-9", "latin5"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_9))
);

/// ISO-8859-10 (Latin-6).
pub static ISO_8859_10: Encoding = single_byte!(
    Iso8859_10,
    "ISO-8859-10",
    "ISO-8859-10",
    ["ISO8859-10", "latin6"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_10))
);

/// ISO-8859-13 (Latin-7).
pub static ISO_8859_13: Encoding = single_byte!(
    Iso8859_13,
    "ISO-8859-13",
    "ISO-8859-13",
    ["ISO8859-13"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_13))
);

/// ISO-8859-14 (Latin-8).
pub static ISO_8859_14: Encoding = single_byte!(
    Iso8859_14,
    "ISO-8859-14",
    "ISO-8859-14",
    ["ISO8859-14", "latin8"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_14))
);

/// ISO-8859-15 (Latin-9).
pub static ISO_8859_15: Encoding = single_byte!(
    Iso8859_15,
    "ISO-8859-15",
    "ISO-8859-15",
    ["ISO8859-15"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_15))
);

/// ISO-8859-16 (Latin-10).
pub static ISO_8859_16: Encoding = single_byte!(
    Iso8859_16,
    "ISO-8859-16",
    "ISO-8859-16",
    ["ISO8859-16"],
    Mapping::Table(CodeTable::new(0xA0, &tables::ISO_8859_16))
);

/// Windows-1251.
pub static WINDOWS_1251: Encoding = single_byte!(
    Windows1251,
    "Windows-1251",
    "Windows-1251",
    ["CP1251", "CP-1251", "WINDOWS-1251"],
    Mapping::Table(CodeTable::new(0x80, &tables::WINDOWS_1251))
);

/// Windows-1252. Only bytes 0x80 to 0x9F differ from ISO-8859-1.
pub static WINDOWS_1252: Encoding = single_byte!(
    Windows1252,
    "Windows-1252",
    "Windows-1252",
    ["cp1252"],
    Mapping::Window {
        table: &tables::WINDOWS_1252,
        start: 0x80,
        end: 0xA0,
    }
);

/// Windows-1254.
pub static WINDOWS_1254: Encoding = single_byte!(
    Windows1254,
    "Windows-1254",
    "Windows-1254",
    ["CP1254", "CP-1254", "WINDOWS-1254"],
    Mapping::Table(CodeTable::new(0x80, &tables::WINDOWS_1254))
);

/// CP866.
pub static CP866: Encoding = single_byte!(
    Cp866,
    "CP866",
    "CP866",
    ["CP-866", "IBM866", "IBM-866"],
    Mapping::Table(CodeTable::new(0x80, &tables::CP866))
);

/// CP850.
pub static CP850: Encoding = single_byte!(
    Cp850,
    "CP850",
    "CP850",
    ["CP-850", "IBM850", "IBM-850"],
    Mapping::Table(CodeTable::new(0x80, &tables::CP850))
);

/// KOI8-R.
pub static KOI8_R: Encoding = single_byte!(
    Koi8R,
    "KOI8-R",
    "KOI8-R",
    ["KOI8R"],
    Mapping::Table(CodeTable::new(0x80, &tables::KOI8_R))
);

/// KOI8-U.
pub static KOI8_U: Encoding = single_byte!(
    Koi8U,
    "KOI8-U",
    "KOI8-U",
    ["KOI8U"],
    Mapping::Table(CodeTable::new(0x80, &tables::KOI8_U))
);

/// ArmSCII-8. Decodes like any table-driven encoding, but encodes the ASCII
/// punctuation `(`, `)`, `,`, `-` and `.` to their Armenian-range bytes.
pub static ARMSCII_8: Encoding = single_byte!(
    ArmScii8,
    "ArmSCII-8",
    "ArmSCII-8",
    ["ArmSCII8", "ARMSCII-8", "ARMSCII8"],
    Mapping::Override {
        table: CodeTable::new(0xA0, &tables::ARMSCII_8),
        first: 0x28,
        bytes: &tables::ARMSCII_8_PUNCTUATION,
    }
);

static ENCODINGS: [&Encoding; 23] = [
    &ASCII,
    &ISO_8859_1,
    &ISO_8859_2,
    &ISO_8859_3,
    &ISO_8859_4,
    &ISO_8859_5,
    &ISO_8859_6,
    &ISO_8859_7,
    &ISO_8859_8,
    &ISO_8859_9,
    &ISO_8859_10,
    &ISO_8859_13,
    &ISO_8859_14,
    &ISO_8859_15,
    &ISO_8859_16,
    &WINDOWS_1251,
    &WINDOWS_1252,
    &WINDOWS_1254,
    &CP866,
    &CP850,
    &KOI8_R,
    &KOI8_U,
    &ARMSCII_8,
];

impl Encoding {
    /// Every encoding in the catalogue, in a stable order.
    pub fn all() -> &'static [&'static Encoding] {
        &ENCODINGS
    }

    /// Resolve a name, MIME name or alias, ignoring ASCII case and
    /// surrounding whitespace.
    pub fn for_label(label: &str) -> Option<&'static Encoding> {
        let label = label.trim_matches(|c: char| c.is_ascii_whitespace());
        ENCODINGS.iter().copied().find(|encoding| {
            encoding.name.eq_ignore_ascii_case(label)
                || encoding.mime_name.eq_ignore_ascii_case(label)
                || encoding
                    .aliases
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(label))
        })
    }

    /// Like [`Encoding::for_label`], but reports unknown labels as an error.
    pub fn require(label: &str) -> Result<&'static Encoding> {
        Self::for_label(label).ok_or_else(|| Error::UnknownEncoding(label.to_string()))
    }

    /// Descriptor for `id`.
    pub fn for_id(id: EncodingId) -> &'static Encoding {
        match id {
            EncodingId::Ascii => &ASCII,
            EncodingId::Iso8859_1 => &ISO_8859_1,
            EncodingId::Iso8859_2 => &ISO_8859_2,
            EncodingId::Iso8859_3 => &ISO_8859_3,
            EncodingId::Iso8859_4 => &ISO_8859_4,
            EncodingId::Iso8859_5 => &ISO_8859_5,
            EncodingId::Iso8859_6 => &ISO_8859_6,
            EncodingId::Iso8859_7 => &ISO_8859_7,
            EncodingId::Iso8859_8 => &ISO_8859_8,
            EncodingId::Iso8859_9 => &ISO_8859_9,
            EncodingId::Iso8859_10 => &ISO_8859_10,
            EncodingId::Iso8859_13 => &ISO_8859_13,
            EncodingId::Iso8859_14 => &ISO_8859_14,
            EncodingId::Iso8859_15 => &ISO_8859_15,
            EncodingId::Iso8859_16 => &ISO_8859_16,
            EncodingId::Windows1251 => &WINDOWS_1251,
            EncodingId::Windows1252 => &WINDOWS_1252,
            EncodingId::Windows1254 => &WINDOWS_1254,
            EncodingId::Cp866 => &CP866,
            EncodingId::Cp850 => &CP850,
            EncodingId::Koi8R => &KOI8_R,
            EncodingId::Koi8U => &KOI8_U,
            EncodingId::ArmScii8 => &ARMSCII_8,
        }
    }

    /// Identity of this encoding.
    pub fn id(&self) -> EncodingId {
        self.id
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name for MIME `charset` parameters.
    pub fn mime_name(&self) -> &'static str {
        self.mime_name
    }

    /// Alternative labels accepted by [`Encoding::for_label`].
    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// Encoding class tag.
    pub fn class(&self) -> EncodingClass {
        self.class
    }

    /// How bytes and code points correspond.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Whether bytes 0x00 to 0x7F mean the ASCII characters of the same value.
    pub fn is_ascii_compatible(&self) -> bool {
        (0..0x80u8).all(|b| self.decode_unit(b) == u32::from(b))
    }

    /// Decode one byte, or the "invalid upstream" marker (`None`), into `sink`.
    pub fn decode_unit_to<S>(
        &self,
        input: Option<u8>,
        sink: &mut S,
    ) -> std::result::Result<(), SinkError>
    where
        S: UnitSink<u32> + ?Sized,
    {
        let unit = match input {
            Some(byte) => self.decode_unit(byte),
            None => BAD_INPUT,
        };
        sink.put(unit)
    }

    /// Encode one code point into `sink`, consulting `errors` if it has no
    /// byte.
    ///
    /// A replacement sequence goes to the sink through
    /// [`UnitSink::put_all`], so a bounded sink takes all of it or none.
    /// Sink failures name `cp`.
    pub fn encode_unit_to<S, E>(&self, cp: u32, sink: &mut S, errors: &mut E) -> Result<()>
    where
        S: UnitSink<u8> + ?Sized,
        E: ErrorSink + ?Sized,
    {
        let rejected = |_| SinkError { unit: cp };
        if let Some(byte) = self.encode_unit(cp) {
            sink.put(byte).map_err(rejected)?;
            return Ok(());
        }
        let mut replacement = Vec::new();
        if !self.replace_unmappable(cp, errors, &mut replacement) {
            return Err(Error::Unmappable {
                unit: cp,
                position: 0,
                written: 0,
                direction: Direction::Encode,
            });
        }
        sink.put_all(&replacement).map_err(rejected)?;
        Ok(())
    }

    /// Decode as many bytes of `input` as `out` has room for.
    ///
    /// `input` is advanced past the consumed bytes. Returns the number of
    /// code points written, which always equals the number of bytes consumed.
    pub fn bytes_to_codepoints(&self, input: &mut &[u8], out: &mut [u32]) -> usize {
        let n = self.mapping.decode_slice(input, out);
        *input = &input[n..];
        n
    }

    /// Encode all of `input`, appending to `out` and growing it as needed.
    ///
    /// Single-byte encodings carry no state between calls, so `end` only
    /// marks the stream as complete in the trace log.
    pub fn codepoints_to_bytes<E>(
        &self,
        input: &[u32],
        out: &mut Vec<u8>,
        end: bool,
        errors: &mut E,
    ) -> Result<()>
    where
        E: ErrorSink + ?Sized,
    {
        let start = out.len();
        let mut replacement = Vec::new();
        reserve(out, input.len(), input.first().copied())?;
        for (position, &cp) in input.iter().enumerate() {
            if let Some(byte) = self.encode_unit(cp) {
                out.push(byte);
                continue;
            }
            replacement.clear();
            if !self.replace_unmappable(cp, errors, &mut replacement) {
                return Err(Error::Unmappable {
                    unit: cp,
                    position,
                    written: out.len() - start,
                    direction: Direction::Encode,
                });
            }
            let remaining = input.len() - position - 1;
            reserve(out, remaining + replacement.len(), Some(cp))?;
            out.extend_from_slice(&replacement);
        }
        if end {
            tracing::trace!(encoding = self.name, written = out.len() - start, "encode finished");
        }
        Ok(())
    }

    /// Create a decoder using the default error policy.
    pub fn new_decoder(&'static self) -> Decoder {
        Decoder::new(self)
    }

    /// Create an encoder using the default error policy.
    pub fn new_encoder(&'static self) -> Encoder {
        Encoder::new(self)
    }

    /// Ask `errors` how to recover from `cp` and append the resulting bytes.
    ///
    /// Replacement characters that are themselves unmappable become `?`.
    /// Returns `false` if the sink chose to abort.
    pub(crate) fn replace_unmappable<E>(&self, cp: u32, errors: &mut E, out: &mut Vec<u8>) -> bool
    where
        E: ErrorSink + ?Sized,
    {
        let recovery = errors.unmappable(cp, Direction::Encode);
        debug!(encoding = self.name, unit = cp, ?recovery, "unmappable code point");
        match recovery {
            Recovery::Substitute(c) => out.push(self.encode_unit(c as u32).unwrap_or(b'?')),
            Recovery::Escape(seq) => {
                out.extend(seq.chars().map(|c| self.encode_unit(c as u32).unwrap_or(b'?')))
            }
            Recovery::Skip => {}
            Recovery::Abort => return false,
        }
        true
    }

    /// Ask `errors` how to recover from an unassigned `byte` and append the
    /// resulting text. Returns `false` if the sink chose to abort.
    pub(crate) fn replace_undecodable<E>(&self, byte: u8, errors: &mut E, out: &mut String) -> bool
    where
        E: ErrorSink + ?Sized,
    {
        let recovery = errors.unmappable(u32::from(byte), Direction::Decode);
        debug!(encoding = self.name, unit = byte, ?recovery, "unassigned byte");
        match recovery {
            Recovery::Substitute(c) => out.push(c),
            Recovery::Escape(seq) => out.push_str(&seq),
            Recovery::Skip => {}
            Recovery::Abort => return false,
        }
        true
    }
}

impl UnitCodec for Encoding {
    #[inline]
    fn decode_unit(&self, byte: u8) -> u32 {
        self.mapping.decode_unit(byte)
    }

    #[inline]
    fn encode_unit(&self, cp: u32) -> Option<u8> {
        self.mapping.encode_unit(cp)
    }
}

fn reserve(out: &mut Vec<u8>, additional: usize, unit: Option<u32>) -> Result<()> {
    out.try_reserve(additional).map_err(|_| {
        Error::SinkFailure(SinkError {
            unit: unit.unwrap_or(BAD_INPUT),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Counter, ErrorMode, SliceSink};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_lookup_is_case_insensitive() {
        assert_eq!(Encoding::for_label("latin1"), Some(&ISO_8859_1));
        assert_eq!(Encoding::for_label("LATIN1"), Some(&ISO_8859_1));
        assert_eq!(Encoding::for_label(" iso-8859-7 "), Some(&ISO_8859_7));
        assert_eq!(Encoding::for_label("cp367"), Some(&ASCII));
        assert_eq!(Encoding::for_label("us-ascii"), Some(&ASCII));
        assert_eq!(Encoding::for_label("ibm866"), Some(&CP866));
        assert_eq!(Encoding::for_label("armscii8"), Some(&ARMSCII_8));
        assert_eq!(Encoding::for_label("utf-8"), None);
    }

    #[test]
    fn test_require_reports_unknown_label() {
        assert_eq!(
            Encoding::require("EBCDIC"),
            Err(Error::UnknownEncoding("EBCDIC".to_string()))
        );
    }

    #[test]
    fn test_labels_are_unique_across_catalogue() {
        let mut seen: Vec<(String, EncodingId)> = Vec::new();
        for encoding in Encoding::all() {
            let labels = [encoding.name(), encoding.mime_name()]
                .into_iter()
                .chain(encoding.aliases().iter().copied());
            for label in labels {
                let label = label.to_ascii_lowercase();
                if let Some((_, owner)) = seen.iter().find(|(l, _)| *l == label) {
                    assert_eq!(*owner, encoding.id(), "label {label} is ambiguous");
                }
                seen.push((label, encoding.id()));
            }
        }
    }

    #[test]
    fn test_catalogue_descriptors() {
        assert_eq!(Encoding::all().len(), 23);
        for encoding in Encoding::all() {
            assert!(!encoding.aliases().is_empty(), "{} has no aliases", encoding.name());
            assert_eq!(encoding.class(), EncodingClass::SingleByte);
            assert_eq!(Encoding::for_id(encoding.id()), *encoding);
            assert!(encoding.is_ascii_compatible());
        }
        assert_eq!(ASCII.mime_name(), "US-ASCII");
    }

    #[test]
    fn test_greek_alpha() {
        assert_eq!(ISO_8859_7.decode_unit(0xE1), 0x03B1);
        assert_eq!(ISO_8859_7.encode_unit(0x03B1), Some(0xE1));
    }

    #[test]
    fn test_windows_1252_euro_and_hole() {
        assert_eq!(WINDOWS_1252.decode_unit(0x80), 0x20AC);
        assert_eq!(WINDOWS_1252.decode_unit(0x81), BAD_INPUT);
    }

    #[test]
    fn test_armscii8_parenthesis() {
        assert_eq!(ARMSCII_8.encode_unit(0x29), Some(0xA4));
        assert_ne!(ARMSCII_8.encode_unit(0x29), Some(0x29));
    }

    #[test]
    fn test_decode_unit_to_flags_invalid_input() {
        let mut out: Vec<u32> = Vec::new();
        KOI8_R.decode_unit_to(Some(0xC1), &mut out).unwrap();
        KOI8_R.decode_unit_to(None, &mut out).unwrap();
        assert_eq!(out, vec![0x0430, BAD_INPUT]);
    }

    #[test]
    fn test_encode_unit_to_substitutes() {
        let mut out: Vec<u8> = Vec::new();
        let mut mode = ErrorMode::default();
        WINDOWS_1251.encode_unit_to(0x0416, &mut out, &mut mode).unwrap();
        WINDOWS_1251.encode_unit_to(0x4E2D, &mut out, &mut mode).unwrap();
        assert_eq!(out, vec![0xC6, b'?']);
    }

    #[test]
    fn test_encode_unit_to_strict_aborts() {
        let mut out = Counter::default();
        let err = ISO_8859_5
            .encode_unit_to(0x20AC, &mut out, &mut ErrorMode::Strict)
            .unwrap_err();
        assert!(matches!(err, Error::Unmappable { unit: 0x20AC, .. }));
        assert_eq!(out.count, 0);
    }

    #[test]
    fn test_encode_unit_to_propagates_sink_failure() {
        let mut buf = [0u8; 0];
        let mut sink = SliceSink::new(&mut buf);
        let err = ASCII
            .encode_unit_to(0x41, &mut sink, &mut ErrorMode::default())
            .unwrap_err();
        assert_eq!(err, Error::SinkFailure(SinkError { unit: 0x41 }));
    }

    #[test]
    fn test_encode_unit_to_escape_is_all_or_nothing() {
        let mut buf = [0u8; 4];
        let mut sink = SliceSink::new(&mut buf);
        let err = ISO_8859_1
            .encode_unit_to(0x4E2D, &mut sink, &mut ErrorMode::Entity)
            .unwrap_err();
        assert_eq!(err, Error::SinkFailure(SinkError { unit: 0x4E2D }));
        assert_eq!(sink.written(), b"");

        ISO_8859_1
            .encode_unit_to(0xE9, &mut sink, &mut ErrorMode::Entity)
            .unwrap();
        assert_eq!(sink.written(), &[0xE9]);
    }

    #[test]
    fn test_bytes_to_codepoints_advances_input() {
        let data = [0xE1u8, 0xE2, 0x41];
        let mut input = &data[..];
        let mut out = [0u32; 2];
        assert_eq!(ISO_8859_7.bytes_to_codepoints(&mut input, &mut out), 2);
        assert_eq!(out, [0x03B1, 0x03B2]);
        assert_eq!(input, &[0x41]);
    }

    #[test]
    fn test_codepoints_to_bytes_with_escapes() {
        let mut out = b"> ".to_vec();
        ISO_8859_15
            .codepoints_to_bytes(&[0x41, 0x20AC, 0x4E2D, 0x42], &mut out, true, &mut ErrorMode::Entity)
            .unwrap();
        assert_eq!(out, b"> A\xA4&#x4E2D;B".to_vec());
    }

    #[test]
    fn test_codepoints_to_bytes_strict_keeps_prefix() {
        let mut out = Vec::new();
        let err = KOI8_U
            .codepoints_to_bytes(&[0x41, 0x42, 0x20AC], &mut out, true, &mut ErrorMode::Strict)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Unmappable {
                unit: 0x20AC,
                position: 2,
                written: 2,
                direction: Direction::Encode,
            }
        );
        assert_eq!(out, b"AB".to_vec());
    }
}
