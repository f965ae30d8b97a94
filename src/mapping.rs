//! Forward (byte to code point) and reverse (code point to byte) mapping.
//!
//! Every encoding in the catalogue is one [`Mapping`] value. The conversion
//! algorithms are written once against [`UnitCodec`] and shared by all of
//! them.

use crate::table::{BAD_INPUT, CodeTable};

/// Unit-level conversion capability shared by all single-byte mappings.
pub trait UnitCodec {
    /// Map one byte to a code point, or [`BAD_INPUT`] if it is unassigned.
    fn decode_unit(&self, byte: u8) -> u32;

    /// Map one code point to a byte, or `None` if it has no representation.
    ///
    /// [`BAD_INPUT`] never has a representation.
    fn encode_unit(&self, cp: u32) -> Option<u8>;

    /// Decode `min(src.len(), dst.len())` bytes, returning how many were
    /// converted.
    fn decode_slice(&self, src: &[u8], dst: &mut [u32]) -> usize {
        let n = src.len().min(dst.len());
        for (out, &byte) in dst[..n].iter_mut().zip(&src[..n]) {
            *out = self.decode_unit(byte);
        }
        n
    }
}

/// How an encoding assigns code points to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// Bytes below `limit` are identity-mapped; everything else is unassigned.
    Identity {
        /// One past the highest assigned byte (0x80 for ASCII, 0x100 for
        /// ISO-8859-1).
        limit: u16,
    },
    /// Identity below the table's threshold, table lookup above it.
    Table(CodeTable),
    /// Identity everywhere except bytes `start..end`, which go through the
    /// table. The table only covers the window.
    Window {
        /// Entry `i` is the code point for byte `start + i`.
        table: &'static [u16],
        /// First byte of the window.
        start: u8,
        /// One past the last byte of the window.
        end: u8,
    },
    /// Table lookup with a range of code points whose reverse mapping is
    /// redirected to fixed bytes ahead of the identity rule.
    Override {
        /// Forward table.
        table: CodeTable,
        /// First code point of the redirected range.
        first: u32,
        /// Byte emitted for `first + i`.
        bytes: &'static [u8],
    },
}

impl Mapping {
    /// Code table backing this mapping, if any.
    pub fn code_table(&self) -> Option<CodeTable> {
        match *self {
            Mapping::Table(table) | Mapping::Override { table, .. } => Some(table),
            Mapping::Identity { .. } | Mapping::Window { .. } => None,
        }
    }

    /// Number of byte values with an assigned code point.
    pub fn assigned(&self) -> usize {
        match *self {
            Mapping::Identity { limit } => usize::from(limit),
            Mapping::Table(table) | Mapping::Override { table, .. } => {
                usize::from(table.threshold()) + table.assigned()
            }
            Mapping::Window { table, start, end } => {
                let window = usize::from(end - start);
                256 - window + table.iter().filter(|&&entry| entry != 0).count()
            }
        }
    }
}

impl UnitCodec for Mapping {
    #[inline]
    fn decode_unit(&self, byte: u8) -> u32 {
        match *self {
            Mapping::Identity { limit } => {
                if u16::from(byte) < limit {
                    u32::from(byte)
                } else {
                    BAD_INPUT
                }
            }
            Mapping::Table(table) | Mapping::Override { table, .. } => table.lookup(byte),
            Mapping::Window { table, start, end } => {
                if byte >= start && byte < end {
                    match table[usize::from(byte - start)] {
                        0 => BAD_INPUT,
                        cp => u32::from(cp),
                    }
                } else {
                    u32::from(byte)
                }
            }
        }
    }

    fn encode_unit(&self, cp: u32) -> Option<u8> {
        if cp == BAD_INPUT {
            return None;
        }
        match *self {
            Mapping::Identity { limit } => {
                if cp < u32::from(limit) {
                    Some(cp as u8)
                } else {
                    None
                }
            }
            Mapping::Table(table) => {
                if cp < u32::from(table.threshold()) {
                    Some(cp as u8)
                } else {
                    table.position(cp)
                }
            }
            Mapping::Window { table, start, end } => {
                if cp < 0x100 && (cp < u32::from(start) || cp >= u32::from(end)) {
                    return Some(cp as u8);
                }
                table
                    .iter()
                    .position(|&entry| entry != 0 && u32::from(entry) == cp)
                    .map(|index| start + index as u8)
            }
            Mapping::Override {
                table,
                first,
                bytes,
            } => {
                if let Some(&byte) = cp
                    .checked_sub(first)
                    .and_then(|index| bytes.get(index as usize))
                {
                    return Some(byte);
                }
                if cp < u32::from(table.threshold()) {
                    Some(cp as u8)
                } else {
                    table.position(cp)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables;

    static ASCII: Mapping = Mapping::Identity { limit: 0x80 };
    static LATIN1: Mapping = Mapping::Identity { limit: 0x100 };
    static CP1252: Mapping = Mapping::Window {
        table: &tables::WINDOWS_1252,
        start: 0x80,
        end: 0xA0,
    };
    static ARMSCII8: Mapping = Mapping::Override {
        table: CodeTable::new(0xA0, &tables::ARMSCII_8),
        first: 0x28,
        bytes: &tables::ARMSCII_8_PUNCTUATION,
    };

    #[test]
    fn test_identity_limits() {
        assert_eq!(ASCII.decode_unit(0x7F), 0x7F);
        assert_eq!(ASCII.decode_unit(0x80), BAD_INPUT);
        assert_eq!(ASCII.encode_unit(0x80), None);
        assert_eq!(LATIN1.decode_unit(0xFF), 0xFF);
        assert_eq!(LATIN1.encode_unit(0xFF), Some(0xFF));
        assert_eq!(LATIN1.encode_unit(0x100), None);
    }

    #[test]
    fn test_window_forward() {
        assert_eq!(CP1252.decode_unit(0x41), 0x41);
        assert_eq!(CP1252.decode_unit(0x80), 0x20AC);
        assert_eq!(CP1252.decode_unit(0x81), BAD_INPUT);
        assert_eq!(CP1252.decode_unit(0x9F), 0x0178);
        assert_eq!(CP1252.decode_unit(0xA0), 0xA0);
        assert_eq!(CP1252.decode_unit(0xFF), 0xFF);
    }

    #[test]
    fn test_window_reverse() {
        assert_eq!(CP1252.encode_unit(0x20AC), Some(0x80));
        assert_eq!(CP1252.encode_unit(0x0178), Some(0x9F));
        assert_eq!(CP1252.encode_unit(0xE9), Some(0xE9));
        assert_eq!(CP1252.encode_unit(0x7F), Some(0x7F));
        // C1 controls have no byte in Windows-1252.
        assert_eq!(CP1252.encode_unit(0x81), None);
        assert_eq!(CP1252.encode_unit(0x0100), None);
    }

    #[test]
    fn test_override_reverse_beats_identity() {
        assert_eq!(ARMSCII8.encode_unit(0x29), Some(0xA4));
        assert_eq!(ARMSCII8.encode_unit(0x28), Some(0xA5));
        assert_eq!(ARMSCII8.encode_unit(0x2A), Some(0x2A));
        assert_eq!(ARMSCII8.encode_unit(0x2E), Some(0xA9));
        assert_eq!(ARMSCII8.encode_unit(0x27), Some(0x27));
        assert_eq!(ARMSCII8.encode_unit(0x30), Some(0x30));
    }

    #[test]
    fn test_override_forward_keeps_identity() {
        assert_eq!(ARMSCII8.decode_unit(0x29), 0x29);
        assert_eq!(ARMSCII8.decode_unit(0xA4), 0x29);
        assert_eq!(ARMSCII8.decode_unit(0xA1), BAD_INPUT);
        assert_eq!(ARMSCII8.decode_unit(0xB2), 0x0531);
    }

    #[test]
    fn test_bad_input_never_encodes() {
        for mapping in [ASCII, LATIN1, CP1252, ARMSCII8] {
            assert_eq!(mapping.encode_unit(BAD_INPUT), None);
        }
    }

    #[test]
    fn test_decode_slice_respects_capacity() {
        let mut out = [0u32; 2];
        assert_eq!(CP1252.decode_slice(&[0x80, 0x41, 0x42], &mut out), 2);
        assert_eq!(out, [0x20AC, 0x41]);
    }

    #[test]
    fn test_code_table_only_for_table_mappings() {
        assert_eq!(ASCII.code_table(), None);
        assert_eq!(CP1252.code_table(), None);
        let table = ARMSCII8.code_table().unwrap();
        assert_eq!(table.threshold(), 0xA0);
        assert_eq!(table.entries().len(), 96);
    }

    #[test]
    fn test_assigned_counts() {
        assert_eq!(ASCII.assigned(), 128);
        assert_eq!(LATIN1.assigned(), 256);
        assert_eq!(CP1252.assigned(), 251);
        assert_eq!(ARMSCII8.assigned(), 254);
    }
}
