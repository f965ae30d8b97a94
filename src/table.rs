//! Code tables and the shared lookup primitive.

/// Reserved code-point unit marking a byte that has no meaning in its encoding.
///
/// Forward conversion emits it in place of a code point so the next stage can
/// apply its own error policy. It is never a Unicode scalar value.
pub const BAD_INPUT: u32 = 0xFFFF_FFFE;

/// Immutable description of one encoding's non-identity byte range.
///
/// Bytes below `threshold` map to themselves. Byte `b >= threshold` maps to
/// `entries[b - threshold]`, where a zero entry means "unassigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTable {
    threshold: u8,
    entries: &'static [u16],
}

impl CodeTable {
    /// Create a table covering bytes `threshold..=0xFF`.
    ///
    /// # Panics
    ///
    /// Panics if `entries.len() != 256 - threshold`. Used in a `static`
    /// initializer this is a compile-time error.
    pub const fn new(threshold: u8, entries: &'static [u16]) -> Self {
        assert!(
            entries.len() == 256 - threshold as usize,
            "code table length must equal 256 - threshold"
        );
        Self { threshold, entries }
    }

    /// First byte value that is not identity-mapped.
    #[inline]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Raw table entries, indexed by `byte - threshold`.
    #[inline]
    pub const fn entries(&self) -> &'static [u16] {
        self.entries
    }

    /// Map one byte to its code point, or [`BAD_INPUT`] if it is unassigned.
    #[inline]
    pub fn lookup(&self, byte: u8) -> u32 {
        if byte < self.threshold {
            return u32::from(byte);
        }
        match self.entries[usize::from(byte - self.threshold)] {
            0 => BAD_INPUT,
            cp => u32::from(cp),
        }
    }

    /// Lowest byte at or above the threshold whose entry is `cp`.
    ///
    /// The scan runs from the lowest byte upward, so a table listing the same
    /// code point twice always yields the smaller byte. Zero entries never
    /// match.
    pub fn position(&self, cp: u32) -> Option<u8> {
        if cp == 0 || cp > 0xFFFF {
            return None;
        }
        self.entries
            .iter()
            .position(|&entry| u32::from(entry) == cp)
            .map(|index| self.threshold + index as u8)
    }

    /// Number of bytes at or above the threshold with an assigned code point.
    pub fn assigned(&self) -> usize {
        self.entries.iter().filter(|&&entry| entry != 0).count()
    }
}
