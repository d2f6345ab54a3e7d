use std::fmt::{Display, Formatter};

use derive_more::{Deref, From};

use crate::error::{EcsassError, EcsassResult};

/// Pairs of complementary nucleotide codes (upper case). Codes not listed
/// here, and all the other bytes, are their own complement.
const COMPLEMENT_PAIRS: [(u8, u8); 5] = [
    (b'A', b'T'),
    (b'C', b'G'),
    (b'B', b'V'),
    (b'D', b'H'),
    (b'R', b'Y'),
];

const BYTE_TO_COMPLEMENT: [u8; 256] = {
    let mut complements = [0; 256];

    let mut byte = 0;
    while byte < 256 {
        complements[byte] = byte as u8;
        byte += 1;
    }

    let mut i = 0;
    while i < COMPLEMENT_PAIRS.len() {
        let (a, b) = COMPLEMENT_PAIRS[i];
        complements[a as usize] = b;
        complements[b as usize] = a;
        complements[a.to_ascii_lowercase() as usize] = b.to_ascii_lowercase();
        complements[b.to_ascii_lowercase() as usize] = a.to_ascii_lowercase();
        i += 1;
    }

    complements
};

/// Returns the complement of a single nucleotide code, preserving its case.
///
/// # Examples
/// ```
/// use ecsass::sequence::complement;
///
/// assert_eq!(complement(b'A'), b'T');
/// assert_eq!(complement(b'g'), b'c');
/// assert_eq!(complement(b'N'), b'N');
/// ```
#[inline]
#[must_use]
pub fn complement(nucleotide: u8) -> u8 {
    BYTE_TO_COMPLEMENT[nucleotide as usize]
}

/// Longest sequence any operation may produce, in nucleotides.
pub const MAX_SEQUENCE_LEN: usize = u32::MAX as usize;

/// Checks the length of a sequence about to be built; `None` means the
/// length overflowed.
pub(crate) fn check_length(len: Option<usize>) -> EcsassResult<usize> {
    match len {
        Some(len) if len <= MAX_SEQUENCE_LEN => Ok(len),
        _ => Err(EcsassError::SequenceTooLong),
    }
}

/// Nucleotide sequence assembled from an ECSASS recipe.
///
/// The contents are never validated against a nucleotide alphabet. Lengths
/// and slice indices count bytes, one per nucleotide code; a multi-byte
/// UTF-8 character in a literal spans several positions, and slicing
/// through it leaves bytes that are printed as `U+FFFD`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Deref, From)]
pub struct Sequence(Vec<u8>);

impl Sequence {
    /// Creates a new `Sequence` from raw bytes.
    ///
    /// # Examples
    /// ```
    /// use ecsass::sequence::Sequence;
    ///
    /// let seq = Sequence::new("ACGT");
    /// assert_eq!(seq.as_bytes(), b"ACGT");
    /// ```
    #[must_use]
    pub fn new<T: Into<Vec<u8>>>(data: T) -> Self {
        Self(data.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Converts this sequence to a `String`, replacing invalid UTF-8 with
    /// `U+FFFD`.
    #[must_use]
    pub fn into_string(self) -> String {
        match String::from_utf8(self.0) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Returns the reverse complement of this sequence.
    ///
    /// # Examples
    /// ```
    /// use ecsass::sequence::Sequence;
    ///
    /// let seq = Sequence::new("AAACCCCCC");
    /// assert_eq!(seq.reverse_complement(), Sequence::new("GGGGGGTTT"));
    /// ```
    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        Self(self.0.iter().rev().map(|&n| complement(n)).collect())
    }

    /// Returns this sequence repeated `count` times.
    pub fn repeat(&self, count: usize) -> EcsassResult<Self> {
        check_length(self.0.len().checked_mul(count))?;

        Ok(Self(self.0.repeat(count)))
    }

    /// Returns a sequence of `N`s with the same length as this one.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self(vec![b'N'; self.0.len()])
    }

    /// Appends `other` to the end of this sequence.
    pub fn concat(mut self, other: &[u8]) -> EcsassResult<Self> {
        check_length(self.0.len().checked_add(other.len()))?;
        self.0.extend_from_slice(other);

        Ok(self)
    }

    /// Keeps only the half-open range described by `bounds`, counted in
    /// bytes.
    ///
    /// # Examples
    /// ```
    /// use ecsass::sequence::{Sequence, SliceBounds};
    ///
    /// let seq = Sequence::new("AAACCCGGGTTT");
    /// assert_eq!(seq.slice(SliceBounds::new(Some(3), Some(9))), Sequence::new("CCCGGG"));
    /// assert_eq!(seq.slice(SliceBounds::new(None, Some(-3))), Sequence::new("AAACCCGGG"));
    /// ```
    #[must_use]
    pub fn slice(&self, bounds: SliceBounds) -> Self {
        let (start, end) = bounds.normalize(self.0.len());
        if end <= start {
            return Self::default();
        }

        Self(self.0[start..end].to_vec())
    }

    /// Removes the half-open range described by `bounds` and joins the two
    /// remaining flanks.
    ///
    /// An inverted range (end before start) is an error, unless
    /// `ignore_bad_slicing` is set. The flanks are joined regardless, so the
    /// bytes between `end` and `start` then appear twice.
    ///
    /// # Examples
    /// ```
    /// use ecsass::sequence::{Sequence, SliceBounds};
    ///
    /// let seq = Sequence::new("AAACCCGGGTTT");
    /// let inverted = SliceBounds::new(Some(6), Some(2));
    /// assert!(seq.excise(inverted, false).is_err());
    /// assert_eq!(seq.excise(inverted, true).unwrap(), Sequence::new("AAACCCACCCGGGTTT"));
    /// ```
    pub fn excise(&self, bounds: SliceBounds, ignore_bad_slicing: bool) -> EcsassResult<Self> {
        let (start, end) = bounds.normalize(self.0.len());
        if end < start && !ignore_bad_slicing {
            return Err(EcsassError::InvertedExcision(start, end));
        }

        let len = check_length(start.checked_add(self.0.len() - end))?;
        let mut data = Vec::with_capacity(len);
        data.extend_from_slice(&self.0[..start]);
        data.extend_from_slice(&self.0[end..]);
        Ok(Self(data))
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&[u8]> for Sequence {
    fn from(s: &[u8]) -> Self {
        Self::new(s)
    }
}

/// Bounds of a slice, in bytes; negative indices count from the end,
/// missing ones extend to the respective end of the sequence.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SliceBounds {
    pub start: Option<isize>,
    pub end: Option<isize>,
}

impl SliceBounds {
    #[must_use]
    pub const fn new(start: Option<isize>, end: Option<isize>) -> Self {
        Self { start, end }
    }

    /// Resolves the bounds against a sequence of length `len`. Both returned
    /// indices are within `0..=len`, but `end` may be lower than `start`.
    #[must_use]
    pub fn normalize(&self, len: usize) -> (usize, usize) {
        let start = self.start.map_or(0, |index| Self::normalize_index(index, len));
        let end = self
            .end
            .map_or(len, |index| Self::normalize_index(index, len));

        (start, end)
    }

    fn normalize_index(index: isize, len: usize) -> usize {
        if index < 0 {
            len.saturating_sub(index.unsigned_abs())
        } else {
            (index as usize).min(len)
        }
    }
}
