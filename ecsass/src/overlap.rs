//! Error-tolerant merging of a shared motif at the junction of two
//! sequences (`~+`) or at the seams of a tandem repeat (`~*`).

use std::ops::RangeInclusive;

use log::trace;

use crate::error::EcsassResult;
use crate::sequence::{check_length, Sequence};

/// How to choose a nucleotide at a position where the two overlapping
/// windows disagree.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MismatchMode {
    /// Emit `N`.
    #[default]
    UseN,
    /// Emit the nucleotide of the first (5') sequence.
    UseFirstSeq,
    /// Emit the nucleotide of the second (3') sequence.
    UseSecondSeq,
}

impl MismatchMode {
    pub const VALUES: [MismatchMode; 3] = [
        MismatchMode::UseN,
        MismatchMode::UseFirstSeq,
        MismatchMode::UseSecondSeq,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MismatchMode::UseN => "n",
            MismatchMode::UseFirstSeq => "first",
            MismatchMode::UseSecondSeq => "second",
        }
    }

    #[inline]
    #[must_use]
    pub fn resolve(&self, first: u8, second: u8) -> u8 {
        if first == second {
            return first;
        }

        match self {
            MismatchMode::UseN => b'N',
            MismatchMode::UseFirstSeq => first,
            MismatchMode::UseSecondSeq => second,
        }
    }
}

/// Overlap window sizes in the order they should be tried. The first size
/// that qualifies is used, regardless of whether a later one would have
/// fewer mismatches.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct WindowPreference(Vec<usize>);

impl WindowPreference {
    /// Tries the sizes in `min..=max` from the largest to the smallest.
    ///
    /// # Examples
    /// ```
    /// use ecsass::overlap::WindowPreference;
    ///
    /// let windows = WindowPreference::largest_first(2, 4);
    /// assert_eq!(windows.sizes(), &[4, 3, 2]);
    /// ```
    #[must_use]
    pub fn largest_first(min: usize, max: usize) -> Self {
        Self::from_iter(Self::range(min, max).rev())
    }

    /// Tries the sizes in `min..=max` from the smallest to the largest.
    #[must_use]
    pub fn smallest_first(min: usize, max: usize) -> Self {
        Self::from_iter(Self::range(min, max))
    }

    fn range(min: usize, max: usize) -> RangeInclusive<usize> {
        min.max(1)..=max
    }

    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WindowPreference {
    fn default() -> Self {
        Self::largest_first(4, 100)
    }
}

impl FromIterator<usize> for WindowPreference {
    /// Zero-sized windows are dropped.
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().filter(|&size| size > 0).collect())
    }
}

impl From<Vec<usize>> for WindowPreference {
    fn from(sizes: Vec<usize>) -> Self {
        sizes.into_iter().collect()
    }
}

impl From<&[usize]> for WindowPreference {
    fn from(sizes: &[usize]) -> Self {
        sizes.iter().copied().collect()
    }
}

/// Returns the first window size (in preference order) for which the last
/// `size` nucleotides of `seq1` differ from the first `size` nucleotides of
/// `seq2` at no more than `error_max` positions.
///
/// Sizes larger than either sequence are skipped.
///
/// # Examples
/// ```
/// use ecsass::overlap::{find_overlap, WindowPreference};
///
/// let windows = WindowPreference::from(vec![6, 4]);
/// assert_eq!(find_overlap(b"NNNNNAACC", b"AACCNNNNN", &windows, 0), Some(4));
/// assert_eq!(find_overlap(b"NNNNNAACC", b"AACCNNNNN", &windows, 6), Some(6));
/// assert_eq!(find_overlap(b"AAAA", b"TTTT", &windows, 0), None);
/// ```
#[must_use]
pub fn find_overlap(
    seq1: &[u8],
    seq2: &[u8],
    windows: &WindowPreference,
    error_max: usize,
) -> Option<usize> {
    let max_size = seq1.len().min(seq2.len());

    windows
        .sizes()
        .iter()
        .copied()
        .filter(|&size| size <= max_size)
        .find(|&size| {
            let tail = &seq1[seq1.len() - size..];
            let head = &seq2[..size];
            within_error_budget(tail, head, error_max)
        })
}

fn within_error_budget(a: &[u8], b: &[u8], error_max: usize) -> bool {
    let mut errors = 0;
    for (x, y) in a.iter().zip(b) {
        if x != y {
            errors += 1;
            if errors > error_max {
                return false;
            }
        }
    }

    true
}

/// Merges the last `size` nucleotides of `seq1` with the first `size`
/// nucleotides of `seq2`, resolving mismatches with `mode`.
///
/// # Panics
/// This function panics if `size` exceeds the length of either sequence.
#[must_use]
pub fn build_junction(seq1: &[u8], seq2: &[u8], size: usize, mode: MismatchMode) -> Vec<u8> {
    let tail = &seq1[seq1.len() - size..];
    let head = &seq2[..size];

    tail.iter()
        .zip(head)
        .map(|(&first, &second)| mode.resolve(first, second))
        .collect()
}

/// Parameters of the overlap search shared by `~+` and `~*`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct OverlapParams {
    windows: WindowPreference,
    error_max: usize,
    mismatch_mode: MismatchMode,
}

impl OverlapParams {
    #[must_use]
    pub fn new(windows: WindowPreference, error_max: usize, mismatch_mode: MismatchMode) -> Self {
        Self {
            windows,
            error_max,
            mismatch_mode,
        }
    }

    #[must_use]
    pub fn windows(&self) -> &WindowPreference {
        &self.windows
    }

    #[must_use]
    pub fn error_max(&self) -> usize {
        self.error_max
    }

    #[must_use]
    pub fn mismatch_mode(&self) -> MismatchMode {
        self.mismatch_mode
    }

    /// Overlap-joins two sequences; falls back to plain concatenation if no
    /// window qualifies.
    ///
    /// # Examples
    /// ```
    /// use ecsass::overlap::{MismatchMode, OverlapParams, WindowPreference};
    /// use ecsass::sequence::Sequence;
    ///
    /// let params = OverlapParams::new(WindowPreference::from(vec![4]), 0, MismatchMode::UseN);
    /// let joined = params.join(b"NNNNNAACC", b"AACCNNNNN").unwrap();
    /// assert_eq!(joined, Sequence::from("NNNNNAACCNNNNN"));
    /// ```
    pub fn join(&self, left: &[u8], right: &[u8]) -> EcsassResult<Sequence> {
        let size = match find_overlap(left, right, &self.windows, self.error_max) {
            Some(size) => size,
            None => {
                trace!("No overlap window qualifies; joining without overlap");
                return Sequence::new(left).concat(right);
            }
        };
        trace!("Joining with an overlap window of {}", size);

        let len = check_length(left.len().checked_add(right.len() - size))?;
        let junction = build_junction(left, right, size, self.mismatch_mode);
        let mut data = Vec::with_capacity(len);
        data.extend_from_slice(&left[..left.len() - size]);
        data.extend_from_slice(&junction);
        data.extend_from_slice(&right[size..]);

        Ok(Sequence::new(data))
    }

    /// Overlap-duplicates a sequence, so that the motif shared by its two
    /// ends appears once at every seam. Falls back to plain repetition if no
    /// window qualifies.
    ///
    /// The closing junction is always emitted, so a count of zero yields the
    /// junction alone.
    pub fn duplicate(&self, seq: &[u8], count: usize) -> EcsassResult<Sequence> {
        let size = match find_overlap(seq, seq, &self.windows, self.error_max) {
            Some(size) => size,
            None => {
                trace!("No overlap window qualifies; duplicating without overlap");
                return Sequence::new(seq).repeat(count);
            }
        };
        trace!("Duplicating with an overlap window of {}", size);

        let junction = build_junction(seq, seq, size, self.mismatch_mode);
        let middle = if seq.len() > 2 * size {
            &seq[size..seq.len() - size]
        } else {
            &[]
        };

        let mut unit = junction.clone();
        unit.extend_from_slice(middle);
        check_length(
            unit.len()
                .checked_mul(count)
                .and_then(|len| len.checked_add(junction.len())),
        )?;
        let mut data = unit.repeat(count);
        data.extend_from_slice(&junction);

        Ok(Sequence::new(data))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EcsassError;
    use crate::overlap::{
        build_junction, find_overlap, MismatchMode, OverlapParams, WindowPreference,
    };
    use crate::sequence::Sequence;

    fn params(windows: Vec<usize>, error_max: usize, mode: MismatchMode) -> OverlapParams {
        OverlapParams::new(WindowPreference::from(windows), error_max, mode)
    }

    #[test]
    fn test_window_preference() {
        assert_eq!(WindowPreference::largest_first(4, 6).sizes(), &[6, 5, 4]);
        assert_eq!(WindowPreference::smallest_first(4, 6).sizes(), &[4, 5, 6]);
        assert_eq!(WindowPreference::smallest_first(0, 2).sizes(), &[1, 2]);
        assert!(WindowPreference::largest_first(5, 4).is_empty());
        assert_eq!(WindowPreference::from(vec![3, 0, 7]).sizes(), &[3, 7]);
        assert_eq!(WindowPreference::default().sizes().len(), 97);
    }

    #[test]
    fn test_find_overlap_first_qualifying_wins() {
        // Window 2 matches exactly, window 4 has a single mismatch; the list
        // order decides.
        let seq1 = b"GGGGAAAA";
        let seq2 = b"AAATCCCC";

        assert_eq!(
            find_overlap(seq1, seq2, &WindowPreference::from(vec![4, 2]), 1),
            Some(4)
        );
        assert_eq!(
            find_overlap(seq1, seq2, &WindowPreference::from(vec![2, 4]), 1),
            Some(2)
        );
        assert_eq!(
            find_overlap(seq1, seq2, &WindowPreference::from(vec![4, 2]), 0),
            Some(2)
        );
    }

    #[test]
    fn test_find_overlap_skips_oversized_windows() {
        let windows = WindowPreference::from(vec![10, 3]);

        assert_eq!(find_overlap(b"ACGT", b"CGTAAAAAAAAA", &windows, 0), Some(3));
        assert_eq!(find_overlap(b"AC", b"AC", &windows, 0), None);
        assert_eq!(find_overlap(b"", b"ACGT", &windows, 5), None);
    }

    #[test]
    fn test_find_overlap_is_case_sensitive() {
        let windows = WindowPreference::from(vec![2]);

        assert_eq!(find_overlap(b"AAcg", b"CGAA", &windows, 0), None);
        assert_eq!(find_overlap(b"AAcg", b"CGAA", &windows, 2), Some(2));
    }

    #[test]
    fn test_build_junction_mismatch_modes() {
        let seq1 = b"TTACGT";
        let seq2 = b"AGGTCC";

        assert_eq!(build_junction(seq1, seq2, 4, MismatchMode::UseN), b"ANGT");
        assert_eq!(
            build_junction(seq1, seq2, 4, MismatchMode::UseFirstSeq),
            b"ACGT"
        );
        assert_eq!(
            build_junction(seq1, seq2, 4, MismatchMode::UseSecondSeq),
            b"AGGT"
        );
    }

    #[test]
    fn test_join() {
        let params = params(vec![4], 0, MismatchMode::UseN);

        assert_eq!(
            params.join(b"NNNNNAACC", b"AACCNNNNN").unwrap(),
            Sequence::from("NNNNNAACCNNNNN")
        );
        assert_eq!(params.join(b"AACC", b"AACC").unwrap(), Sequence::from("AACC"));
    }

    #[test]
    fn test_join_with_mismatches() {
        let params = params(vec![4], 1, MismatchMode::UseSecondSeq);

        assert_eq!(
            params.join(b"GGGGACGT", b"AGGTCCCC").unwrap(),
            Sequence::from("GGGGAGGTCCCC")
        );
    }

    #[test]
    fn test_join_falls_back_to_concat() {
        let params = params(vec![8, 4, 2], 0, MismatchMode::UseN);

        assert_eq!(params.join(b"AAAA", b"TTTT").unwrap(), Sequence::from("AAAATTTT"));
        assert_eq!(params.join(b"", b"TTTT").unwrap(), Sequence::from("TTTT"));
    }

    #[test]
    fn test_duplicate() {
        let params = params(vec![4], 0, MismatchMode::UseN);

        assert_eq!(
            params.duplicate(b"AACCNNNNNAACC", 3).unwrap(),
            Sequence::from("AACCNNNNNAACCNNNNNAACCNNNNNAACC")
        );
        assert_eq!(
            params.duplicate(b"AACCNNNNNAACC", 1).unwrap(),
            Sequence::from("AACCNNNNNAACC")
        );
        assert_eq!(params.duplicate(b"AACCNNNNNAACC", 0).unwrap(), Sequence::from("AACC"));
    }

    #[test]
    fn test_duplicate_motif_longer_than_half() {
        let params = params(vec![3], 0, MismatchMode::UseN);

        assert_eq!(params.duplicate(b"AAAA", 2).unwrap(), Sequence::from("AAAAAAAAA"));
    }

    #[test]
    fn test_duplicate_falls_back_to_repeat() {
        let params = params(vec![4, 3], 0, MismatchMode::UseN);

        assert_eq!(params.duplicate(b"ACGTTT", 2).unwrap(), Sequence::from("ACGTTTACGTTT"));
    }

    #[test]
    fn test_duplicate_too_long() {
        let params = params(vec![4], 0, MismatchMode::UseN);

        assert!(matches!(
            params.duplicate(b"AACCNNNNNAACC", usize::MAX),
            Err(EcsassError::SequenceTooLong)
        ));
        assert!(matches!(
            params.duplicate(b"ACGTTT", usize::MAX),
            Err(EcsassError::SequenceTooLong)
        ));
    }

    #[test]
    fn test_mismatch_mode_names() {
        let names: Vec<_> = MismatchMode::VALUES.iter().map(MismatchMode::name).collect();

        assert_eq!(names, ["n", "first", "second"]);
    }
}
