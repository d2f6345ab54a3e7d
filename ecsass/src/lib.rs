//! Parser and evaluator for ECSASS, a small language describing how to
//! assemble a nucleotide sequence out of literal fragments and FASTA files.
//!
//! ```text
//! INV(FILE(LTR)) ~+ SEQ(ACGT) * 3 + FILE(gene)[10:-10]
//! ```
//!
//! Operators are applied strictly left to right, so the recipe above
//! overlap-joins the reversed LTR with `ACGT`, triples the result and
//! appends the trimmed gene.

use std::path::Path;

use crate::error::EcsassResult;
use crate::evaluator::{Evaluator, EvaluatorParams};
use crate::overlap::MismatchMode;
use crate::resolver::FolderResolver;

pub mod error;
pub mod evaluator;
pub mod expr;
pub mod fasta;
pub mod overlap;
pub mod parser;
pub mod resolver;
pub mod sequence;

/// Evaluates `recipe`, looking up `FILE(...)` references in `folders`.
///
/// `windows` lists the overlap sizes to try for `~+` and `~*`, in order of
/// preference.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
///
/// use ecsass::overlap::MismatchMode;
///
/// let folders: [PathBuf; 0] = [];
/// let seq = ecsass::evaluate(
///     "SEQ(NNNNNAACC) ~+ SEQ(AACCNNNNN)",
///     &folders,
///     &[4],
///     0,
///     false,
///     MismatchMode::UseN,
/// )
/// .unwrap();
/// assert_eq!(seq, "NNNNNAACCNNNNN");
/// ```
pub fn evaluate<P: AsRef<Path>>(
    recipe: &str,
    folders: &[P],
    windows: &[usize],
    error_max: usize,
    ignore_bad_slicing: bool,
    mismatch_mode: MismatchMode,
) -> EcsassResult<String> {
    let resolver = FolderResolver::new(folders.iter().map(|folder| folder.as_ref()));
    let params = EvaluatorParams::builder()
        .window_preference(windows)
        .error_max(error_max)
        .ignore_bad_slicing(ignore_bad_slicing)
        .mismatch_mode(mismatch_mode)
        .build();

    let sequence = Evaluator::with_params(resolver, params).evaluate(recipe)?;
    Ok(sequence.into_string())
}
