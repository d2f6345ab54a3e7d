use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::fasta::reader::FastaReaderError;
use crate::sequence::MAX_SEQUENCE_LEN;

/// Category of an [`EcsassError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EcsassErrorKind {
    /// The recipe is not well-formed.
    Syntax,
    /// The recipe is well-formed, but does not describe a single sequence.
    Semantic,
    /// A referenced sequence file could not be located or read.
    Resolution,
    /// A numeric argument or a slice range is invalid.
    Validation,
}

impl Display for EcsassErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EcsassErrorKind::Syntax => "Syntax error",
            EcsassErrorKind::Semantic => "Semantic error",
            EcsassErrorKind::Resolution => "Resolution error",
            EcsassErrorKind::Validation => "Validation error",
        };

        write!(f, "{}", name)
    }
}

/// Error occurring when parsing or evaluating an ECSASS recipe.
///
/// Positions are byte offsets into the recipe with all whitespace removed.
#[derive(Debug)]
pub enum EcsassError {
    /// `)` without a matching `(`.
    UnmatchedClosingBracket(usize),
    /// `(` without a matching `)`.
    UnmatchedOpeningBracket(usize),
    /// `SEQ(` or `FILE(` without the closing `)`.
    UnterminatedLiteral(&'static str, usize),
    /// `[` or `![` without the closing `]`.
    UnterminatedSlice(usize),
    /// Slice without the `:` separating its indices.
    MissingSliceSeparator(usize),
    /// Operator without an operand it requires.
    MissingOperand(&'static str, usize),
    /// `*` or `~*` at the very end of the recipe.
    MissingMultiplier(usize),
    /// Character that does not start any known token.
    UnexpectedCharacter(char, usize),
    /// Recipe or bracketed group containing nothing to assemble.
    EmptyExpression(usize),
    /// Brackets nested deeper than the parser allows.
    NestingTooDeep(usize),
    /// Slice with no sequence to its left.
    NothingToSlice(usize),
    /// Sequences left over after all operators were applied (the number of
    /// surplus sequences).
    ExcessParts(usize),
    /// No FASTA file with given base name in any of the folders.
    FileNotFound(String),
    /// A folder could not be listed.
    DirectoryError(PathBuf, std::io::Error),
    /// A matched FASTA file could not be read.
    ReadError(PathBuf, FastaReaderError),
    /// Multiplier is not a non-negative integer.
    InvalidMultiplier(String, usize),
    /// Slice index is not an integer.
    InvalidSliceIndex(String, usize),
    /// Excised range has its end before its start (normalized `start`,
    /// `end`).
    InvertedExcision(usize, usize),
    /// Result of an operation would be longer than [`MAX_SEQUENCE_LEN`].
    SequenceTooLong,
}

impl EcsassError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> EcsassErrorKind {
        match self {
            EcsassError::UnmatchedClosingBracket(_)
            | EcsassError::UnmatchedOpeningBracket(_)
            | EcsassError::UnterminatedLiteral(..)
            | EcsassError::UnterminatedSlice(_)
            | EcsassError::MissingSliceSeparator(_)
            | EcsassError::MissingOperand(..)
            | EcsassError::MissingMultiplier(_)
            | EcsassError::UnexpectedCharacter(..)
            | EcsassError::EmptyExpression(_)
            | EcsassError::NestingTooDeep(_) => EcsassErrorKind::Syntax,
            EcsassError::NothingToSlice(_) | EcsassError::ExcessParts(_) => {
                EcsassErrorKind::Semantic
            }
            EcsassError::FileNotFound(_)
            | EcsassError::DirectoryError(..)
            | EcsassError::ReadError(..) => EcsassErrorKind::Resolution,
            EcsassError::InvalidMultiplier(..)
            | EcsassError::InvalidSliceIndex(..)
            | EcsassError::InvertedExcision(..)
            | EcsassError::SequenceTooLong => EcsassErrorKind::Validation,
        }
    }
}

impl Display for EcsassError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.kind())?;

        match self {
            EcsassError::UnmatchedClosingBracket(pos) => {
                write!(f, "Unmatched closing bracket at {}", pos)
            }
            EcsassError::UnmatchedOpeningBracket(pos) => {
                write!(f, "Unmatched opening bracket at {}", pos)
            }
            EcsassError::UnterminatedLiteral(keyword, pos) => {
                write!(f, "`{}` at {} is never closed", keyword, pos)
            }
            EcsassError::UnterminatedSlice(pos) => {
                write!(f, "Unmatched opening square bracket at {}", pos)
            }
            EcsassError::MissingSliceSeparator(pos) => {
                write!(f, "Slice at {} is missing the `:` separator", pos)
            }
            EcsassError::MissingOperand(op, pos) => {
                write!(f, "Operator `{}` at {} is missing an operand", op, pos)
            }
            EcsassError::MissingMultiplier(pos) => {
                write!(f, "Multiplier required at {}", pos)
            }
            EcsassError::UnexpectedCharacter(ch, pos) => {
                write!(f, "Unexpected character `{}` at {}", ch, pos)
            }
            EcsassError::EmptyExpression(pos) => write!(f, "Empty expression at {}", pos),
            EcsassError::NestingTooDeep(pos) => {
                write!(f, "Brackets nested too deeply at {}", pos)
            }
            EcsassError::NothingToSlice(pos) => write!(f, "No sequence to slice at {}", pos),
            EcsassError::ExcessParts(num) => write!(
                f,
                "{} excess component(s) in the recipe; an operator may be missing",
                num
            ),
            EcsassError::FileNotFound(name) => write!(f, "No file named `{}` found", name),
            EcsassError::DirectoryError(path, e) => {
                write!(f, "Could not list `{}`: {}", path.display(), e)
            }
            EcsassError::ReadError(path, e) => {
                write!(f, "Could not read `{}`: {}", path.display(), e)
            }
            EcsassError::InvalidMultiplier(value, pos) => {
                write!(f, "Invalid multiplier `{}` at {}", value, pos)
            }
            EcsassError::InvalidSliceIndex(value, pos) => {
                write!(f, "Invalid slice index `{}` at {}", value, pos)
            }
            EcsassError::InvertedExcision(start, end) => write!(
                f,
                "Overlapping indexes for excision (start: {}, end: {})",
                start, end
            ),
            EcsassError::SequenceTooLong => write!(
                f,
                "Assembled sequence would be longer than {} nt",
                MAX_SEQUENCE_LEN
            ),
        }
    }
}

impl Error for EcsassError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EcsassError::DirectoryError(_, e) => Some(e),
            EcsassError::ReadError(_, e) => Some(e),
            _ => None,
        }
    }
}

/// The result of parsing or evaluating an ECSASS recipe.
pub type EcsassResult<T> = Result<T, EcsassError>;

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io::ErrorKind::NotFound;
    use std::path::PathBuf;

    use crate::error::{EcsassError, EcsassErrorKind};
    use crate::fasta::reader::FastaReaderError;

    #[test]
    fn test_error_kind() {
        assert_eq!(
            EcsassError::UnmatchedClosingBracket(3).kind(),
            EcsassErrorKind::Syntax
        );
        assert_eq!(
            EcsassError::NothingToSlice(0).kind(),
            EcsassErrorKind::Semantic
        );
        assert_eq!(
            EcsassError::FileNotFound("gene".to_owned()).kind(),
            EcsassErrorKind::Resolution
        );
        assert_eq!(
            EcsassError::InvalidMultiplier("X".to_owned(), 9).kind(),
            EcsassErrorKind::Validation
        );
        assert_eq!(
            EcsassError::SequenceTooLong.kind(),
            EcsassErrorKind::Validation
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", EcsassError::UnmatchedClosingBracket(8)),
            "Syntax error: Unmatched closing bracket at 8"
        );
        assert_eq!(
            format!("{}", EcsassError::UnterminatedLiteral("SEQ(", 0)),
            "Syntax error: `SEQ(` at 0 is never closed"
        );
        assert_eq!(
            format!("{}", EcsassError::ExcessParts(1)),
            "Semantic error: 1 excess component(s) in the recipe; an operator may be missing"
        );
        assert_eq!(
            format!("{}", EcsassError::FileNotFound("LINE1".to_owned())),
            "Resolution error: No file named `LINE1` found"
        );
        assert_eq!(
            format!("{}", EcsassError::InvertedExcision(6, 2)),
            "Validation error: Overlapping indexes for excision (start: 6, end: 2)"
        );
        assert_eq!(
            format!("{}", EcsassError::SequenceTooLong),
            "Validation error: Assembled sequence would be longer than 4294967295 nt"
        );
    }

    #[test]
    fn test_error_source() {
        let path = PathBuf::from("seqs");
        assert!(
            EcsassError::DirectoryError(path.clone(), std::io::Error::from(NotFound))
                .source()
                .is_some()
        );
        assert!(EcsassError::ReadError(
            path,
            FastaReaderError::from(std::io::Error::from(NotFound))
        )
        .source()
        .is_some());
        assert!(EcsassError::MissingMultiplier(4).source().is_none());
    }
}
