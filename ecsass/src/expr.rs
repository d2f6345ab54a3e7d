use std::fmt::{Display, Formatter};

use crate::sequence::SliceBounds;

/// Parsed ECSASS recipe.
///
/// Operators are folded strictly left to right, so a recipe is a head term
/// followed by a flat list of [`Step`]s: `SEQ(A)+SEQ(C)*3` is
/// `Chain(A, [Concat(C), Duplicate(3)])`. Only brackets and `INV(...)`
/// nest, which keeps the depth of the tree bounded by the bracket nesting
/// of the recipe rather than by its length.
///
/// The [`Display`] implementation writes the canonical recipe text, adding
/// brackets only where the fold order requires them.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    /// `SEQ(text)`
    Literal(String),
    /// `FILE(name)`
    FileRef(String),
    /// `INV(expr)`
    Inverted(Box<Expr>),
    /// A head term with the steps applied to it in order.
    Chain(Box<Expr>, Vec<Step>),
}

/// Single operation applied to the value accumulated so far.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Step {
    /// `+ right`
    Concat(Expr),
    /// `~+ right`
    OverlapConcat(Expr),
    /// `* count`
    Duplicate(usize),
    /// `~* count`
    OverlapDuplicate(usize),
    /// `[start:end]`
    SliceKeep(SliceBounds),
    /// `![start:end]`
    SliceExcise(SliceBounds),
}

impl Step {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Step::Concat(_) => "concatenation",
            Step::OverlapConcat(_) => "overlap concatenation",
            Step::Duplicate(_) => "duplication",
            Step::OverlapDuplicate(_) => "overlap duplication",
            Step::SliceKeep(_) => "slice",
            Step::SliceExcise(_) => "excision",
        }
    }

    fn is_slice(&self) -> bool {
        matches!(self, Step::SliceKeep(_) | Step::SliceExcise(_))
    }
}

impl Expr {
    #[must_use]
    pub fn literal<T: Into<String>>(text: T) -> Self {
        Self::Literal(text.into())
    }

    #[must_use]
    pub fn file<T: Into<String>>(name: T) -> Self {
        Self::FileRef(name.into())
    }

    #[must_use]
    pub fn inverted(self) -> Self {
        Self::Inverted(Box::new(self))
    }

    /// Appends a step, extending the chain if this already is one.
    #[must_use]
    pub fn then(self, step: Step) -> Self {
        match self {
            Expr::Chain(head, mut steps) => {
                steps.push(step);
                Expr::Chain(head, steps)
            }
            term => Expr::Chain(Box::new(term), vec![step]),
        }
    }

    #[must_use]
    pub fn concat(self, right: Expr) -> Self {
        self.then(Step::Concat(right))
    }

    #[must_use]
    pub fn overlap_concat(self, right: Expr) -> Self {
        self.then(Step::OverlapConcat(right))
    }

    #[must_use]
    pub fn duplicate(self, count: usize) -> Self {
        self.then(Step::Duplicate(count))
    }

    #[must_use]
    pub fn overlap_duplicate(self, count: usize) -> Self {
        self.then(Step::OverlapDuplicate(count))
    }

    #[must_use]
    pub fn slice_keep(self, bounds: SliceBounds) -> Self {
        self.then(Step::SliceKeep(bounds))
    }

    #[must_use]
    pub fn slice_excise(self, bounds: SliceBounds) -> Self {
        self.then(Step::SliceExcise(bounds))
    }

    /// Returns `true` if this expression is written as a single operand
    /// (which slices attach to and which can follow a binary operator).
    #[must_use]
    pub fn is_term(&self) -> bool {
        match self {
            Expr::Literal(_) | Expr::FileRef(_) | Expr::Inverted(_) => true,
            Expr::Chain(_, steps) => steps.iter().all(Step::is_slice),
        }
    }

    fn fmt_term(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_term() {
            write!(f, "{}", self)
        } else {
            write!(f, "({})", self)
        }
    }
}

fn fmt_bounds(bounds: &SliceBounds, f: &mut Formatter<'_>) -> std::fmt::Result {
    if let Some(start) = bounds.start {
        write!(f, "{}", start)?;
    }
    write!(f, ":")?;
    if let Some(end) = bounds.end {
        write!(f, "{}", end)?;
    }

    Ok(())
}

/// Writes a chain. A slice following an operator applies to everything
/// before it, so that prefix is closed in brackets; the opening brackets
/// are all written up front.
fn fmt_chain(head: &Expr, steps: &[Step], f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut pending = false;
    let mut groups = 0;
    for step in steps {
        if !step.is_slice() {
            pending = true;
        } else if pending {
            pending = false;
            groups += 1;
        }
    }

    for _ in 0..groups {
        write!(f, "(")?;
    }
    head.fmt_term(f)?;

    let mut pending = false;
    for step in steps {
        if !step.is_slice() {
            pending = true;
        } else if pending {
            pending = false;
            write!(f, ")")?;
        }

        match step {
            Step::Concat(right) => {
                write!(f, "+")?;
                right.fmt_term(f)?;
            }
            Step::OverlapConcat(right) => {
                write!(f, "~+")?;
                right.fmt_term(f)?;
            }
            Step::Duplicate(count) => write!(f, "*{}", count)?,
            Step::OverlapDuplicate(count) => write!(f, "~*{}", count)?,
            Step::SliceKeep(bounds) => {
                write!(f, "[")?;
                fmt_bounds(bounds, f)?;
                write!(f, "]")?;
            }
            Step::SliceExcise(bounds) => {
                write!(f, "![")?;
                fmt_bounds(bounds, f)?;
                write!(f, "]")?;
            }
        }
    }

    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(text) => write!(f, "SEQ({})", text),
            Expr::FileRef(name) => write!(f, "FILE({})", name),
            Expr::Inverted(expr) => write!(f, "INV({})", expr),
            Expr::Chain(head, steps) => fmt_chain(head, steps, f),
        }
    }
}
