use log::{debug, trace};

use crate::error::EcsassResult;
use crate::expr::{Expr, Step};
use crate::overlap::{MismatchMode, OverlapParams, WindowPreference};
use crate::parser::parse;
use crate::resolver::SequenceResolver;
use crate::sequence::Sequence;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EvaluatorParams {
    overlap: OverlapParams,
    ignore_bad_slicing: bool,
}

impl EvaluatorParams {
    #[must_use]
    pub fn builder() -> EvaluatorParamsBuilder {
        EvaluatorParamsBuilder::new()
    }

    #[must_use]
    pub fn overlap(&self) -> &OverlapParams {
        &self.overlap
    }

    #[must_use]
    pub fn ignore_bad_slicing(&self) -> bool {
        self.ignore_bad_slicing
    }
}

#[derive(Debug, Clone)]
pub struct EvaluatorParamsBuilder {
    window_preference: WindowPreference,
    error_max: usize,
    ignore_bad_slicing: bool,
    mismatch_mode: MismatchMode,
}

impl EvaluatorParamsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            window_preference: WindowPreference::default(),
            error_max: 0,
            ignore_bad_slicing: false,
            mismatch_mode: MismatchMode::default(),
        }
    }

    /// Sets the overlap window sizes to try, in order of preference.
    pub fn window_preference<T: Into<WindowPreference>>(
        &mut self,
        window_preference: T,
    ) -> &mut Self {
        let mut new = self;
        new.window_preference = window_preference.into();
        new
    }

    /// Sets the maximum number of mismatches within an overlap window.
    pub fn error_max(&mut self, error_max: usize) -> &mut Self {
        let mut new = self;
        new.error_max = error_max;
        new
    }

    /// If set, an excision with its end before its start does not fail; the
    /// flanks before `start` and after `end` are joined as usual, repeating
    /// the bytes in between.
    pub fn ignore_bad_slicing(&mut self, ignore_bad_slicing: bool) -> &mut Self {
        let mut new = self;
        new.ignore_bad_slicing = ignore_bad_slicing;
        new
    }

    pub fn mismatch_mode(&mut self, mismatch_mode: MismatchMode) -> &mut Self {
        let mut new = self;
        new.mismatch_mode = mismatch_mode;
        new
    }

    #[must_use]
    pub fn build(&self) -> EvaluatorParams {
        EvaluatorParams {
            overlap: OverlapParams::new(
                self.window_preference.clone(),
                self.error_max,
                self.mismatch_mode,
            ),
            ignore_bad_slicing: self.ignore_bad_slicing,
        }
    }
}

impl Default for EvaluatorParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles sequences described by ECSASS recipes.
///
/// The evaluator holds no state between calls; every `FILE(...)` reference
/// is passed to the resolver each time it is encountered.
#[derive(Debug, Clone)]
pub struct Evaluator<R> {
    resolver: R,
    params: EvaluatorParams,
}

impl<R: SequenceResolver> Evaluator<R> {
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self::with_params(resolver, EvaluatorParams::default())
    }

    #[must_use]
    pub fn with_params(resolver: R, params: EvaluatorParams) -> Self {
        Self { resolver, params }
    }

    /// Parses and evaluates a recipe.
    ///
    /// # Examples
    /// ```
    /// use ecsass::evaluator::Evaluator;
    /// use ecsass::resolver::MemoryResolver;
    ///
    /// let resolver = MemoryResolver::new().with("LTR", "TTAGG");
    /// let evaluator = Evaluator::new(resolver);
    ///
    /// let seq = evaluator.evaluate("FILE(LTR) + SEQ(AC) * 2").unwrap();
    /// assert_eq!(seq.to_string(), "TTAGGACTTAGGAC");
    /// ```
    pub fn evaluate(&self, recipe: &str) -> EcsassResult<Sequence> {
        let expr = parse(recipe)?;
        debug!("Evaluating `{}`", expr);

        self.evaluate_expr(&expr)
    }

    /// Evaluates an already parsed recipe.
    ///
    /// Only operands in brackets or `INV(...)` are evaluated recursively;
    /// the steps of a chain are applied in a loop.
    pub fn evaluate_expr(&self, expr: &Expr) -> EcsassResult<Sequence> {
        match expr {
            Expr::Literal(text) => Ok(Sequence::from(text.as_str())),
            Expr::FileRef(name) => self.resolver.resolve(name),
            Expr::Inverted(inner) => Ok(self.evaluate_expr(inner)?.reverse_complement()),
            Expr::Chain(head, steps) => {
                let mut result = self.evaluate_expr(head)?;
                for step in steps {
                    result = self.apply(result, step)?;
                    trace!("Applied {}: {} nt", step.name(), result.len());
                }

                Ok(result)
            }
        }
    }

    fn apply(&self, seq: Sequence, step: &Step) -> EcsassResult<Sequence> {
        match step {
            Step::Concat(right) => {
                let right = self.evaluate_expr(right)?;
                seq.concat(&right)
            }
            Step::OverlapConcat(right) => {
                let right = self.evaluate_expr(right)?;
                self.params.overlap.join(&seq, &right)
            }
            Step::Duplicate(count) => seq.repeat(*count),
            Step::OverlapDuplicate(count) => self.params.overlap.duplicate(&seq, *count),
            Step::SliceKeep(bounds) => Ok(seq.slice(*bounds)),
            Step::SliceExcise(bounds) => seq.excise(*bounds, self.params.ignore_bad_slicing),
        }
    }
}
