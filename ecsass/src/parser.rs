//! ECSASS recipe parser.
//!
//! ```text
//! Expr     := Term (Op Term)*
//! Term     := ("SEQ(" text ")" | "FILE(" name ")" | "INV(" Expr ")" | "(" Expr ")") Slice*
//! Slice    := "[" Index? ":" Index? "]" | "![" Index? ":" Index? "]"
//! Op       := "+" | "~+" | "*" Digits | "~*" Digits
//! ```
//!
//! Operators are applied in the order they appear; there is no operator
//! precedence. Brackets are the only way to change the order.

use log::trace;

use crate::error::{EcsassError, EcsassResult};
use crate::expr::Expr;
use crate::sequence::SliceBounds;

const SEQ_KEYWORD: &str = "SEQ(";
const FILE_KEYWORD: &str = "FILE(";
const INV_KEYWORD: &str = "INV(";

/// Maximum nesting level of brackets and `INV(...)` blocks.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parses an ECSASS recipe into an expression tree.
///
/// All whitespace is removed from the recipe before parsing.
///
/// # Examples
/// ```
/// use ecsass::expr::Expr;
/// use ecsass::parser::parse;
///
/// let expr = parse("SEQ(AA) + SEQ(TT) * 2").unwrap();
/// assert_eq!(
///     expr,
///     Expr::literal("AA").concat(Expr::literal("TT")).duplicate(2)
/// );
/// ```
pub fn parse(recipe: &str) -> EcsassResult<Expr> {
    let recipe = strip_whitespace(recipe);
    let expr = Parser::new(&recipe, 0, 0).parse_expr()?;
    trace!("Parsed `{}` as {:?}", recipe, expr);

    Ok(expr)
}

/// Returns `recipe` with all whitespace characters removed.
#[must_use]
pub fn strip_whitespace(recipe: &str) -> String {
    recipe.chars().filter(|ch| !ch.is_whitespace()).collect()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Operation {
    Concat,
    OverlapConcat,
    Duplicate(usize),
    OverlapDuplicate(usize),
}

impl Operation {
    fn symbol(&self) -> &'static str {
        match self {
            Operation::Concat => "+",
            Operation::OverlapConcat => "~+",
            Operation::Duplicate(_) => "*",
            Operation::OverlapDuplicate(_) => "~*",
        }
    }
}

#[derive(Debug)]
struct Parser<'a> {
    input: &'a str,
    /// Position of `input` within the whole recipe.
    offset: usize,
    depth: usize,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, offset: usize, depth: usize) -> Self {
        Self {
            input,
            offset,
            depth,
            pos: 0,
        }
    }

    fn parse_expr(mut self) -> EcsassResult<Expr> {
        let mut parts: Vec<Expr> = Vec::new();
        let mut operations: Vec<(Operation, usize)> = Vec::new();

        while self.pos < self.input.len() {
            let rest = self.rest();
            let start = self.pos;

            if rest.starts_with(FILE_KEYWORD) {
                let name = self.read_literal(FILE_KEYWORD)?;
                parts.push(Expr::FileRef(name.to_owned()));
            } else if rest.starts_with(SEQ_KEYWORD) {
                let text = self.read_literal(SEQ_KEYWORD)?;
                parts.push(Expr::Literal(text.to_owned()));
            } else if rest.starts_with(INV_KEYWORD) {
                self.pos += INV_KEYWORD.len();
                let inner = self.parse_group(start)?;
                parts.push(Expr::Inverted(Box::new(inner)));
            } else if rest.starts_with('(') {
                self.pos += 1;
                let inner = self.parse_group(start)?;
                parts.push(inner);
            } else if rest.starts_with(')') {
                return Err(EcsassError::UnmatchedClosingBracket(self.abs(start)));
            } else if rest.starts_with("![") || rest.starts_with('[') {
                let excise = rest.starts_with('!');
                self.pos += if excise { 2 } else { 1 };

                let last = parts
                    .pop()
                    .ok_or_else(|| EcsassError::NothingToSlice(self.abs(start)))?;
                let bounds = self.read_slice_bounds(start)?;
                let sliced = if excise {
                    last.slice_excise(bounds)
                } else {
                    last.slice_keep(bounds)
                };
                parts.push(sliced);
            } else {
                let operation = self.read_operation()?;
                if parts.is_empty() {
                    return Err(EcsassError::MissingOperand(
                        operation.symbol(),
                        self.abs(start),
                    ));
                }
                operations.push((operation, self.abs(start)));
            }
        }

        self.fold(parts, operations)
    }

    /// Applies the operations in the order they were encountered, appending
    /// each one to a single flat chain.
    fn fold(&self, parts: Vec<Expr>, operations: Vec<(Operation, usize)>) -> EcsassResult<Expr> {
        let mut parts = parts.into_iter();
        let mut result = parts
            .next()
            .ok_or(EcsassError::EmptyExpression(self.offset))?;

        for (operation, position) in operations {
            result = match operation {
                Operation::Concat | Operation::OverlapConcat => {
                    let right = parts
                        .next()
                        .ok_or(EcsassError::MissingOperand(operation.symbol(), position))?;
                    if operation == Operation::Concat {
                        result.concat(right)
                    } else {
                        result.overlap_concat(right)
                    }
                }
                Operation::Duplicate(count) => result.duplicate(count),
                Operation::OverlapDuplicate(count) => result.overlap_duplicate(count),
            };
        }

        let excess = parts.len();
        if excess > 0 {
            return Err(EcsassError::ExcessParts(excess));
        }

        Ok(result)
    }

    /// Reads the verbatim contents of `SEQ(...)` or `FILE(...)`, up to the
    /// first closing bracket.
    fn read_literal(&mut self, keyword: &'static str) -> EcsassResult<&'a str> {
        let start = self.pos;
        let content_start = start + keyword.len();
        let input: &'a str = self.input;

        let len = input[content_start..]
            .find(')')
            .ok_or_else(|| EcsassError::UnterminatedLiteral(keyword, self.abs(start)))?;
        self.pos = content_start + len + 1;

        Ok(&input[content_start..content_start + len])
    }

    /// Parses the bracketed group whose contents start at the current
    /// position; `open_pos` is where the group (or its keyword) begins.
    fn parse_group(&mut self, open_pos: usize) -> EcsassResult<Expr> {
        let input = self.input;
        let content_start = self.pos;
        let mut level = 1usize;

        for (index, byte) in input.as_bytes()[content_start..].iter().enumerate() {
            match byte {
                b'(' => level += 1,
                b')' => level -= 1,
                _ => {}
            }

            if level == 0 {
                let content_end = content_start + index;
                if self.depth + 1 > MAX_NESTING_DEPTH {
                    return Err(EcsassError::NestingTooDeep(self.abs(open_pos)));
                }

                let inner = Parser::new(
                    &input[content_start..content_end],
                    self.abs(content_start),
                    self.depth + 1,
                )
                .parse_expr()?;
                self.pos = content_end + 1;
                return Ok(inner);
            }
        }

        Err(EcsassError::UnmatchedOpeningBracket(self.abs(open_pos)))
    }

    /// Reads `start:end]` of a slice; `open_pos` is where the slice begins.
    fn read_slice_bounds(&mut self, open_pos: usize) -> EcsassResult<SliceBounds> {
        let input = self.input;
        let content_start = self.pos;
        let len = input[content_start..]
            .find(']')
            .ok_or_else(|| EcsassError::UnterminatedSlice(self.abs(open_pos)))?;
        let content = &input[content_start..content_start + len];

        let (start, end) = content
            .split_once(':')
            .ok_or_else(|| EcsassError::MissingSliceSeparator(self.abs(open_pos)))?;
        let bounds = SliceBounds::new(
            self.parse_index(start, content_start)?,
            self.parse_index(end, content_start + start.len() + 1)?,
        );

        self.pos = content_start + len + 1;
        Ok(bounds)
    }

    fn parse_index(&self, value: &str, pos: usize) -> EcsassResult<Option<isize>> {
        if value.is_empty() {
            return Ok(None);
        }

        value
            .parse()
            .map(Some)
            .map_err(|_| EcsassError::InvalidSliceIndex(value.to_owned(), self.abs(pos)))
    }

    fn read_operation(&mut self) -> EcsassResult<Operation> {
        let rest = self.rest();

        if rest.starts_with("~+") {
            self.pos += 2;
            Ok(Operation::OverlapConcat)
        } else if rest.starts_with('+') {
            self.pos += 1;
            Ok(Operation::Concat)
        } else if rest.starts_with("~*") {
            self.pos += 2;
            Ok(Operation::OverlapDuplicate(self.read_multiplier()?))
        } else if rest.starts_with('*') {
            self.pos += 1;
            Ok(Operation::Duplicate(self.read_multiplier()?))
        } else {
            // The loop in `parse_expr` guarantees there is a character left.
            let ch = rest.chars().next().unwrap_or_default();
            Err(EcsassError::UnexpectedCharacter(ch, self.abs(self.pos)))
        }
    }

    fn read_multiplier(&mut self) -> EcsassResult<usize> {
        let rest = self.rest();
        let start = self.pos;
        if rest.is_empty() {
            return Err(EcsassError::MissingMultiplier(self.abs(start)));
        }

        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            let token_len = rest
                .char_indices()
                .find(|&(_, ch)| is_structural(ch))
                .map_or(rest.len(), |(index, _)| index);
            let token_len = if token_len == 0 {
                rest.chars().next().map_or(0, char::len_utf8)
            } else {
                token_len
            };
            let token = &rest[..token_len];
            return Err(EcsassError::InvalidMultiplier(
                token.to_owned(),
                self.abs(start),
            ));
        }

        let digits = &rest[..digits_len];
        let count = digits
            .parse()
            .map_err(|_| EcsassError::InvalidMultiplier(digits.to_owned(), self.abs(start)))?;
        self.pos += digits_len;

        Ok(count)
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    #[inline]
    fn abs(&self, pos: usize) -> usize {
        self.offset + pos
    }
}

fn is_structural(ch: char) -> bool {
    matches!(ch, '+' | '~' | '*' | '[' | ']' | '!' | '(' | ')' | ':')
}
