//! Filter expression scanning, parsing and evaluation
//!
//! A filter expression is compiled once into an [`Expr`] tree and then
//! evaluated against any number of records.
//!
//! # Syntax
//!
//! ```text
//! field = value            Case-insensitive equality (numbers compare as text too)
//! field contains value     Case-insensitive substring match
//! a and b                  Both must hold
//! a or b                   Either must hold (binds looser than `and`)
//! not a                    Negation
//! ( ... )                  Grouping
//! ```
//!
//! Field names may be dotted (`user.name`) to reach into nested objects.
//! A bare word on the right of `=` or `contains` is taken as text, so
//! `level = ERROR` needs no quotes. Strings take `"` or `'` and support
//! `\n`, `\t`, `\r`, `\\` and an escaped quote. Keywords are
//! case-insensitive.
//!
//! # Examples
//!
//! ```text
//! level = ERROR
//! level = ERROR and message contains "timeout"
//! service = auth and (level = WARN or level = ERROR)
//! not user.role = admin
//! status = 503
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;

use crate::record::Record;
use std::fmt;
use std::str::FromStr;

pub use ast::{BinaryOp, Expr, FieldPath, Literal, UnaryOp};
pub use error::{FilterError, LexError, ParseError};
pub use evaluator::{evaluate, resolve_field, stringify};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{MAX_DEPTH, parse};

/// Scan and parse a filter expression in one step
pub fn compile(input: &str) -> Result<Expr, FilterError> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens)?)
}

impl FromStr for Expr {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

/// A compiled filter, ready to be matched against many records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    source: String,
    expr: Expr,
}

impl Filter {
    pub fn compile(source: &str) -> Result<Self, FilterError> {
        let expr = compile(source)?;
        tracing::debug!(filter = source, ast = %expr, "compiled filter");
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn matches(&self, record: &Record) -> bool {
        evaluate(&self.expr, record)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The expression text this filter was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
