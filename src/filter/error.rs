use super::lexer::TokenKind;
use thiserror::Error;

/// Errors raised while scanning a filter expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated string literal")]
    UnterminatedString { position: usize },

    #[error("Unexpected end of string")]
    UnexpectedEndOfString { position: usize },

    #[error("Unexpected character: {character} at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("Number literal out of range: {literal} at position {position}")]
    NumberOutOfRange { literal: String, position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString { position }
            | LexError::UnexpectedEndOfString { position }
            | LexError::UnexpectedCharacter { position, .. }
            | LexError::NumberOutOfRange { position, .. } => *position,
        }
    }
}

/// Errors raised while building the AST from a token stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected token {found} at position {position}")]
    UnexpectedToken { found: TokenKind, position: usize },

    #[error("Expected {expected}, got {found} at position {position}")]
    Expected {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },

    #[error("Invalid field path '{path}' at position {position}: empty segment")]
    InvalidFieldPath { path: String, position: usize },

    #[error("Expression nested too deeply at position {position} (limit {limit})")]
    NestingTooDeep { limit: usize, position: usize },
}

impl ParseError {
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::Expected { position, .. }
            | ParseError::InvalidFieldPath { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Any failure turning an expression string into an AST
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FilterError {
    /// Character offset into the expression where the failure was detected
    pub fn position(&self) -> usize {
        match self {
            FilterError::Lex(e) => e.position(),
            FilterError::Parse(e) => e.position(),
        }
    }
}
