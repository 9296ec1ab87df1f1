//! The public error taxonomy for callers outside the crate.
//!
//! Inside the lexer/parser/checker, diagnostics are recorded on a threaded
//! [`crate::diagnostics::Diagnostics`] sink and propagated as a bare `Result<T, ()>` —
//! the message has already been printed, so there is nothing left for a caller deeper
//! in the same pass to add. `ParseError` exists for the crate's public entry points
//! (`tokenize`, `parse`, `check`, `compile`), which have no `Diagnostics` of their own
//! to inspect and need a typed value to match on or convert with `?`.

use thiserror::Error;

use crate::newtypes::Position;

/// Top-level error returned by the crate's public entry points.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}: error: cannot read file")]
    Io(#[from] IoError),

    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),
}

/// Wraps [`std::io::Error`] with the path that failed, matching the source's
/// `path: error: cannot read file` message.
#[derive(Error, Debug)]
#[error("{path}")]
pub struct IoError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// Lexical errors. Always reported; never suppressed during speculative parsing.
#[derive(Error, Debug)]
pub enum LexError {
    #[error("unterminated literal")]
    UnterminatedLiteral { pos: Position },

    #[error("invalid digit '{digit}' in base-{base} literal")]
    InvalidDigit { pos: Position, digit: char, base: u32 },

    #[error("invalid escape sequence")]
    InvalidEscape { pos: Position },

    #[error("character literal must decode to exactly one byte")]
    InvalidCharLiteral { pos: Position },

    #[error("unrecognized token starting with '{ch}'")]
    UnrecognizedToken { pos: Position, ch: char },
}

impl LexError {
    /// The source position the error occurred at, for callers that print it
    /// separately from the message (see `Diagnostics`).
    pub fn pos(&self) -> Position {
        match self {
            LexError::UnterminatedLiteral { pos }
            | LexError::InvalidDigit { pos, .. }
            | LexError::InvalidEscape { pos }
            | LexError::InvalidCharLiteral { pos }
            | LexError::UnrecognizedToken { pos, .. } => *pos,
        }
    }
}

/// Syntax errors. Suppressible while the parser is speculating.
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("unexpected token '{found}'")]
    UnexpectedToken { pos: Position, found: String },

    #[error("non-optional parameter after optional parameter")]
    NonOptionalAfterOptional { pos: Position },

    #[error("multiple default labels in switch")]
    MultipleDefaultLabels { pos: Position },
}

impl SyntaxError {
    pub fn pos(&self) -> Position {
        match self {
            SyntaxError::UnexpectedToken { pos, .. }
            | SyntaxError::NonOptionalAfterOptional { pos }
            | SyntaxError::MultipleDefaultLabels { pos } => *pos,
        }
    }
}

/// Type/name-resolution errors. Never suppressed.
#[derive(Error, Debug)]
pub enum TypeError {
    #[error("identifier '{name}' is undefined")]
    UndefinedIdentifier { pos: Position, name: String },

    #[error("incompatible operand types for '{op}'")]
    IncompatibleOperands { pos: Position, op: &'static str },

    #[error("assignment target is not a mutable lvalue")]
    NotAssignable { pos: Position },

    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch {
        pos: Position,
        expected: usize,
        found: usize,
    },

    #[error("'{name}' is not callable")]
    NotCallable { pos: Position, name: String },

    #[error("'{name}' is not a struct type")]
    NotAStruct { pos: Position, name: String },

    #[error("struct has no member named '{member}'")]
    NoSuchMember { pos: Position, member: String },

    #[error("branches of ternary expression have incompatible types")]
    TernaryMismatch { pos: Position },
}

impl TypeError {
    pub fn pos(&self) -> Position {
        match self {
            TypeError::UndefinedIdentifier { pos, .. }
            | TypeError::IncompatibleOperands { pos, .. }
            | TypeError::NotAssignable { pos }
            | TypeError::ArityMismatch { pos, .. }
            | TypeError::NotCallable { pos, .. }
            | TypeError::NotAStruct { pos, .. }
            | TypeError::NoSuchMember { pos, .. }
            | TypeError::TernaryMismatch { pos } => *pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_converts_into_parse_error() {
        let err: ParseError = LexError::UnterminatedLiteral {
            pos: Position::new(3, 5),
        }
        .into();
        assert_eq!(err.to_string(), "lex error: unterminated literal");
    }

    #[test]
    fn type_error_exposes_its_position_separately_from_its_message() {
        let err = TypeError::UndefinedIdentifier {
            pos: Position::new(1, 1),
            name: "foo".into(),
        };
        assert_eq!(err.pos(), Position::new(1, 1));
        assert_eq!(err.to_string(), "identifier 'foo' is undefined");
    }
}
