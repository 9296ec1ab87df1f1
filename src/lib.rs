//! A lexer, parser, and type checker for the `scrap` language: a small C-family
//! language with `var`/`const` declarations, structs, enums, first-class function
//! values, and a C-like statement grammar.
//!
//! # API
//!
//! Operation     | Result                | Entry point
//! --------------|------------------------|---------------------------
//! Read a file   | `Vec<u8>`              | [`source::read_source`]
//! Tokenize      | `Vec<token::Token>`    | [`tokenize`]
//! Parse         | [`ast::Stmt`]          | [`parse`]
//! Type-check    | `()`, mutates the AST  | [`check`]
//! Full pipeline | [`ast::Stmt`]          | [`compile`]
//!
//! Every entry point takes a [`options::CompileOptions`], built with
//! [`options::CompileOptions::new`] and its fluent setters.

pub mod ast;
pub mod check;
pub mod diagnostics;
pub mod error_handling;
pub mod interner;
mod lex;
pub mod newtypes;
pub mod options;
mod parse;
pub mod source;
pub mod token;

#[cfg(test)]
mod tests;

use diagnostics::Diagnostics;
use error_handling::ParseError;
use options::{CompileOptions, Stage};
use token::Token;

/// Tokenize `src` under `options`. The error-recording path mirrors `parse`/`check`:
/// a [`Diagnostics`] sink is threaded internally for the duration of the call and,
/// on failure, its first recorded error is surfaced as a typed [`ParseError`].
pub fn tokenize(src: &[u8], options: &CompileOptions) -> Result<Vec<Token>, ParseError> {
    let mut diag = Diagnostics::new(options.filename_value());
    lex::tokenize(src, options.tab_width_value(), &mut diag).map_err(|()| {
        diag.take_error()
            .expect("tokenize failed without recording an error")
    })
}

/// Parse a token stream (as produced by [`tokenize`]) into the top-level block.
pub fn parse(tokens: &[Token], options: &CompileOptions) -> Result<ast::Stmt, ParseError> {
    let mut diag = Diagnostics::new(options.filename_value());
    parse::parse(tokens, &mut diag).map_err(|()| {
        diag.take_error()
            .expect("parse failed without recording an error")
    })
}

/// Type-check a parsed program in place, annotating every [`ast::Expr`] node with its
/// resolved type. Returns the first recorded type error, if any.
pub fn check(ast: &mut ast::Stmt, options: &CompileOptions) -> Result<(), ParseError> {
    let mut diag = Diagnostics::new(options.filename_value());
    if check::check(ast, &mut diag) {
        Ok(())
    } else {
        Err(diag
            .take_error()
            .expect("check failed without recording an error"))
    }
}

/// Run the lex → parse → check pipeline over `src`, honoring `options`'s
/// [`Stage::Parse`] stop point (skip the checker and return the unchecked AST) or
/// running it through to completion otherwise.
pub fn compile(src: &[u8], options: &CompileOptions) -> Result<ast::Stmt, ParseError> {
    let tokens = tokenize(src, options)?;
    let mut ast = parse(&tokens, options)?;
    if options.stop_after_stage() != Some(Stage::Parse) {
        check(&mut ast, options)?;
    }
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_accepts_a_well_formed_program() {
        let ast = compile(
            b"fn add(a: i64, b: i64): i64 { return a + b; } var x = add(1, 2);",
            &CompileOptions::new().filename("test.scrap"),
        )
        .unwrap();
        assert!(matches!(ast, ast::Stmt::Block { .. }));
    }

    #[test]
    fn compile_surfaces_a_lex_error() {
        let err = compile(b"var x = 'ab';", &CompileOptions::new().filename("test.scrap")).unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }

    #[test]
    fn compile_surfaces_a_syntax_error() {
        let err = compile(b"var x = ;", &CompileOptions::new().filename("test.scrap")).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn compile_surfaces_a_type_error() {
        let err = compile(b"var x = y;", &CompileOptions::new().filename("test.scrap")).unwrap_err();
        assert!(matches!(err, ParseError::Type(_)));
    }

    #[test]
    fn stop_after_parse_skips_the_checker() {
        let ast = compile(
            b"var x = y;",
            &CompileOptions::new().filename("test.scrap").stop_after(Stage::Parse),
        )
        .unwrap();
        assert!(matches!(ast, ast::Stmt::Block { .. }));
    }
}
