//! Recursive-descent parser: tokens in, an annotated-but-not-yet-checked [`Stmt`] tree
//! out.
//!
//! Grounded on the reference parser's module split (`parser_spec.c`, `parser_expr.c`,
//! `parser_stmt.c`, `common_parser.c`): one submodule per grammar layer, sharing a
//! single token cursor.

mod common;
mod cursor;
mod expr;
mod spec;
mod stmt;

use crate::ast::Stmt;
use crate::diagnostics::Diagnostics;
use crate::token::{Token, TokenKind};

use cursor::Parser;

/// Parse a full token stream (as produced by [`crate::lex::tokenize`]) into a single
/// top-level block. The whole program is one implicit block, so the entry point is
/// just `parse_block` with no enclosing braces, followed by an end-of-input check.
pub fn parse(tokens: &[Token], diag: &mut Diagnostics) -> Result<Stmt, ()> {
    let mut p = Parser::new(tokens, diag);
    let mut stmts = Vec::new();
    let pos = p.peek().pos;

    while !p.at_end() {
        stmts.push(stmt::parse_stmt(&mut p)?);
    }

    if p.peek().kind != TokenKind::Eof {
        let found = p.peek().lexeme.clone();
        let found_pos = p.peek().pos;
        p.diag.unexpected_token(found_pos, found);
        return Err(());
    }

    Ok(Stmt::Block { pos, stmts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newtypes::TabWidth;

    fn parse_src(src: &str) -> Result<Stmt, ()> {
        let mut diag = Diagnostics::new("test.scrap");
        let tokens = crate::lex::tokenize(src.as_bytes(), TabWidth::default(), &mut diag).unwrap();
        parse(&tokens, &mut diag)
    }

    #[test]
    fn top_level_program_is_a_block_of_declarations() {
        let ast = parse_src("var x = 1; fn f() { return; }").unwrap();
        let Stmt::Block { stmts, .. } = ast else {
            panic!("expected top-level block")
        };
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn empty_program_parses_to_an_empty_block() {
        let ast = parse_src("").unwrap();
        let Stmt::Block { stmts, .. } = ast else {
            panic!("expected top-level block")
        };
        assert!(stmts.is_empty());
    }

    #[test]
    fn stray_closing_brace_is_a_syntax_error() {
        assert!(parse_src("}").is_err());
    }
}
