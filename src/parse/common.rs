//! Helpers shared across the expression, type-spec, and statement parsers.
//!
//! Grounded on `common_parser.c`: the `is_expr`/`is_statement` starter-set checks, the
//! `is_lambda` balanced-paren lookahead (folded into [`super::cursor::Parser::scan_matching_paren`]),
//! and the `parse_params`/`parse_args` list grammars shared by functions, lambdas,
//! structs, calls, and constructors.

use crate::ast::{Expr, Param, Params, TypeSpec};
use crate::error_handling::SyntaxError;
use crate::token::TokenKind;

use super::cursor::Parser;
use super::{expr as expr_parser, spec as spec_parser};

pub fn is_expr_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntLiteral
            | TokenKind::ChrLiteral
            | TokenKind::StrLiteral
            | TokenKind::Ident
            | TokenKind::Plus
            | TokenKind::PlusPlus
            | TokenKind::Minus
            | TokenKind::MinusMinus
            | TokenKind::Tilde
            | TokenKind::Bang
            | TokenKind::Star
            | TokenKind::Amp
            | TokenKind::LBracket
            | TokenKind::LParen
    )
}

pub fn is_statement_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon
            | TokenKind::Var
            | TokenKind::Const
            | TokenKind::Type
            | TokenKind::If
            | TokenKind::Switch
            | TokenKind::While
            | TokenKind::Do
            | TokenKind::For
            | TokenKind::Fn
            | TokenKind::Struct
            | TokenKind::Enum
            | TokenKind::Return
            | TokenKind::Break
            | TokenKind::Continue
    ) || is_expr_start(kind)
}

/// Whether the current `(` opens a lambda, decided by looking past its matching `)`
/// for `=>`.
pub fn is_lambda(p: &Parser) -> bool {
    if p.peek().kind != TokenKind::LParen {
        return false;
    }
    let offset = p.scan_matching_paren();
    p.peek_at(offset).kind == TokenKind::FatArrow
}

/// `name[: spec][= default], ...` — shared by function/lambda parameter lists and
/// struct member lists. Once one parameter has a default, every later one must too.
pub fn parse_params(p: &mut Parser) -> Result<Params, ()> {
    let mut items = Vec::new();
    let mut optc = 0;

    if p.peek().kind == TokenKind::Ident {
        loop {
            let name = p.expect(TokenKind::Ident)?;

            let spec = if p.peek().kind == TokenKind::Colon {
                p.advance();
                spec_parser::parse_type_spec(p)?
            } else {
                TypeSpec::Inferred { pos: name.pos }
            };

            let default = if p.peek().kind == TokenKind::Eq {
                p.advance();
                let def = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
                optc += 1;
                def
            } else if optc > 0 {
                p.diag
                    .syntax_error(SyntaxError::NonOptionalAfterOptional { pos: name.pos });
                return Err(());
            } else {
                Expr::None { pos: name.pos }
            };

            items.push(Param { name, spec, default });

            if p.peek().kind == TokenKind::Comma {
                p.advance();
            } else {
                break;
            }
        }
    }

    Ok(Params { items, optc })
}

/// `expr, expr, ...` — shared by call and constructor argument lists.
pub fn parse_args(p: &mut Parser) -> Result<Vec<Expr>, ()> {
    let mut items = Vec::new();
    if is_expr_start(p.peek().kind) {
        loop {
            items.push(expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?);
            if p.peek().kind == TokenKind::Comma {
                p.advance();
            } else {
                break;
            }
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::newtypes::TabWidth;

    fn params_of(src: &str) -> Params {
        let mut diag = Diagnostics::new("test.scrap");
        let tokens = crate::lex::tokenize(src.as_bytes(), TabWidth::default(), &mut diag).unwrap();
        let mut p = Parser::new(&tokens, &mut diag);
        parse_params(&mut p).unwrap()
    }

    #[test]
    fn empty_param_list_has_no_items() {
        let params = params_of("");
        assert!(params.items.is_empty());
        assert_eq!(params.optc, 0);
    }

    #[test]
    fn trailing_optional_params_are_counted() {
        let params = params_of("x, y = 1, z = 2");
        assert_eq!(params.items.len(), 3);
        assert_eq!(params.optc, 2);
    }

    #[test]
    fn non_optional_after_optional_is_rejected() {
        let mut diag = Diagnostics::new("test.scrap");
        let tokens = crate::lex::tokenize(b"x = 1, y", TabWidth::default(), &mut diag).unwrap();
        let mut p = Parser::new(&tokens, &mut diag);
        assert!(parse_params(&mut p).is_err());
    }
}
