//! Type-specifier parser.
//!
//! Grounded on `parser_spec.c`: atomic types and named types share a production,
//! suffix modifiers (`[]`, `*`, `const [...]`, `const *`) wrap left-to-right, and the
//! `(` ambiguity between a grouped spec and a function spec is resolved by the same
//! balanced-paren-then-peek lookahead the source's `is_lambda` performs (a function
//! spec's arrow is `=>`, identical to a lambda's — the source literally reuses
//! `is_lambda` here, and so does this parser, via [`super::common::is_lambda`]).

use crate::ast::TypeSpec;
use crate::token::TokenKind;

use super::common::is_lambda;
use super::cursor::Parser;

pub fn parse_type_spec(p: &mut Parser) -> Result<TypeSpec, ()> {
    let kind = p.peek().kind;
    if kind.is_primitive_type() || kind == TokenKind::Ident {
        let token = p.advance();
        let base = TypeSpec::Atomic { token };
        return parse_type_spec_mod(p, base);
    }

    if kind == TokenKind::LParen {
        let base = if is_lambda(p) {
            parse_fun_spec(p)?
        } else {
            parse_group(p)?
        };
        return parse_type_spec_mod(p, base);
    }

    let found = p.peek().lexeme.clone();
    let pos = p.peek().pos;
    p.diag.unexpected_token(pos, found);
    Err(())
}

fn parse_group(p: &mut Parser) -> Result<TypeSpec, ()> {
    let start = p.expect(TokenKind::LParen)?;
    let inner = parse_type_spec(p)?;
    p.expect(TokenKind::RParen)?;
    Ok(TypeSpec::Grouped {
        pos: start.pos,
        inner: Box::new(inner),
    })
}

fn parse_fun_spec(p: &mut Parser) -> Result<TypeSpec, ()> {
    let start = p.expect(TokenKind::LParen)?;

    // the parameter list here is a bare list of specs (each optionally `?`), not the
    // `name: spec` shape `parse_params` handles, so it is parsed inline.
    let mut params = Vec::new();
    let mut optc = 0;
    if p.peek().kind != TokenKind::RParen {
        loop {
            params.push(parse_type_spec(p)?);

            if p.peek().kind == TokenKind::Question {
                p.advance();
                optc += 1;
            } else if optc > 0 {
                p.diag
                    .syntax_error(crate::error_handling::SyntaxError::NonOptionalAfterOptional {
                        pos: start.pos,
                    });
                return Err(());
            }

            if p.peek().kind == TokenKind::Comma {
                p.advance();
            } else {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen)?;
    p.expect(TokenKind::FatArrow)?;
    let ret = parse_type_spec(p)?;

    Ok(TypeSpec::Function {
        pos: start.pos,
        params,
        optc,
        ret: Box::new(ret),
    })
}

/// Apply zero or more suffix modifiers to `base`: `[]`, `*`, `const [...]`/`const *`.
fn parse_type_spec_mod(p: &mut Parser, base: TypeSpec) -> Result<TypeSpec, ()> {
    match p.peek().kind {
        TokenKind::LBracket => wrap_array(p, base, false),
        TokenKind::Star => wrap_pointer(p, base, false),
        TokenKind::Const => {
            p.advance();
            match p.peek().kind {
                TokenKind::LBracket => wrap_array(p, base, true),
                TokenKind::Star => wrap_pointer(p, base, true),
                _ => {
                    let found = p.peek().lexeme.clone();
                    let pos = p.peek().pos;
                    p.diag.unexpected_token(pos, found);
                    Err(())
                }
            }
        }
        _ => Ok(base),
    }
}

fn wrap_array(p: &mut Parser, base: TypeSpec, is_const: bool) -> Result<TypeSpec, ()> {
    let pos = base.pos();
    p.advance();
    p.expect(TokenKind::RBracket)?;
    let wrapped = TypeSpec::Array {
        pos,
        inner: Box::new(base),
        is_const,
    };
    parse_type_spec_mod(p, wrapped)
}

fn wrap_pointer(p: &mut Parser, base: TypeSpec, is_const: bool) -> Result<TypeSpec, ()> {
    let pos = base.pos();
    p.advance();
    let wrapped = TypeSpec::Pointer {
        pos,
        inner: Box::new(base),
        is_const,
    };
    parse_type_spec_mod(p, wrapped)
}
