//! Statement parser.
//!
//! Grounded on `parser_stmt.c`: a single `parse_stmt` dispatches on the leading
//! token, blocks are a brace-delimited loop over `parse_stmt` while
//! [`super::common::is_statement_start`] holds, and `if`/`while`/`for` reuse the same
//! `parse_block_or_stmt` single-statement-or-block convention (a bare statement is
//! accepted as a body, not just a `{ ... }` block).

use crate::ast::{Stmt, SwitchCase, TypeSpec};
use crate::error_handling::SyntaxError;
use crate::token::TokenKind;

use super::common::{is_statement_start, parse_params};
use super::cursor::Parser;
use super::expr as expr_parser;
use super::spec as spec_parser;

pub fn parse_block(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::LBrace)?;
    let mut stmts = Vec::new();
    while p.peek().kind != TokenKind::RBrace {
        if p.at_end() {
            p.diag.unexpected_token(p.peek().pos, p.peek().lexeme.clone());
            return Err(());
        }
        stmts.push(parse_stmt(p)?);
    }
    p.expect(TokenKind::RBrace)?;
    Ok(Stmt::Block { pos: start.pos, stmts })
}

/// A single statement used as a loop/branch body: a brace block, or any other
/// statement standing alone.
fn parse_body(p: &mut Parser) -> Result<Stmt, ()> {
    if p.peek().kind == TokenKind::LBrace {
        parse_block(p)
    } else {
        parse_stmt(p)
    }
}

pub fn parse_stmt(p: &mut Parser) -> Result<Stmt, ()> {
    match p.peek().kind {
        TokenKind::Semicolon => {
            let tok = p.advance();
            Ok(Stmt::Nop { pos: tok.pos })
        }
        TokenKind::LBrace => parse_block(p),
        TokenKind::Var => parse_decl(p, true),
        TokenKind::Const => parse_decl(p, false),
        TokenKind::Type => parse_typedef(p),
        TokenKind::If => parse_ifelse(p),
        TokenKind::Switch => parse_switch(p),
        TokenKind::While => parse_while(p),
        TokenKind::Do => parse_dowhile(p),
        TokenKind::For => parse_for(p),
        TokenKind::Fn => parse_function(p),
        TokenKind::Struct => parse_struct(p),
        TokenKind::Enum => parse_enum(p),
        TokenKind::Return => parse_return(p),
        TokenKind::Break => {
            let tok = p.advance();
            p.expect(TokenKind::Semicolon)?;
            Ok(Stmt::Break { pos: tok.pos })
        }
        TokenKind::Continue => {
            let tok = p.advance();
            p.expect(TokenKind::Semicolon)?;
            Ok(Stmt::Continue { pos: tok.pos })
        }
        kind if super::common::is_expr_start(kind) => {
            let pos = p.peek().pos;
            let expr = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
            p.expect(TokenKind::Semicolon)?;
            Ok(Stmt::Expr { pos, expr })
        }
        _ => {
            let found = p.peek().lexeme.clone();
            let pos = p.peek().pos;
            p.diag.unexpected_token(pos, found);
            Err(())
        }
    }
}

fn parse_decl(p: &mut Parser, mutable: bool) -> Result<Stmt, ()> {
    let start = p.advance();
    let name = p.expect(TokenKind::Ident)?;

    let spec = if p.peek().kind == TokenKind::Colon {
        p.advance();
        spec_parser::parse_type_spec(p)?
    } else {
        TypeSpec::Inferred { pos: name.pos }
    };

    let value = if p.peek().kind == TokenKind::Eq {
        p.advance();
        expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?
    } else {
        crate::ast::Expr::None { pos: name.pos }
    };

    p.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Decl {
        pos: start.pos,
        name,
        spec,
        value,
        mutable,
    })
}

fn parse_typedef(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::Type)?;
    let name = p.expect(TokenKind::Ident)?;
    p.expect(TokenKind::Eq)?;
    let spec = spec_parser::parse_type_spec(p)?;
    p.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Typedef { pos: start.pos, name, spec })
}

fn parse_ifelse(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::If)?;
    p.expect(TokenKind::LParen)?;
    let cond = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
    p.expect(TokenKind::RParen)?;
    let on_true = parse_body(p)?;

    // dangling-else binds to the nearest preceding `if`, which falls out naturally
    // from this being a simple recursive-descent peek with no lookahead buffering.
    let on_false = if p.peek().kind == TokenKind::Else {
        p.advance();
        Some(Box::new(parse_body(p)?))
    } else {
        None
    };

    Ok(Stmt::IfElse {
        pos: start.pos,
        cond,
        on_true: Box::new(on_true),
        on_false,
    })
}

fn parse_switch(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::Switch)?;
    p.expect(TokenKind::LParen)?;
    let scrutinee = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
    p.expect(TokenKind::RParen)?;
    p.expect(TokenKind::LBrace)?;

    let mut cases = Vec::new();
    let mut default_index = None;

    while p.peek().kind == TokenKind::Case || p.peek().kind == TokenKind::Default {
        if p.peek().kind == TokenKind::Default {
            let default_pos = p.peek().pos;
            p.advance();
            p.expect(TokenKind::Colon)?;
            if default_index.is_some() {
                p.diag
                    .syntax_error(SyntaxError::MultipleDefaultLabels { pos: default_pos });
                return Err(());
            }
            default_index = Some(cases.len());
            let branch = parse_stmt(p)?;
            cases.push(SwitchCase {
                label: crate::ast::Expr::None { pos: default_pos },
                branch,
            });
        } else {
            p.advance();
            let label = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
            p.expect(TokenKind::Colon)?;
            let branch = parse_stmt(p)?;
            cases.push(SwitchCase { label, branch });
        }
    }

    p.expect(TokenKind::RBrace)?;
    Ok(Stmt::Switch {
        pos: start.pos,
        scrutinee,
        default_index: default_index.unwrap_or(cases.len()),
        cases,
    })
}

fn parse_while(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::While)?;
    p.expect(TokenKind::LParen)?;
    let cond = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
    p.expect(TokenKind::RParen)?;
    let body = parse_body(p)?;
    Ok(Stmt::While {
        pos: start.pos,
        cond,
        body: Box::new(body),
    })
}

fn parse_dowhile(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::Do)?;
    let body = parse_body(p)?;
    p.expect(TokenKind::While)?;
    p.expect(TokenKind::LParen)?;
    let cond = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
    p.expect(TokenKind::RParen)?;
    p.expect(TokenKind::Semicolon)?;
    Ok(Stmt::DoWhile {
        pos: start.pos,
        cond,
        body: Box::new(body),
    })
}

fn parse_for(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::For)?;
    p.expect(TokenKind::LParen)?;

    let init = match p.peek().kind {
        TokenKind::Semicolon => {
            let tok = p.advance();
            Stmt::Nop { pos: tok.pos }
        }
        TokenKind::Var => parse_decl(p, true)?,
        TokenKind::Const => parse_decl(p, false)?,
        _ => {
            let pos = p.peek().pos;
            let expr = expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?;
            p.expect(TokenKind::Semicolon)?;
            Stmt::Expr { pos, expr }
        }
    };

    let cond = if p.peek().kind == TokenKind::Semicolon {
        crate::ast::Expr::None { pos: p.peek().pos }
    } else {
        expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?
    };
    p.expect(TokenKind::Semicolon)?;

    let step = if p.peek().kind == TokenKind::RParen {
        crate::ast::Expr::None { pos: p.peek().pos }
    } else {
        expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?
    };
    p.expect(TokenKind::RParen)?;

    let body = parse_body(p)?;

    Ok(Stmt::For {
        pos: start.pos,
        init: Box::new(init),
        cond,
        step,
        body: Box::new(body),
    })
}

fn parse_function(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::Fn)?;
    let name = p.expect(TokenKind::Ident)?;
    p.expect(TokenKind::LParen)?;
    let params = parse_params(p)?;
    p.expect(TokenKind::RParen)?;

    let ret = if p.peek().kind == TokenKind::Colon {
        p.advance();
        spec_parser::parse_type_spec(p)?
    } else {
        TypeSpec::Inferred { pos: name.pos }
    };

    let body = parse_block(p)?;
    Ok(Stmt::Fn {
        pos: start.pos,
        name,
        params,
        ret,
        body: Box::new(body),
    })
}

fn parse_struct(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::Struct)?;
    let name = p.expect(TokenKind::Ident)?;
    p.expect(TokenKind::LBrace)?;
    let members = parse_params(p)?;
    p.expect(TokenKind::RBrace)?;
    p.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Struct { pos: start.pos, name, members })
}

fn parse_enum(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::Enum)?;
    let name = p.expect(TokenKind::Ident)?;
    p.expect(TokenKind::LBrace)?;

    let mut items = Vec::new();
    if p.peek().kind == TokenKind::Ident {
        loop {
            items.push(p.expect(TokenKind::Ident)?);
            if p.peek().kind == TokenKind::Comma {
                p.advance();
            } else {
                break;
            }
        }
    }

    p.expect(TokenKind::RBrace)?;
    p.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Enum { pos: start.pos, name, items })
}

fn parse_return(p: &mut Parser) -> Result<Stmt, ()> {
    let start = p.expect(TokenKind::Return)?;
    let value = if p.peek().kind == TokenKind::Semicolon {
        crate::ast::Expr::None { pos: start.pos }
    } else {
        expr_parser::parse_expr(p, expr_parser::MAX_PRECEDENCE)?
    };
    p.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Return { pos: start.pos, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::newtypes::TabWidth;

    fn stmt_of(src: &str) -> Stmt {
        let mut diag = Diagnostics::new("test.scrap");
        let tokens = crate::lex::tokenize(src.as_bytes(), TabWidth::default(), &mut diag).unwrap();
        let mut p = Parser::new(&tokens, &mut diag);
        parse_stmt(&mut p).expect("should parse")
    }

    #[test]
    fn decl_with_inferred_type_and_initializer() {
        let s = stmt_of("var x = 1;");
        let Stmt::Decl { spec, mutable, .. } = s else {
            panic!("expected decl")
        };
        assert!(mutable);
        assert!(matches!(spec, TypeSpec::Inferred { .. }));
    }

    #[test]
    fn const_decl_is_immutable() {
        let s = stmt_of("const x: i32 = 1;");
        let Stmt::Decl { mutable, .. } = s else {
            panic!("expected decl")
        };
        assert!(!mutable);
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let s = stmt_of("if (a) if (b) c; else d;");
        let Stmt::IfElse { on_true, .. } = s else {
            panic!("expected if/else")
        };
        let Stmt::IfElse { on_false, .. } = *on_true else {
            panic!("expected nested if/else")
        };
        assert!(on_false.is_some());
    }

    #[test]
    fn switch_tracks_default_index() {
        let s = stmt_of("switch (x) { case 1: break; default: break; case 2: break; }");
        let Stmt::Switch { default_index, cases, .. } = s else {
            panic!("expected switch")
        };
        assert_eq!(default_index, 1);
        assert_eq!(cases.len(), 3);
    }

    #[test]
    fn duplicate_default_labels_are_rejected() {
        let mut diag = Diagnostics::new("test.scrap");
        let tokens = crate::lex::tokenize(
            b"switch (x) { default: break; default: break; }",
            TabWidth::default(),
            &mut diag,
        )
        .unwrap();
        let mut p = Parser::new(&tokens, &mut diag);
        assert!(parse_stmt(&mut p).is_err());
    }

    #[test]
    fn for_loop_allows_empty_clauses() {
        let s = stmt_of("for (;;) break;");
        let Stmt::For { init, cond, step, .. } = s else {
            panic!("expected for")
        };
        assert!(matches!(*init, Stmt::Nop { .. }));
        assert!(matches!(cond, crate::ast::Expr::None { .. }));
        assert!(matches!(step, crate::ast::Expr::None { .. }));
    }

    #[test]
    fn function_without_return_spec_defaults_to_inferred() {
        let s = stmt_of("fn f() { return; }");
        let Stmt::Fn { ret, .. } = s else {
            panic!("expected fn")
        };
        assert!(matches!(ret, TypeSpec::Inferred { .. }));
    }

    #[test]
    fn struct_reuses_param_list_grammar() {
        let s = stmt_of("struct Point { x: i32, y: i32 };");
        let Stmt::Struct { members, .. } = s else {
            panic!("expected struct")
        };
        assert_eq!(members.items.len(), 2);
    }

    #[test]
    fn enum_is_a_comma_separated_identifier_list() {
        let s = stmt_of("enum Color { Red, Green, Blue };");
        let Stmt::Enum { items, .. } = s else {
            panic!("expected enum")
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn block_accumulates_statements_until_closing_brace() {
        let s = stmt_of("{ var x = 1; var y = 2; }");
        let Stmt::Block { stmts, .. } = s else {
            panic!("expected block")
        };
        assert_eq!(stmts.len(), 2);
    }
}
