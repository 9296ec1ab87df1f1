//! Statement checking: the block pre-scan/walk algorithm from `typecheck_block`, plus
//! per-form checks for every statement variant the source's partial switch left empty.

use crate::ast::{Expr, Stmt};
use crate::error_handling::TypeError;

use super::{expr, spec, Checker, Kind, Type};

/// Entry point for the top-level program: the outermost block has no enclosing scope.
pub fn check_block_contents(checker: &mut Checker, block: &mut Stmt) {
    checker.push_scope();
    if let Stmt::Block { stmts, .. } = block {
        prescan(checker, stmts);
        for stmt in stmts.iter_mut() {
            check(checker, stmt);
        }
    }
    checker.pop_scope();
}

/// Reserve an `Undefined` slot for every name this block introduces, before any
/// statement is actually checked, so `fn`/`struct`/`enum`/`typedef` can forward-
/// reference each other. `var`/`const` are reserved too (so shadowing is detected)
/// but a lookup against their still-`Undefined` slot is rejected — see
/// `Checker::lookup`.
fn prescan(checker: &mut Checker, stmts: &[Stmt]) {
    for stmt in stmts {
        let name = match stmt {
            Stmt::Decl { name, .. } | Stmt::Typedef { name, .. } | Stmt::Fn { name, .. } => name,
            Stmt::Struct { name, .. } => name,
            Stmt::Enum { name, .. } => name,
            _ => continue,
        };
        let key = String::from_utf8_lossy(name.lexeme.as_bytes()).into_owned();
        checker.declare(&key, Type::new(Kind::Undefined));
    }
}

fn ident(token: &crate::token::Token) -> String {
    token.lexeme.clone()
}

/// Gather the checked type of every `return` reachable through `stmt`'s own control
/// flow, without descending into a nested `fn`'s body (its returns belong to that
/// function, not the enclosing one).
fn collect_return_types(stmt: &Stmt, out: &mut Vec<Type>) {
    match stmt {
        Stmt::Return { value, .. } => {
            out.push(value.annotation().cloned().unwrap_or_else(|| Type::new(Kind::Void)));
        }
        Stmt::Block { stmts, .. } => {
            for s in stmts {
                collect_return_types(s, out);
            }
        }
        Stmt::IfElse { on_true, on_false, .. } => {
            collect_return_types(on_true, out);
            if let Some(on_false) = on_false {
                collect_return_types(on_false, out);
            }
        }
        Stmt::Switch { cases, .. } => {
            for case in cases {
                collect_return_types(&case.branch, out);
            }
        }
        Stmt::While { body, .. } | Stmt::DoWhile { body, .. } | Stmt::For { body, .. } => {
            collect_return_types(body, out);
        }
        _ => {}
    }
}

pub fn check(checker: &mut Checker, stmt: &mut Stmt) {
    match stmt {
        Stmt::Error | Stmt::Nop { .. } | Stmt::Break { .. } | Stmt::Continue { .. } => {}
        Stmt::Block { stmts, .. } => {
            checker.push_scope();
            prescan(checker, stmts);
            for s in stmts.iter_mut() {
                check(checker, s);
            }
            checker.pop_scope();
        }
        Stmt::Expr { expr: e, .. } => {
            expr::check(checker, e);
        }
        Stmt::Decl {
            name, spec: ty_spec, value, mutable, ..
        } => {
            let declared = spec::resolve(checker, ty_spec);
            let value_ty = expr::check(checker, value);
            let resolved = if matches!(declared.kind, Kind::Undefined) {
                value_ty
            } else if !declared.is_error() && !value_ty.is_error() && !declared.assignable_from(&value_ty)
            {
                checker.diag.type_error(TypeError::IncompatibleOperands {
                    pos: value.pos(),
                    op: "=",
                });
                Type::error()
            } else {
                declared
            };
            checker.declare(&ident(name), resolved.lvalue(*mutable));
        }
        Stmt::Typedef { name, spec: ty_spec, .. } => {
            let underlying = spec::resolve(checker, ty_spec);
            let id = checker.fresh_id();
            checker.declare(
                &ident(name),
                Type::new(Kind::Typedef {
                    id,
                    name: ident(name),
                    underlying: Box::new(underlying),
                }),
            );
        }
        Stmt::IfElse {
            cond, on_true, on_false, ..
        } => {
            expr::check(checker, cond);
            check(checker, on_true);
            if let Some(on_false) = on_false {
                check(checker, on_false);
            }
        }
        Stmt::Switch {
            scrutinee, cases, ..
        } => {
            expr::check(checker, scrutinee);
            for case in cases.iter_mut() {
                if !matches!(case.label, Expr::None { .. }) {
                    expr::check(checker, &mut case.label);
                }
                check(checker, &mut case.branch);
            }
        }
        Stmt::While { cond, body, .. } | Stmt::DoWhile { cond, body, .. } => {
            expr::check(checker, cond);
            check(checker, body);
        }
        Stmt::For {
            init, cond, step, body, ..
        } => {
            checker.push_scope();
            check(checker, init);
            if !matches!(cond, Expr::None { .. }) {
                expr::check(checker, cond);
            }
            if !matches!(step, Expr::None { .. }) {
                expr::check(checker, step);
            }
            check(checker, body);
            checker.pop_scope();
        }
        Stmt::Fn {
            name,
            params,
            ret,
            body,
            ..
        } => {
            checker.push_scope();
            let mut param_types = Vec::with_capacity(params.items.len());
            for param in params.items.iter_mut() {
                let declared = spec::resolve(checker, &param.spec);
                let resolved = if matches!(declared.kind, Kind::Undefined) && !matches!(param.default, Expr::None { .. })
                {
                    expr::check(checker, &mut param.default)
                } else {
                    if !matches!(param.default, Expr::None { .. }) {
                        expr::check(checker, &mut param.default);
                    }
                    declared
                };
                checker.declare(&ident(&param.name), resolved.clone().lvalue(true));
                param_types.push(resolved);
            }
            let declared_ret = spec::resolve(checker, ret);
            check(checker, body);
            checker.pop_scope();

            // an omitted return spec resolves to `Undefined`; fall back to the type
            // of the body's own `return` statement, per `spec::resolve`'s contract.
            let ret_ty = if matches!(declared_ret.kind, Kind::Undefined) {
                let mut returns = Vec::new();
                collect_return_types(body, &mut returns);
                returns.into_iter().next().unwrap_or_else(|| Type::new(Kind::Void))
            } else {
                declared_ret
            };

            let fn_ty = Type::new(Kind::Function {
                params: param_types,
                optc: params.optc,
                ret: Box::new(ret_ty),
            });
            // the function's own name is declared in the *enclosing* scope, which the
            // pre-scan already reserved a slot for.
            checker.declare(&ident(name), fn_ty);
        }
        Stmt::Struct { name, members, .. } => {
            let id = checker.fresh_id();
            let member_names: Vec<String> = members.items.iter().map(|p| ident(&p.name)).collect();
            let member_types: Vec<Type> = members
                .items
                .iter()
                .map(|p| spec::resolve(checker, &p.spec))
                .collect();
            checker.declare(
                &ident(name),
                Type::new(Kind::Struct {
                    id,
                    name: ident(name),
                    member_names,
                    member_types,
                    optc: members.optc,
                }),
            );
        }
        Stmt::Enum { name, items, .. } => {
            let id = checker.fresh_id();
            let item_names: Vec<String> = items.iter().map(ident).collect();
            checker.declare(
                &ident(name),
                Type::new(Kind::Enum {
                    id,
                    name: ident(name),
                    items: item_names.clone(),
                }),
            );
            for item in &item_names {
                checker.declare(
                    item,
                    Type::new(Kind::EnumItem {
                        enum_id: id,
                        name: ident(name),
                        item: item.clone(),
                    }),
                );
            }
        }
        Stmt::Return { value, .. } => {
            if !matches!(value, Expr::None { .. }) {
                expr::check(checker, value);
            }
        }
    }
}
