//! Expression type checking: the atom rules carried over verbatim from
//! `typecheck_atom`, and the operator/call/subscript/access/constructor rules this
//! crate completes (see `SPEC_FULL.md` §4.7 and `DESIGN.md`).

use crate::ast::{Expr, Op};
use crate::error_handling::TypeError;
use crate::newtypes::Position;
use crate::token::TokenKind;

use super::{Checker, Kind, Type};

fn numeric_result(a: &Type, b: &Type) -> Type {
    // standard C-family promotion: wider of the two integer ranks wins; this crate
    // does not model signed/unsigned mixing beyond picking the left operand's rank
    // when both sides already passed the numeric check.
    if rank(&a.kind) >= rank(&b.kind) {
        Type::new(a.kind.clone())
    } else {
        Type::new(b.kind.clone())
    }
}

fn rank(kind: &Kind) -> u8 {
    match kind {
        Kind::I8 | Kind::U8 => 1,
        Kind::I16 | Kind::U16 => 2,
        Kind::I32 | Kind::U32 => 3,
        Kind::I64 | Kind::U64 => 4,
        _ => 0,
    }
}

fn is_pointer(ty: &Type) -> bool {
    matches!(ty.kind, Kind::Pointer(..))
}

/// Whether two pointer types point to compatible element types; meaningless unless
/// both `lhs`/`rhs` are already known to be `Kind::Pointer`.
fn pointees_compatible(lhs: &Type, rhs: &Type) -> bool {
    match (&lhs.kind, &rhs.kind) {
        (Kind::Pointer(a, _), Kind::Pointer(b, _)) => a.compatible_with(b),
        _ => false,
    }
}

/// `+`/`-` additionally accept pointer arithmetic: `Pointer(T) +/- integer ->
/// Pointer(T)`, `integer + Pointer(T) -> Pointer(T)`, and `Pointer(T) - Pointer(T) ->
/// I64`. Returns `None` when neither the numeric nor the pointer form applies.
fn additive_result(op: Op, lhs: &Type, rhs: &Type) -> Option<Type> {
    if lhs.is_numeric() && rhs.is_numeric() {
        return Some(numeric_result(lhs, rhs));
    }
    if op == Op::Subtract && is_pointer(lhs) && is_pointer(rhs) && pointees_compatible(lhs, rhs) {
        return Some(Type::new(Kind::I64));
    }
    if is_pointer(lhs) && rhs.is_integer() {
        return Some(Type::new(lhs.kind.clone()));
    }
    if op == Op::Add && lhs.is_integer() && is_pointer(rhs) {
        return Some(Type::new(rhs.kind.clone()));
    }
    None
}

/// `<`/`<=`/`>`/`>=` accept two integer operands or two pointer operands of
/// comparable kind.
fn relational_ok(lhs: &Type, rhs: &Type) -> bool {
    (lhs.is_numeric() && rhs.is_numeric()) || (is_pointer(lhs) && is_pointer(rhs) && pointees_compatible(lhs, rhs))
}

pub fn check(checker: &mut Checker, expr: &mut Expr) -> Type {
    let ty = match expr {
        Expr::Error => return Type::error(),
        Expr::None { .. } => Type::new(Kind::Void),
        Expr::Grouped { inner, .. } => check(checker, inner),
        Expr::Atomic { token, .. } => check_atom(checker, token.kind, token),
        Expr::Array { pos, items, .. } => check_array(checker, *pos, items),
        Expr::Lambda {
            pos,
            param_names,
            param_specs,
            param_defaults,
            optc,
            body,
            ..
        } => check_lambda(checker, *pos, param_names, param_specs, param_defaults, *optc, body),
        Expr::Unary { pos, op, first, .. } => check_unary(checker, *pos, *op, first),
        Expr::Binary {
            pos,
            op,
            first,
            second,
            ..
        } => check_binary(checker, *pos, *op, first, second),
        Expr::Ternary {
            pos,
            first,
            second,
            third,
            ..
        } => check_ternary(checker, *pos, first, second, third),
        Expr::Subscript {
            pos, array, index, ..
        } => check_subscript(checker, *pos, array, index),
        Expr::Call { pos, fun, args, .. } => check_call(checker, *pos, fun, args, false),
        Expr::Constructor { pos, fun, args, .. } => check_call(checker, *pos, fun, args, true),
        Expr::Access { pos, obj, member, .. } => check_access(checker, *pos, obj, member),
    };
    expr.set_annotation(ty.clone());
    ty
}

fn check_atom(checker: &mut Checker, kind: TokenKind, token: &crate::token::Token) -> Type {
    match kind {
        TokenKind::IntLiteral => Type::new(Kind::I64),
        TokenKind::ChrLiteral => Type::new(Kind::U8),
        TokenKind::StrLiteral => Type::new(Kind::Array(Box::new(Type::new(Kind::U8)), true)),
        TokenKind::Ident => {
            let sym = token.ident_symbol().expect("ident token without symbol");
            let name = String::from_utf8_lossy(&crate::interner::resolve(sym)).into_owned();
            // the stored type already carries the declaration's lvalue/mutable bits.
            checker.lookup(&name, token.pos)
        }
        _ => Type::error(),
    }
}

fn check_array(checker: &mut Checker, pos: Position, items: &mut [Expr]) -> Type {
    let mut elem = Type::new(Kind::Void);
    for (i, item) in items.iter_mut().enumerate() {
        let ty = check(checker, item);
        if i == 0 {
            elem = ty;
        } else if !elem.compatible_with(&ty) {
            checker.diag.type_error(TypeError::IncompatibleOperands {
                pos,
                op: "array literal",
            });
        }
    }
    Type::new(Kind::Array(Box::new(elem), false))
}

fn check_lambda(
    checker: &mut Checker,
    _pos: Position,
    param_names: &[crate::token::Token],
    param_specs: &mut [crate::ast::TypeSpec],
    param_defaults: &mut [Expr],
    optc: usize,
    body: &mut Expr,
) -> Type {
    checker.push_scope();
    let mut params = Vec::with_capacity(param_specs.len());
    for ((name, spec), default) in param_names
        .iter()
        .zip(param_specs.iter())
        .zip(param_defaults.iter_mut())
    {
        let declared = super::spec::resolve(checker, spec);
        let resolved = if matches!(declared.kind, Kind::Undefined) && !matches!(default, Expr::None { .. }) {
            check(checker, default)
        } else {
            if !matches!(default, Expr::None { .. }) {
                check(checker, default);
            }
            declared
        };
        checker.declare(&name.lexeme, resolved.clone().lvalue(true));
        params.push(resolved);
    }
    let ret = check(checker, body);
    checker.pop_scope();
    Type::new(Kind::Function {
        params,
        optc,
        ret: Box::new(ret),
    })
}

fn check_unary(checker: &mut Checker, pos: Position, op: Op, first: &mut Expr) -> Type {
    let operand = check(checker, first);
    if operand.is_error() {
        return Type::error();
    }
    match op {
        Op::UnaryPlus | Op::Negate | Op::BinaryNot => {
            if operand.is_numeric() {
                Type::new(operand.kind)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands {
                    pos,
                    op: op.as_str(),
                });
                Type::error()
            }
        }
        Op::LogicalNot => {
            if matches!(operand.kind, Kind::Bool) {
                Type::new(Kind::Bool)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands {
                    pos,
                    op: op.as_str(),
                });
                Type::error()
            }
        }
        Op::Dereference => match operand.kind {
            Kind::Pointer(inner, is_const) => (*inner).lvalue(!is_const),
            _ => {
                checker.diag.type_error(TypeError::IncompatibleOperands {
                    pos,
                    op: op.as_str(),
                });
                Type::error()
            }
        },
        Op::AddressOf => {
            if operand.lvalue {
                Type::new(Kind::Pointer(Box::new(Type::new(operand.kind)), !operand.mutable))
            } else {
                checker.diag.type_error(TypeError::NotAssignable { pos });
                Type::error()
            }
        }
        Op::PreIncrement | Op::PreDecrement | Op::PostfixIncrement | Op::PostfixDecrement => {
            if operand.lvalue && operand.mutable && (operand.is_numeric() || is_pointer(&operand)) {
                Type::new(operand.kind)
            } else {
                checker.diag.type_error(TypeError::NotAssignable { pos });
                Type::error()
            }
        }
        _ => Type::error(),
    }
}

fn check_binary(
    checker: &mut Checker,
    pos: Position,
    op: Op,
    first: &mut Expr,
    second: &mut Expr,
) -> Type {
    if matches!(op, Op::Assign) {
        let lhs = check(checker, first);
        let rhs = check(checker, second);
        if !lhs.lvalue || !lhs.mutable {
            checker.diag.type_error(TypeError::NotAssignable { pos });
            return Type::error();
        }
        if lhs.is_error() || rhs.is_error() || !lhs.assignable_from(&rhs) {
            if !lhs.is_error() && !rhs.is_error() {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: "=" });
            }
            return Type::error();
        }
        return Type::new(lhs.kind);
    }

    let lhs = check(checker, first);
    let rhs = check(checker, second);
    if lhs.is_error() || rhs.is_error() {
        return Type::error();
    }

    match op {
        Op::Add | Op::Subtract => match additive_result(op, &lhs, &rhs) {
            Some(ty) => ty,
            None => {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
                Type::error()
            }
        },
        Op::Multiply | Op::Divide | Op::Modulo => {
            if lhs.is_numeric() && rhs.is_numeric() {
                numeric_result(&lhs, &rhs)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
                Type::error()
            }
        }
        Op::LeftShift | Op::RightShift => {
            if lhs.is_integer() && rhs.is_integer() {
                Type::new(lhs.kind)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
                Type::error()
            }
        }
        Op::BitwiseAnd | Op::BitwiseXor | Op::BitwiseOr => {
            if lhs.is_integer() && rhs.is_integer() {
                numeric_result(&lhs, &rhs)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
                Type::error()
            }
        }
        Op::LessThan | Op::LessOrEqual | Op::GreaterThan | Op::GreaterOrEqual => {
            if relational_ok(&lhs, &rhs) {
                Type::new(Kind::Bool)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
                Type::error()
            }
        }
        Op::Equal | Op::NotEqual => {
            if lhs.compatible_with(&rhs) {
                Type::new(Kind::Bool)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
                Type::error()
            }
        }
        Op::LogicalAnd | Op::LogicalOr => {
            if matches!(lhs.kind, Kind::Bool) && matches!(rhs.kind, Kind::Bool) {
                Type::new(Kind::Bool)
            } else {
                checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
                Type::error()
            }
        }
        _ => {
            checker.diag.type_error(TypeError::IncompatibleOperands { pos, op: op.as_str() });
            Type::error()
        }
    }
}

fn check_ternary(
    checker: &mut Checker,
    pos: Position,
    cond: &mut Expr,
    on_true: &mut Expr,
    on_false: &mut Expr,
) -> Type {
    let cond_ty = check(checker, cond);
    let a = check(checker, on_true);
    let b = check(checker, on_false);
    if !matches!(cond_ty.kind, Kind::Bool | Kind::Error) {
        checker
            .diag
            .type_error(TypeError::IncompatibleOperands { pos, op: "?:" });
        return Type::error();
    }
    if a.is_error() || b.is_error() {
        return Type::error();
    }
    if !a.compatible_with(&b) {
        checker.diag.type_error(TypeError::TernaryMismatch { pos });
        return Type::error();
    }
    Type::new(a.kind)
}

fn check_subscript(checker: &mut Checker, pos: Position, array: &mut Expr, index: &mut Expr) -> Type {
    let array_ty = check(checker, array);
    let index_ty = check(checker, index);
    if array_ty.is_error() {
        return Type::error();
    }
    if !index_ty.is_integer() {
        checker
            .diag
            .type_error(TypeError::IncompatibleOperands { pos, op: "[]" });
        return Type::error();
    }
    match array_ty.kind {
        Kind::Array(inner, is_const) | Kind::Pointer(inner, is_const) => {
            (*inner).lvalue(!is_const)
        }
        _ => {
            checker
                .diag
                .type_error(TypeError::IncompatibleOperands { pos, op: "[]" });
            Type::error()
        }
    }
}

fn check_call(
    checker: &mut Checker,
    pos: Position,
    fun: &mut Expr,
    args: &mut [Expr],
    is_constructor: bool,
) -> Type {
    let fun_ty = check(checker, fun);
    let arg_types: Vec<Type> = args.iter_mut().map(|a| check(checker, a)).collect();
    if fun_ty.is_error() {
        return Type::error();
    }

    if is_constructor {
        let Kind::Struct {
            member_types, optc, ..
        } = &fun_ty.kind
        else {
            checker.diag.type_error(TypeError::NotAStruct {
                pos,
                name: callee_name(fun),
            });
            return Type::error();
        };
        if !arity_ok(member_types.len(), *optc, arg_types.len()) {
            checker.diag.type_error(TypeError::ArityMismatch {
                pos,
                expected: member_types.len(),
                found: arg_types.len(),
            });
            return Type::error();
        }
        return Type::new(fun_ty.kind.clone());
    }

    let Kind::Function { params, optc, ret } = &fun_ty.kind else {
        checker.diag.type_error(TypeError::NotCallable {
            pos,
            name: callee_name(fun),
        });
        return Type::error();
    };
    if !arity_ok(params.len(), *optc, arg_types.len()) {
        checker.diag.type_error(TypeError::ArityMismatch {
            pos,
            expected: params.len(),
            found: arg_types.len(),
        });
        return Type::error();
    }
    Type::new(ret.kind.clone())
}

fn arity_ok(paramc: usize, optc: usize, argc: usize) -> bool {
    argc <= paramc && argc >= paramc - optc
}

fn callee_name(fun: &Expr) -> String {
    match fun {
        Expr::Atomic { token, .. } => token.lexeme.clone(),
        _ => "<expression>".to_string(),
    }
}

fn check_access(checker: &mut Checker, pos: Position, obj: &mut Expr, member: &crate::token::Token) -> Type {
    let obj_ty = check(checker, obj);
    if obj_ty.is_error() {
        return Type::error();
    }
    let Kind::Struct {
        member_names,
        member_types,
        ..
    } = &obj_ty.kind
    else {
        checker.diag.type_error(TypeError::NotAStruct {
            pos,
            name: callee_name(obj),
        });
        return Type::error();
    };
    match member_names.iter().position(|n| n == &member.lexeme) {
        Some(i) => member_types[i].clone().lvalue(obj_ty.mutable),
        None => {
            checker.diag.type_error(TypeError::NoSuchMember {
                pos,
                member: member.lexeme.clone(),
            });
            Type::error()
        }
    }
}
