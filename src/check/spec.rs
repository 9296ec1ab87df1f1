//! Resolves a syntactic [`crate::ast::TypeSpec`] (as written in source) into a
//! semantic [`Type`].

use crate::ast::TypeSpec;
use crate::error_handling::TypeError;
use crate::token::TokenKind;

use super::{Checker, Kind, Type};

/// Resolve a written type specifier. `Inferred` resolves to [`Kind::Undefined`]: the
/// caller (a `decl` with no `: spec`, a lambda parameter with no annotation) is
/// expected to fall back to the value's or default's checked type instead.
pub fn resolve(checker: &mut Checker, spec: &TypeSpec) -> Type {
    match spec {
        TypeSpec::Error => Type::error(),
        TypeSpec::Inferred { .. } => Type::new(Kind::Undefined),
        TypeSpec::Grouped { inner, .. } => resolve(checker, inner),
        TypeSpec::Atomic { token } => resolve_atomic(checker, token),
        TypeSpec::Array { inner, is_const, .. } => {
            Type::new(Kind::Array(Box::new(resolve(checker, inner)), *is_const))
        }
        TypeSpec::Pointer { inner, is_const, .. } => {
            Type::new(Kind::Pointer(Box::new(resolve(checker, inner)), *is_const))
        }
        TypeSpec::Function {
            params, optc, ret, ..
        } => Type::new(Kind::Function {
            params: params.iter().map(|p| resolve(checker, p)).collect(),
            optc: *optc,
            ret: Box::new(resolve(checker, ret)),
        }),
    }
}

fn resolve_atomic(checker: &mut Checker, token: &crate::token::Token) -> Type {
    let kind = match token.kind {
        TokenKind::Void => Some(Kind::Void),
        TokenKind::Bool => Some(Kind::Bool),
        TokenKind::I8 => Some(Kind::I8),
        TokenKind::I16 => Some(Kind::I16),
        TokenKind::I32 => Some(Kind::I32),
        TokenKind::I64 => Some(Kind::I64),
        TokenKind::U8 => Some(Kind::U8),
        TokenKind::U16 => Some(Kind::U16),
        TokenKind::U32 => Some(Kind::U32),
        TokenKind::U64 => Some(Kind::U64),
        _ => None,
    };
    if let Some(kind) = kind {
        return Type::new(kind);
    }

    // a named typedef/struct/enum: resolved the same way an ordinary identifier is.
    let sym = token.ident_symbol().expect("atomic type spec without a name");
    let name = String::from_utf8_lossy(&crate::interner::resolve(sym)).into_owned();
    let resolved = checker.lookup(&name, token.pos);
    if resolved.is_error() {
        return resolved;
    }
    match &resolved.kind {
        Kind::Typedef { .. } | Kind::Struct { .. } | Kind::Enum { .. } => resolved,
        _ => {
            checker.diag.type_error(TypeError::UndefinedIdentifier { pos: token.pos, name });
            Type::error()
        }
    }
}
