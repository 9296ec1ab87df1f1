//! Name resolution and type checking.
//!
//! Grounded on `typechecker.c`: a single-pass walk over the AST carrying a
//! parent-linked scope chain, pre-scanning each block for `decl`/`typedef`/`fn`/
//! `struct`/`enum` names so mutually-recursive declarations can see each other. The
//! source's `SymbolTable` is a hand-linked list of parent pointers; here the same
//! lookup-innermost-first semantics are expressed as a `Vec` of scopes searched from
//! the end, which avoids the source's manual scope allocation/teardown entirely —
//! scopes are pushed and popped like any other stack.
//!
//! The operator/call/subscript/access/constructor rules are only partially present in
//! the source (most `typecheck_expr`/`typecheck_stmt` cases fall through to
//! `ERROR_TYPE`). The rules implemented below are this crate's completion of that
//! partial pass, not a literal port.

mod expr;
mod spec;
mod stmt;

use std::collections::HashMap;

use crate::ast::Stmt;
use crate::diagnostics::Diagnostics;
use crate::error_handling::TypeError;
use crate::newtypes::Position;

/// The resolved semantic type of an expression, declaration, or symbol-table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub kind: Kind,
    /// Addressable / assignable root (a variable, a dereference, a subscript, an
    /// access) as opposed to a transient value (a literal, an arithmetic result).
    pub lvalue: bool,
    /// Whether an lvalue of this type may be written through. Meaningless when
    /// `lvalue` is false.
    pub mutable: bool,
}

impl Type {
    pub fn new(kind: Kind) -> Self {
        Type {
            kind,
            lvalue: false,
            mutable: false,
        }
    }

    pub fn lvalue(mut self, mutable: bool) -> Self {
        self.lvalue = true;
        self.mutable = mutable;
        self
    }

    pub fn error() -> Self {
        Type::new(Kind::Error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, Kind::Error)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.kind,
            Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64 | Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
    }

    /// Structural equality for type-compatibility checks; struct/enum/typedef compare
    /// by their unique id rather than by shape, matching the source's identity rule.
    pub fn compatible_with(&self, other: &Type) -> bool {
        use Kind::*;
        match (&self.kind, &other.kind) {
            (Error, _) | (_, Error) => true,
            (a, b) if a == b => true,
            (Array(a, _), Array(b, _)) | (Pointer(a, _), Pointer(b, _)) => a.compatible_with(b),
            _ => false,
        }
    }

    /// Whether a value of type `source` may be assigned/initialized into a slot of
    /// type `self` (`self` is the declared/target type). Same rule as
    /// [`Type::compatible_with`], plus the literal-coercion special case: every
    /// integer literal checks as the literal type ([`LITERAL_TYPE`]), and such a
    /// value coerces into any other integer type.
    pub fn assignable_from(&self, source: &Type) -> bool {
        self.compatible_with(source) || (matches!(source.kind, Kind::I64) && self.is_integer())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Error,
    /// Forward-declaration placeholder; a lookup that resolves to this is reported as
    /// "identifier undefined".
    Undefined,
    Void,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Array(Box<Type>, bool),
    Pointer(Box<Type>, bool),
    Function {
        params: Vec<Type>,
        optc: usize,
        ret: Box<Type>,
    },
    Struct {
        id: u64,
        name: String,
        member_names: Vec<String>,
        member_types: Vec<Type>,
        optc: usize,
    },
    Enum {
        id: u64,
        name: String,
        items: Vec<String>,
    },
    EnumItem {
        enum_id: u64,
        name: String,
        item: String,
    },
    Typedef {
        id: u64,
        name: String,
        underlying: Box<Type>,
    },
}

/// The integer literal's provisional type before it participates in an operation;
/// the source calls this the "literal type" constant.
pub const LITERAL_TYPE: Kind = Kind::I64;

struct Scope {
    symbols: HashMap<String, Type>,
}

/// Name resolution and type state threaded through one compilation's checking pass.
pub struct Checker<'d> {
    scopes: Vec<Scope>,
    next_id: u64,
    diag: &'d mut Diagnostics,
}

impl<'d> Checker<'d> {
    pub fn new(diag: &'d mut Diagnostics) -> Self {
        Checker {
            scopes: Vec::new(),
            next_id: 1,
            diag,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_scope(&mut self) {
        self.scopes.push(Scope {
            symbols: HashMap::new(),
        });
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str, ty: Type) {
        self.scopes
            .last_mut()
            .expect("declare called outside any scope")
            .symbols
            .insert(name.to_string(), ty);
    }

    /// Walk the scope chain innermost-to-outermost, the same order the source's
    /// parent-pointer recursion visits.
    fn lookup(&mut self, name: &str, pos: Position) -> Type {
        for scope in self.scopes.iter().rev() {
            if let Some(ty) = scope.symbols.get(name) {
                if matches!(ty.kind, Kind::Undefined) {
                    self.diag.type_error(TypeError::UndefinedIdentifier {
                        pos,
                        name: name.to_string(),
                    });
                    return Type::error();
                }
                return ty.clone();
            }
        }
        self.diag.type_error(TypeError::UndefinedIdentifier {
            pos,
            name: name.to_string(),
        });
        Type::error()
    }
}

/// Check a parsed program (the top-level block). Returns `true` iff no error fired.
pub fn check(ast: &mut Stmt, diag: &mut Diagnostics) -> bool {
    let mut checker = Checker::new(diag);
    stmt::check_block_contents(&mut checker, ast);
    !checker.diag.had_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::lex::tokenize;
    use crate::newtypes::TabWidth;
    use crate::parse::parse;

    fn check_source(src: &str) -> (Stmt, bool) {
        let mut diag = Diagnostics::new("test.scrap");
        let tokens = tokenize(src.as_bytes(), TabWidth::default(), &mut diag).unwrap();
        let mut ast = parse(&tokens, &mut diag).unwrap();
        let ok = check(&mut ast, &mut diag);
        (ast, ok)
    }

    #[test]
    fn integer_literal_checks_as_i64() {
        let (ast, ok) = check_source("var x = 1;");
        assert!(ok);
        let Stmt::Block { stmts, .. } = ast else {
            panic!("expected block")
        };
        let Stmt::Decl { value, .. } = &stmts[0] else {
            panic!("expected decl")
        };
        let Expr::Atomic { annotation, .. } = value else {
            panic!("expected atomic")
        };
        assert_eq!(annotation.as_ref().unwrap().kind, Kind::I64);
    }

    #[test]
    fn undefined_identifier_is_a_type_error() {
        let (_, ok) = check_source("var x = y;");
        assert!(!ok);
    }

    #[test]
    fn forward_reference_among_functions_is_allowed() {
        let (_, ok) = check_source(
            "fn even(n: i64): bool { return n == 0 ? true : odd(n - 1); } \
             fn odd(n: i64): bool { return n == 0 ? false : even(n - 1); }",
        );
        assert!(ok);
    }

    #[test]
    fn forward_reference_among_vars_is_rejected() {
        let (_, ok) = check_source("var x = y; var y = 1;");
        assert!(!ok);
    }

    #[test]
    fn integer_literal_expression_coerces_into_a_narrower_declared_type() {
        let (ast, ok) = check_source("var x: i32 = 1 + 2 * 3;");
        assert!(ok);
        let Stmt::Block { stmts, .. } = ast else {
            panic!("expected block")
        };
        let Stmt::Decl { value, .. } = &stmts[0] else {
            panic!("expected decl")
        };
        assert_eq!(value.annotation().unwrap().kind, Kind::I64);
    }

    #[test]
    fn plain_integer_literal_coerces_into_a_declared_type() {
        let (_, ok) = check_source("var x: i32 = 5;");
        assert!(ok);
    }

    #[test]
    fn omitted_return_spec_infers_from_the_body() {
        let (_, ok) = check_source("fn f() { return 1; } var x: i64 = f();");
        assert!(ok);
    }

    #[test]
    fn pointer_plus_integer_stays_a_pointer() {
        let (_, ok) = check_source("var x = 1; var p: i64* = &x; var q = p + 1;");
        assert!(ok);
    }

    #[test]
    fn pointer_minus_pointer_is_an_integer() {
        let (_, ok) = check_source("var x = 1; var p: i64* = &x; var q: i64* = &x; var d = p - q;");
        assert!(ok);
    }

    #[test]
    fn pointers_of_the_same_kind_are_relationally_comparable() {
        let (_, ok) = check_source("var x = 1; var p: i64* = &x; var q: i64* = &x; var b = p < q;");
        assert!(ok);
    }
}
