//! Reserved-word lookup, built at compile time.

use crate::token::TokenKind;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "var" => TokenKind::Var,
    "const" => TokenKind::Const,
    "fn" => TokenKind::Fn,
    "wire" => TokenKind::Wire,
    "part" => TokenKind::Part,
    "primitive" => TokenKind::Primitive,
    "struct" => TokenKind::Struct,
    "enum" => TokenKind::Enum,

    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "switch" => TokenKind::Switch,
    "case" => TokenKind::Case,
    "default" => TokenKind::Default,
    "while" => TokenKind::While,
    "do" => TokenKind::Do,
    "for" => TokenKind::For,

    "return" => TokenKind::Return,
    "break" => TokenKind::Break,
    "continue" => TokenKind::Continue,
    "type" => TokenKind::Type,

    "void" => TokenKind::Void,
    "bool" => TokenKind::Bool,
    "i8" => TokenKind::I8,
    "i16" => TokenKind::I16,
    "i32" => TokenKind::I32,
    "i64" => TokenKind::I64,
    "u8" => TokenKind::U8,
    "u16" => TokenKind::U16,
    "u32" => TokenKind::U32,
    "u64" => TokenKind::U64,
};

/// Look up a scanned identifier lexeme against the reserved-word table.
pub fn lookup(lexeme: &str) -> Option<TokenKind> {
    KEYWORDS.get(lexeme).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_declaration_keywords() {
        assert_eq!(lookup("var"), Some(TokenKind::Var));
        assert_eq!(lookup("struct"), Some(TokenKind::Struct));
    }

    #[test]
    fn reserved_but_unused_keywords_still_lex() {
        assert_eq!(lookup("wire"), Some(TokenKind::Wire));
        assert_eq!(lookup("part"), Some(TokenKind::Part));
        assert_eq!(lookup("primitive"), Some(TokenKind::Primitive));
    }

    #[test]
    fn non_keyword_is_absent() {
        assert_eq!(lookup("counter"), None);
    }
}
