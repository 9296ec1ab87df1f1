//! Identifier interning.
//!
//! Identifiers recur constantly across a program (a variable used ten times, a
//! struct's member names checked against every constructor call) and the original
//! source compares them with `strcmp` on every lookup. Interning turns that into an
//! integer compare and gives the symbol table and AST a `Copy` key instead of an
//! owned byte buffer per occurrence.

use once_cell::sync::Lazy;
use std::sync::RwLock;
use string_interner::{DefaultBackend, StringInterner};

pub type Symbol = string_interner::DefaultSymbol;
type Backend = StringInterner<DefaultBackend>;

/// Global interner shared by every compilation in the process. Keywords never reach
/// here (the lexer recognizes them from a static table); only identifier and
/// string-literal bytes are interned.
static GLOBAL: Lazy<RwLock<Backend>> = Lazy::new(|| RwLock::new(Backend::new()));

/// Intern a byte string, decoded as Latin-1 (scrap source is 8-bit bytes, not
/// necessarily UTF-8; interning the escaped bytes one-to-one as `char`s round-trips
/// losslessly since every byte 0..=255 maps to a distinct Unicode scalar value).
pub fn intern(bytes: &[u8]) -> Symbol {
    let s = latin1_to_string(bytes);
    if let Ok(interner) = GLOBAL.read() {
        if let Some(sym) = interner.get(&s) {
            return sym;
        }
    }
    GLOBAL.write().unwrap().get_or_intern(s)
}

/// Resolve an interned symbol back to its original bytes.
pub fn resolve(sym: Symbol) -> Vec<u8> {
    let s = GLOBAL
        .read()
        .unwrap()
        .resolve(sym)
        .expect("symbol from a different interner")
        .to_string();
    string_to_latin1(&s)
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn string_to_latin1(s: &str) -> Vec<u8> {
    s.chars().map(|c| c as u32 as u8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_identifier_bytes() {
        let sym = intern(b"counter");
        assert_eq!(resolve(sym), b"counter");
    }

    #[test]
    fn same_bytes_intern_to_same_symbol() {
        assert_eq!(intern(b"x"), intern(b"x"));
    }
}
