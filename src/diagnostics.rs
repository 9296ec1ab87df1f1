//! Explicit diagnostics sink threaded through the lexer, parser, and checker.
//!
//! The reference implementation keeps `error_filename`, `error_suppress`, and
//! `error_indicator` as process-wide globals (see `printerr.c`/`printerr.h`). That
//! design doesn't survive translation: a global forecloses running two compilations
//! in the same process and makes the suppression/indicator interaction implicit.
//! `Diagnostics` makes the same three pieces of state an explicit, `&mut`-threaded
//! collaborator instead.

use crate::error_handling::{LexError, ParseError, SyntaxError, TypeError};
use crate::newtypes::Position;

/// Central sink for syntax/lex/type/io errors, with suppression for speculative
/// parsing and a sticky "did anything go wrong" indicator.
pub struct Diagnostics {
    filename: String,
    suppress_depth: u32,
    indicator: bool,
    /// The first unsuppressed error recorded, kept so a crate entry point with no
    /// `Diagnostics` of its own to inspect can still return a typed [`ParseError`].
    first_error: Option<ParseError>,
}

impl Diagnostics {
    pub fn new(filename: impl Into<String>) -> Self {
        Diagnostics {
            filename: filename.into(),
            suppress_depth: 0,
            indicator: false,
            first_error: None,
        }
    }

    /// Take the first unsuppressed error recorded since construction, if any.
    pub fn take_error(&mut self) -> Option<ParseError> {
        self.first_error.take()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Whether any error has fired since construction (including syntax errors
    /// suppressed while speculating, per the source's indicator semantics).
    pub fn had_error(&self) -> bool {
        self.indicator
    }

    /// True while a speculative parse is in progress.
    pub fn is_suppressed(&self) -> bool {
        self.suppress_depth > 0
    }

    /// Enter a speculative-parse region. Syntax errors raised while the returned
    /// guard is alive are recorded but not printed. Must be released by dropping the
    /// guard (or calling [`SuppressGuard::release`]) before a sibling region opens;
    /// nesting is strictly balanced, matching the source's save/restore discipline.
    pub fn suppress(&mut self) -> SuppressGuard<'_> {
        self.suppress_depth += 1;
        SuppressGuard { diag: self }
    }

    /// Record a syntax error. Printed to stderr unless currently suppressed.
    pub fn syntax_error(&mut self, err: SyntaxError) {
        if self.suppress_depth == 0 {
            eprintln!("{}:{}: syntax error: {}", self.filename, err.pos(), err);
            self.indicator = true;
            self.first_error.get_or_insert_with(|| err.into());
        }
        // A suppressed syntax error does not set the sticky indicator: the parser
        // may still recover by trying an alternative, and the caller of `suppress`
        // decides whether the overall attempt failed.
    }

    /// Record a lex error. Always printed; lexing does not participate in
    /// suppression.
    pub fn lex_error(&mut self, err: LexError) {
        eprintln!("{}:{}: syntax error: {}", self.filename, err.pos(), err);
        self.indicator = true;
        self.first_error.get_or_insert_with(|| err.into());
    }

    /// Record a type error. Never suppressed.
    pub fn type_error(&mut self, err: TypeError) {
        eprintln!("{}:{}: type error: {}", self.filename, err.pos(), err);
        self.indicator = true;
        self.first_error.get_or_insert_with(|| err.into());
    }

    /// Record an allocation failure. Never suppressed; always sets the indicator so
    /// an in-progress speculative parse does not retry.
    pub fn malloc_error(&mut self) {
        eprintln!("error: memory allocation failed");
        self.indicator = true;
    }

    /// Record a file-read failure.
    pub fn fread_error(&mut self, path: &str) {
        eprintln!("{}: error: cannot read file", path);
        self.indicator = true;
    }

    /// Anchor a syntax error at an explicit position rather than the filename alone;
    /// convenience used throughout the parser.
    pub fn unexpected_token(&mut self, pos: Position, found: impl Into<String>) {
        self.syntax_error(SyntaxError::UnexpectedToken {
            pos,
            found: found.into(),
        });
    }
}

/// RAII guard returned by [`Diagnostics::suppress`]. Decrements the suppression
/// depth on drop, so early returns (via `?`) unwind suppression correctly.
pub struct SuppressGuard<'a> {
    diag: &'a mut Diagnostics,
}

impl SuppressGuard<'_> {
    /// Whether any (suppressed) syntax error fired during this region.
    pub fn had_error(&self) -> bool {
        self.diag.indicator
    }
}

impl Drop for SuppressGuard<'_> {
    fn drop(&mut self) {
        self.diag.suppress_depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_syntax_error_does_not_set_indicator() {
        let mut diag = Diagnostics::new("test.scrap");
        {
            let _guard = diag.suppress();
            diag.unexpected_token(Position::start(), "+");
        }
        assert!(!diag.had_error());
    }

    #[test]
    fn unsuppressed_syntax_error_sets_indicator() {
        let mut diag = Diagnostics::new("test.scrap");
        diag.unexpected_token(Position::start(), "+");
        assert!(diag.had_error());
    }

    #[test]
    fn nested_suppression_restores_depth() {
        let mut diag = Diagnostics::new("test.scrap");
        {
            let _outer = diag.suppress();
            {
                let _inner = diag.suppress();
            }
            assert!(diag.is_suppressed());
        }
        assert!(!diag.is_suppressed());
    }

    #[test]
    fn malloc_error_always_sets_indicator() {
        let mut diag = Diagnostics::new("test.scrap");
        let _guard = diag.suppress();
        diag.malloc_error();
        assert!(diag.had_error());
    }
}
