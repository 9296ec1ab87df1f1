//! Reads a source file into bytes for the lexer.
//!
//! Grounded on `readfile.c`: a whole-file read with no encoding assumption — the
//! lexer treats the contents as 8-bit bytes, not necessarily valid UTF-8. The source's
//! `fopen`/`fseek`/`fread` dance exists only to preallocate a correctly-sized buffer in
//! C; `std::fs::read` already does that.

use std::path::Path;

use crate::error_handling::IoError;

/// Read `path` into a byte buffer. Returns a typed [`IoError`] (rather than the
/// source's `path: error: cannot read file` printed directly to stderr) so the caller
/// decides how and whether to report it.
pub fn read_source(path: impl AsRef<Path>) -> Result<Vec<u8>, IoError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| IoError {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_file_contents_verbatim() {
        let dir = std::env::temp_dir();
        let path = dir.join("scrapc_source_read_test.scrap");
        std::fs::write(&path, b"var x = 1;\n").unwrap();
        let bytes = read_source(&path).unwrap();
        assert_eq!(bytes, b"var x = 1;\n");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_source("/nonexistent/path/for/scrapc/tests.scrap").unwrap_err();
        assert_eq!(err.path, "/nonexistent/path/for/scrapc/tests.scrap");
    }
}
