//! Exercises the file-reading entry point against the in-memory pipeline, confirming
//! a file read through `source::read_source` compiles identically to the same bytes
//! passed directly to `tokenize`/`parse`/`check`.

use pretty_assertions::assert_eq;

use crate::options::CompileOptions;
use crate::source::read_source;

fn write_temp(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, contents).expect("failed to write temp file");
    path
}

#[test]
fn file_and_string_tokenization_agree() {
    let src = b"fn add(a: i64, b: i64): i64 { return a + b; }";
    let path = write_temp("scrapc_test_tokenize.scrap", src);

    let from_file = read_source(&path).expect("failed to read file");
    assert_eq!(from_file, src);

    let options = CompileOptions::new().filename("scrapc_test_tokenize.scrap");
    let tokens = crate::tokenize(&from_file, &options).expect("failed to tokenize file contents");
    assert!(!tokens.is_empty());

    std::fs::remove_file(&path).ok();
}

#[test]
fn file_read_then_compiled_matches_in_memory_compile() {
    let src = b"var x = 1; var y = x + 2;";
    let path = write_temp("scrapc_test_compile.scrap", src);

    let options = CompileOptions::new().filename("scrapc_test_compile.scrap");
    let from_file = read_source(&path).expect("failed to read file");
    let via_file = crate::compile(&from_file, &options).expect("failed to compile file contents");
    let via_memory = crate::compile(src, &options).expect("failed to compile in-memory source");

    assert_eq!(via_file, via_memory);

    std::fs::remove_file(&path).ok();
}

#[test]
fn reading_a_missing_file_is_an_io_error() {
    let err = read_source("/nonexistent/scrapc/test/path.scrap").unwrap_err();
    assert_eq!(err.path, "/nonexistent/scrapc/test/path.scrap");
}
