//! Benchmarks for the lexer over representative `scrap` programs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scrapc::options::CompileOptions;

const ARITHMETIC: &str = "var x = 1 + 2 * (3 - 4) / 5 % 6 << 1 >> 2 & 3 | 4 ^ 5;";

const FUNCTION_HEAVY: &str = "\
fn fib(n: i64): i64 {
    return n < 2 ? n : fib(n - 1) + fib(n - 2);
}
fn apply(f: (i64) => i64, x: i64): i64 {
    return f(x);
}
";

const STRUCT_AND_ENUM: &str = "\
struct Point { x: i64, y: i64 };
enum Color { Red, Green, Blue };
var p = Point { 1, 2 };
var c = Red;
";

fn bench_tokenize_arithmetic(c: &mut Criterion) {
    let options = CompileOptions::new().filename("bench.scrap");
    c.bench_function("tokenize_arithmetic", |b| {
        b.iter(|| {
            black_box(scrapc::tokenize(black_box(ARITHMETIC.as_bytes()), &options).unwrap());
        })
    });
}

fn bench_tokenize_functions(c: &mut Criterion) {
    let options = CompileOptions::new().filename("bench.scrap");
    c.bench_function("tokenize_function_heavy", |b| {
        b.iter(|| {
            black_box(scrapc::tokenize(black_box(FUNCTION_HEAVY.as_bytes()), &options).unwrap());
        })
    });
}

fn bench_tokenize_struct_enum(c: &mut Criterion) {
    let options = CompileOptions::new().filename("bench.scrap");
    c.bench_function("tokenize_struct_and_enum", |b| {
        b.iter(|| {
            black_box(scrapc::tokenize(black_box(STRUCT_AND_ENUM.as_bytes()), &options).unwrap());
        })
    });
}

fn bench_tokenize_repeated_operators(c: &mut Criterion) {
    let mut src = String::new();
    for i in 0..200 {
        if i > 0 {
            src.push_str(" + ");
        }
        src.push_str(&format!("x{i}"));
    }
    src.push(';');

    let options = CompileOptions::new().filename("bench.scrap");
    c.bench_function("tokenize_long_operator_chain", |b| {
        b.iter(|| {
            black_box(scrapc::tokenize(black_box(src.as_bytes()), &options).unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_tokenize_arithmetic,
    bench_tokenize_functions,
    bench_tokenize_struct_enum,
    bench_tokenize_repeated_operators
);
criterion_main!(benches);
