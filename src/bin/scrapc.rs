//! Command-line front-end: reads a `scrap` source file and runs it through the
//! lex/parse/check pipeline, stopping early if `--stop-after` asks for it.
//!
//! Grounded on `main.c`'s read-then-tokenize shape, extended with the `--tab-width`
//! and `--stop-after` flags SPEC_FULL.md's external-interfaces section adds.

use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};

use scrapc::newtypes::TabWidth;
use scrapc::options::{CompileOptions, Stage as LibStage};

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Stage {
    Lex,
    Parse,
    Check,
}

impl From<Stage> for LibStage {
    fn from(stage: Stage) -> LibStage {
        match stage {
            Stage::Lex => LibStage::Lex,
            Stage::Parse => LibStage::Parse,
            Stage::Check => LibStage::Check,
        }
    }
}

#[derive(ClapParser)]
#[command(name = "scrapc", about = "Lexer, parser, and type checker for the scrap language")]
struct Cli {
    /// Source file to compile.
    source: String,

    /// Number of columns a tab advances to the next stop.
    #[arg(long, default_value_t = 8)]
    tab_width: u32,

    /// Stop after this stage and print its result instead of running the full pipeline.
    #[arg(long, value_enum)]
    stop_after: Option<Stage>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(tab_width) = TabWidth::new(cli.tab_width) else {
        eprintln!("error: --tab-width must be nonzero");
        return ExitCode::FAILURE;
    };

    let src = match scrapc::source::read_source(&cli.source) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("{}: error: cannot read file", err.path);
            return ExitCode::FAILURE;
        }
    };

    let mut options = CompileOptions::new().tab_width(tab_width).filename(cli.source.clone());
    if let Some(stage) = cli.stop_after {
        options = options.stop_after(stage.into());
    }

    // Each stage's own error has already been printed by the `Diagnostics` sink
    // threaded inside `tokenize`/`parse`/`check`; nothing left to print here but the
    // exit code.
    let tokens = match scrapc::tokenize(&src, &options) {
        Ok(tokens) => tokens,
        Err(_) => return ExitCode::FAILURE,
    };
    if cli.stop_after == Some(Stage::Lex) {
        for token in &tokens {
            println!("{:?}\t{}\t{}", token.kind, token.lexeme, token.pos);
        }
        return ExitCode::SUCCESS;
    }

    let mut ast = match scrapc::parse(&tokens, &options) {
        Ok(ast) => ast,
        Err(_) => return ExitCode::FAILURE,
    };
    if cli.stop_after == Some(Stage::Parse) {
        println!("{ast:#?}");
        return ExitCode::SUCCESS;
    }

    if scrapc::check(&mut ast, &options).is_err() {
        return ExitCode::FAILURE;
    }
    if cli.stop_after == Some(Stage::Check) {
        println!("{ast:#?}");
    }

    ExitCode::SUCCESS
}
