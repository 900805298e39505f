//! `tir-check`: a thin binary that lexes and parses a `.tir` source file and
//! reports either a summary of the parsed module or a diagnostic.
//!
//! File I/O, argument parsing, and logging all live here, never in
//! `tir-parser` (spec §1: "CLI plumbing, file I/O, logging" are explicitly
//! out of the parser core's scope).

mod args;
mod report;

use anyhow::Context;
use clap::Parser as _;

use args::CliArgs;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading '{}'", args.input.display()))?;

    let result = tracing::info_span!("parse", file = %args.input.display()).in_scope(|| {
        let tokens = tir_scanner::tokenize(&source);
        match tokens {
            Ok(tokens) => {
                tracing::debug!(count = tokens.len(), "lexed token stream");
                tir_parser::Parser::from_tokens(&tokens)
                    .parse_module()
                    .map_err(report::Failure::Parse)
            }
            Err(e) => Err(report::Failure::Lex(e)),
        }
    });

    match result {
        Ok(module) => {
            report::print_summary(&module, args.emit_json);
            Ok(())
        }
        Err(failure) => {
            report::print_diagnostic(&failure, &source, &args.input);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "tir_cli=info,tir_parser=warn,tir_scanner=warn",
        1 => "tir_cli=debug,tir_parser=debug,tir_scanner=info",
        _ => "tir_cli=trace,tir_parser=trace,tir_scanner=trace",
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_target(false)
        .init();
}
