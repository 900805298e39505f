//! Summary and diagnostic rendering for `tir-check` (spec §7's "carries a
//! source range" plus the diagnostic-rendering supplement in
//! `SPEC_FULL.md`). None of this lives in `tir-parser`: the parser core
//! returns a `ParseError`/`Module` and leaves presentation to the caller.

use std::path::Path;

use serde::Serialize;
use tir_common::position::LineMap;
use tir_parser::ast::Module;
use tir_parser::ParseError;
use tir_scanner::LexError;

/// Either stage of the pipeline can fail; the CLI renders both the same way.
pub enum Failure {
    Lex(LexError),
    Parse(ParseError),
}

impl Failure {
    fn span(&self) -> tir_common::Span {
        match self {
            Failure::Lex(e) => e.span,
            Failure::Parse(e) => e.span(),
        }
    }

    fn message(&self) -> String {
        match self {
            Failure::Lex(e) => e.message.clone(),
            Failure::Parse(e) => e.to_string(),
        }
    }
}

#[derive(Serialize)]
struct Summary {
    module: String,
    stage: &'static str,
    type_aliases: usize,
    records: usize,
    functions: Vec<FunctionSummary>,
}

#[derive(Serialize)]
struct FunctionSummary {
    name: String,
    is_definition: bool,
    attributes: usize,
    basic_blocks: usize,
}

fn summarize(module: &Module) -> Summary {
    Summary {
        module: module.name.clone(),
        stage: match module.stage {
            tir_parser::ast::Stage::Raw => "raw",
            tir_parser::ast::Stage::Canonical => "canonical",
        },
        type_aliases: module.type_aliases.len(),
        records: module.records.len(),
        functions: module
            .functions
            .iter()
            .map(|f| FunctionSummary {
                name: f.name.clone(),
                is_definition: f.is_definition(),
                attributes: f.attributes.len(),
                basic_blocks: f.basic_blocks.len(),
            })
            .collect(),
    }
}

pub fn print_summary(module: &Module, emit_json: bool) {
    let summary = summarize(module);
    if emit_json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("failed to serialize summary: {e}"),
        }
        return;
    }

    println!("module \"{}\" (stage {})", summary.module, summary.stage);
    println!("  {} type alias(es), {} record(s)", summary.type_aliases, summary.records);
    for f in &summary.functions {
        let kind = if f.is_definition { "definition" } else { "declaration" };
        println!(
            "  func @{} [{kind}]: {} attribute(s), {} basic block(s)",
            f.name, f.attributes, f.basic_blocks
        );
    }
}

pub fn print_diagnostic(failure: &Failure, source: &str, path: &Path) {
    let line_map = LineMap::build(source);
    let range = line_map.span_to_range(failure.span());
    let line_index = (range.start.line - 1) as usize;
    let snippet = line_map.line_text(source, line_index);

    eprintln!(
        "error: {}\n  --> {}:{}:{}",
        failure.message(),
        path.display(),
        range.start.line,
        range.start.column
    );
    eprintln!("   |");
    eprintln!("{:>3}| {snippet}", range.start.line);
    let caret_column = range.start.column.saturating_sub(1) as usize;
    eprintln!("   | {}^", " ".repeat(caret_column));
}
