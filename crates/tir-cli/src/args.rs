//! CLI arguments for `tir-check` (`SPEC_FULL.md`'s "Configuration" section).

use std::path::PathBuf;

use clap::Parser;

/// Lex and parse a `.tir` source file, reporting either a summary of the
/// parsed module or a human-readable diagnostic.
#[derive(Parser, Debug)]
#[command(name = "tir-check", version, about = "Parse a tir IR module and report diagnostics")]
pub struct CliArgs {
    /// Path to the `.tir` source file to parse.
    #[arg(long = "input", short = 'i')]
    pub input: PathBuf,

    /// Emit the parsed module summary as JSON instead of plain text.
    #[arg(long = "emit-json")]
    pub emit_json: bool,

    /// Increase logging verbosity (may be repeated: `-v`, `-vv`).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
