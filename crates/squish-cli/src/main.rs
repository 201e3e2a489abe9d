#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]

mod logging;
mod minify;

use clap::Parser;
use miette::Result;
use squish_core::Options;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "squish")]
#[command(author, version, about = "A JavaScript minifier and identifier munger", long_about = None)]
struct Cli {
    /// Input file, or directory scanned recursively for .js files
    input: PathBuf,

    /// Output file or directory (defaults to stdout for a single input file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Rename local symbols to the shortest safe names
    #[arg(short, long)]
    munge: bool,

    /// Increase logging verbosity and enable structural warnings
    /// (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit a JSON summary to stdout (stable, machine-readable)
    #[arg(long)]
    json: bool,

    /// Break the output line at the next semicolon past COLUMN characters
    #[arg(long, value_name = "COLUMN")]
    line_break: Option<usize>,

    /// Keep all semicolons, including the ones a re-parse does not need
    #[arg(long)]
    preserve_semi: bool,

    /// Skip micro optimizations (string folding, bracket-to-dot rewrites)
    #[arg(long)]
    disable_optimizations: bool,

    /// Keep unrecognized hint strings in the output
    #[arg(long)]
    preserve_unknown_hints: bool,

    /// Rewrite each output name by substring: FROM:TO (e.g. ".js:-min.js")
    #[arg(short, long, value_name = "FROM:TO")]
    pattern: Option<String>,

    /// Tag each output name with an abbreviated content digest
    #[arg(long)]
    digest: bool,

    /// Write an identifier mapping report next to each output file
    #[arg(long)]
    munge_map: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries exactly one thing per run: minified code, or the
    // --json summary object. Flags that need both require a file target.
    if cli.json && cli.output.is_none() {
        eprintln!("error: --json requires --output");
        eprintln!("hint: --json reserves stdout for the summary; give the code a file target");
        std::process::exit(2);
    }
    if cli.munge_map && cli.output.is_none() {
        eprintln!("error: --munge-map requires --output");
        std::process::exit(2);
    }

    let pattern = match &cli.pattern {
        Some(raw) => match minify::parse_pattern(raw) {
            Some(pair) => Some(pair),
            None => {
                eprintln!("error: invalid pattern '{raw}'. Use FROM:TO, e.g. \".js:-min.js\"");
                std::process::exit(2);
            }
        },
        None => None,
    };

    logging::init(cli.verbose, cli.json);

    let options = Options {
        munge: cli.munge,
        verbose: cli.verbose > 0,
        preserve_all_semicolons: cli.preserve_semi,
        disable_optimizations: cli.disable_optimizations,
        preserve_unknown_hints: cli.preserve_unknown_hints,
        line_break_column: cli.line_break,
        munge_map: cli.munge_map,
    };

    let request = minify::Request {
        input: cli.input,
        output: cli.output,
        options,
        pattern,
        digest: cli.digest,
        json: cli.json,
    };

    minify::run(&request)
}
