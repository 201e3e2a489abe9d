//! Minification options.

/// Configuration consumed by the core pipeline.
///
/// All flags default to off; a default `Options` re-emits the program
/// with whitespace stripped and local rewrites applied, without renaming
/// anything.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Rename local identifiers to the shortest safe names.
    pub munge: bool,
    /// Forward structural warnings to the reporter. Off by default
    /// because most of them (redeclarations, eval usage, unused symbols)
    /// are noise for build pipelines.
    pub verbose: bool,
    /// Keep every semicolon instead of eliding the ones a re-parse does
    /// not need.
    pub preserve_all_semicolons: bool,
    /// Skip the string folding, bracket-to-dot and object-key rewrites.
    /// Quote re-selection still runs; it is serialization, not an
    /// optimization.
    pub disable_optimizations: bool,
    /// Pass hint directive statements through to the output instead of
    /// dropping them.
    pub preserve_unknown_hints: bool,
    /// Force a newline after the first semicolon past this output column.
    pub line_break_column: Option<usize>,
    /// Produce the identifier mapping report alongside the code.
    pub munge_map: bool,
}
