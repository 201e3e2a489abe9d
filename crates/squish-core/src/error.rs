//! Error types for the minifier core.
//!
//! Warnings never flow through these types; they go through the
//! [`Reporter`](crate::report::Reporter) sink and cannot alter output.
//! Everything here is fatal for the file being processed.

/// A fatal minification error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tokenizer reported one or more lexical errors. The individual
    /// messages have already been delivered through the reporter.
    #[error("{count} syntax error(s)")]
    Syntax { count: usize },

    /// A scope has more live names than the 1/2/3-character replacement
    /// pools can cover. There is no per-identifier fallback.
    #[error("ran out of replacement symbols while renaming")]
    SymbolPoolExhausted,

    /// A token kind with no printed form reached the emitter. Indicates a
    /// gap in the literal table, not a user error.
    #[error("token at offset {offset} has no printable form")]
    Unprintable { offset: usize },

    /// The token stream does not match the statement shape the walker
    /// expects at this point.
    #[error("unexpected token at offset {offset}: {found}")]
    UnexpectedToken { offset: usize, found: String },

    /// The token stream ended inside a construct.
    #[error("unexpected end of token stream")]
    UnexpectedEnd,

    /// A replay pass disagreed with the scope index built during the
    /// first pass. The passes must make identical traversal decisions,
    /// so this is an internal defect.
    #[error("walker desynchronized from the scope index at offset {offset}")]
    Desync { offset: usize },
}
