//! Warning and error sink.
//!
//! The core never logs; it reports through this trait and the caller
//! decides what to do with each message (print, trace, collect, drop).

/// Receives diagnostics from the minification pipeline.
///
/// Warnings are observational and never change output. Errors delivered
/// here accompany a fatal [`Error`](crate::error::Error) return; the sink
/// sees the per-site detail (e.g. individual lexical errors with their
/// positions) while the returned error carries the summary.
pub trait Reporter {
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// A reporter that accumulates messages, for tests and for building
/// machine-readable summaries.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for CollectingReporter {
    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
