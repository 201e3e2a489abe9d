//! Core minification engine: scope analysis, identifier munging and
//! spacing-correct token emission for JavaScript.
//!
//! The pipeline over one file is strictly sequential:
//!
//! ```text
//! tokens -> normalize -> build pass -> check pass -> munge -> emit
//! ```
//!
//! Nothing here touches the filesystem or holds cross-file state; the
//! CLI runs one independent pipeline per file, in parallel.
//!
//! ```
//! use squish_core::{minify, CollectingReporter, Options};
//!
//! let options = Options { munge: true, ..Options::default() };
//! let mut reporter = CollectingReporter::new();
//! let out = minify("function f(a,b){return a+b;}", &options, &mut reporter).unwrap();
//! assert_eq!(out.code, "function f(c,d){return c+d};");
//! ```

mod emit;
mod error;
mod munge;
mod names;
mod normalize;
mod options;
mod report;
mod scope;
mod walker;

pub use error::Error;
pub use names::{is_reserved, is_valid_identifier};
pub use options::Options;
pub use report::{CollectingReporter, Reporter};
pub use scope::{Identifier, Scope, ScopeId, ScopeTree, GLOBAL_SCOPE};

/// The result of minifying one file.
#[derive(Debug, Clone)]
pub struct Output {
    pub code: String,
    /// The identifier mapping report, when [`Options::munge_map`] is set.
    pub munge_map: Option<String>,
}

/// Minify one JavaScript source file.
///
/// Warnings flow through `reporter` and never affect the output; a
/// returned [`Error`] is fatal for the file and callers must not write
/// any output for it.
pub fn minify(
    source: &str,
    options: &Options,
    reporter: &mut dyn Reporter,
) -> Result<Output, Error> {
    let mut tokens = match squish_syntax::tokenize(source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            for error in &errors {
                reporter.error(&error.to_string());
            }
            return Err(Error::Syntax {
                count: errors.len(),
            });
        }
    };

    normalize::normalize(&mut tokens, options);

    let mut tree = ScopeTree::new();
    walker::build(&tokens, &mut tree, options, reporter)?;
    // The check pass runs even when munging is off: it feeds the
    // refcounts behind the unused-symbol warning and costs one replay.
    walker::check(&tokens, &mut tree, options, reporter)?;

    if options.munge {
        munge::munge(&mut tree)?;
    }

    let code = emit::emit(&tokens, &tree, options, reporter)?;
    let munge_map = options.munge_map.then(|| tree.full_mapping());

    Ok(Output { code, munge_map })
}
