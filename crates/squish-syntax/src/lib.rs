//! squish-syntax: JavaScript tokenizer for the minifier
//!
//! Produces a flat token stream, not an AST. The minifier only needs
//! enough structure to track function scopes and identifier positions,
//! so the heavy lifting happens here in the lexer:
//!
//! 1. **Context-sensitive scanning**
//!    - regex vs division, unary vs binary `+`/`-`, object-literal
//!      braces vs blocks, all decided from the previous token
//! 2. **Token normalization**
//!    - `get`/`set` accessor heads re-encoded with a synthetic
//!      `function` token so downstream passes see one function shape
//! 3. **Comment policy**
//!    - comments are dropped during scanning except `/*!` (kept) and
//!      `/*@` (kept and marks IE conditional compilation)
//!
//! # Example
//!
//! ```
//! use squish_syntax::{tokenize, Token};
//!
//! let tokens = tokenize("var x = 1;").unwrap();
//! assert_eq!(tokens[0], Token::Var);
//! assert_eq!(tokens[1], Token::Name("x".into()));
//! ```

mod lexer;
mod token;

pub use lexer::{tokenize, LexError, Lexer};
pub use token::Token;
