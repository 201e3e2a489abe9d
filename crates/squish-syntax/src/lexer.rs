//! Byte lexer for JavaScript (ES3/ES5 era plus `let`/`yield`).
//!
//! The lexer tracks just enough context to make the classifications the
//! minifier core relies on:
//!
//! - regex vs division (and, by the same token-position logic, unary
//!   `+`/`-` vs binary `+`/`-`);
//! - object-literal colons vs ternary/label/case colons, via a stack of
//!   brace frames;
//! - `get`/`set` accessor heads, which are re-encoded as `Get`/`Set`
//!   followed by a synthetic `Function` token so the downstream walker
//!   sees one uniform function-introduction shape;
//! - conditional (`/*@ ... @*/`) and preserved (`/*! ... */`) comments,
//!   which survive as tokens while every other comment is dropped;
//! - line terminators between tokens, so [`tokenize`] can perform
//!   automatic semicolon insertion (the downstream passes assume every
//!   statement is `;`-terminated).
//!
//! String payloads are only partially decoded: `\'` and `\"` become the
//! raw quote character, everything else is kept verbatim. Re-escaping is
//! the normalizer's job, which lets it pick the cheaper quote character.

use crate::token::{keyword_from_str, Token};

/// A lexical error with its position in the source.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Which kind of `{` a brace frame was opened by.
#[derive(Debug, Clone, Copy)]
struct Frame {
    object_literal: bool,
    /// Unmatched `?` operators inside this frame; colons pair with these
    /// before being classified as object-literal colons.
    open_hooks: u32,
}

/// The lexer state. `Clone` is derived to allow cheap speculative scans
/// (accessor detection).
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: u32,
    line_start: usize,
    /// True when the next `/` starts a regex (token position), which is
    /// also exactly when `+`/`-` are unary and `{` opens an object literal.
    at_operand_position: bool,
    /// The previously produced token, for brace classification.
    last: Option<Token>,
    frames: Vec<Frame>,
    /// Synthetic token queued behind the one just returned.
    pending: Option<Token>,
    /// Set on speculative clones to stop accessor lookahead from nesting.
    speculating: bool,
    /// A line terminator separated the token just returned from the one
    /// before it. Drives automatic semicolon insertion in [`tokenize`].
    newline_before: bool,
}

/// Tokenize a whole source file.
///
/// On failure every lexical error found before scanning stopped is
/// returned; callers treat a non-empty error list as fatal for the file.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    loop {
        match lexer.next_token() {
            Ok(Some(token)) => {
                if lexer.newline_before {
                    if let Some(prev) = tokens.last() {
                        if asi_semicolon(prev, &token) {
                            tokens.push(Token::Semi);
                        }
                    }
                }
                tokens.push(token);
            }
            Ok(None) => break,
            Err(err) => {
                let fatal = err.message.starts_with("unterminated");
                errors.push(err);
                if fatal {
                    break;
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Whether automatic semicolon insertion places a `;` between `prev` and
/// `next` when a line terminator separates them.
fn asi_semicolon(prev: &Token, next: &Token) -> bool {
    // Restricted productions: a line terminator after these always ends
    // the statement, whatever follows.
    if matches!(prev, Token::Return | Token::Break | Token::Continue) {
        return *next != Token::Semi;
    }
    can_end_statement(prev) && can_start_statement(next)
}

fn can_end_statement(token: &Token) -> bool {
    matches!(
        token,
        Token::Name(_)
            | Token::Str(_)
            | Token::Number(_)
            | Token::Regexp(_)
            | Token::RParen
            | Token::RBracket
            | Token::RBrace
            | Token::Inc
            | Token::Dec
            | Token::This
            | Token::Null
            | Token::True
            | Token::False
            | Token::Debugger
    )
}

/// A line-initial token that continues the previous expression (an infix
/// operator, a call/index opener, a closer, a clause keyword) suppresses
/// insertion, matching the language's "offending token" rule. `{` is
/// treated as a continuer too: it is almost always a body brace after
/// `)` (`if (x)\n{`), never a spot the language requires a `;`.
fn can_start_statement(token: &Token) -> bool {
    !matches!(
        token,
        Token::Dot
            | Token::Comma
            | Token::Semi
            | Token::Colon
            | Token::ObjectLit
            | Token::Hook
            | Token::LParen
            | Token::LBracket
            | Token::LBrace
            | Token::RParen
            | Token::RBracket
            | Token::RBrace
            | Token::Assign
            | Token::AssignAdd
            | Token::AssignSub
            | Token::AssignMul
            | Token::AssignDiv
            | Token::AssignMod
            | Token::AssignBitOr
            | Token::AssignBitXor
            | Token::AssignBitAnd
            | Token::AssignLsh
            | Token::AssignRsh
            | Token::AssignUrsh
            | Token::Or
            | Token::And
            | Token::BitOr
            | Token::BitXor
            | Token::BitAnd
            | Token::ShEq
            | Token::ShNe
            | Token::Eq
            | Token::Ne
            | Token::Le
            | Token::Lt
            | Token::Ge
            | Token::Gt
            | Token::Lsh
            | Token::Rsh
            | Token::Ursh
            | Token::Add
            | Token::Sub
            | Token::Mul
            | Token::Div
            | Token::Mod
            | Token::In
            | Token::Instanceof
            | Token::Else
            | Token::While
            | Token::Catch
            | Token::Finally
            | Token::Case
            | Token::Default
            | Token::CondComment(_)
            | Token::KeepComment(_)
    )
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            at_operand_position: true,
            last: None,
            frames: vec![Frame { object_literal: false, open_hooks: 0 }],
            pending: None,
            speculating: false,
            newline_before: false,
        }
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if let Some(token) = self.pending.take() {
            self.note(&token);
            self.newline_before = false;
            return Ok(Some(token));
        }

        self.newline_before = false;
        let token = loop {
            self.skip_whitespace();
            if self.is_eof() {
                return Ok(None);
            }
            // Line terminators inside the token itself (string
            // continuations, multi-line regex classes) do not count as
            // separating it from its predecessor.
            let separated = self.newline_before;
            match self.scan()? {
                Some(token) => {
                    self.newline_before = separated;
                    break token;
                }
                None => continue, // plain comment, skipped
            }
        };

        if matches!(token, Token::Get | Token::Set) {
            // Re-encode `get name(` as `get function name(`.
            self.pending = Some(Token::Function);
        }
        self.note(&token);
        Ok(Some(token))
    }

    fn scan(&mut self) -> Result<Option<Token>, LexError> {
        let ch = self.current();
        let token = match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => self.scan_word(),
            b'0'..=b'9' => self.scan_number(),
            b'"' | b'\'' => self.scan_string(ch)?,
            b'/' => return self.scan_slash(),
            b'.' => self.scan_dot(),
            b'(' => self.one(Token::LParen),
            b')' => self.one(Token::RParen),
            b'[' => self.one(Token::LBracket),
            b']' => self.one(Token::RBracket),
            b'{' => self.scan_lbrace(),
            b'}' => self.scan_rbrace(),
            b';' => self.one(Token::Semi),
            b',' => self.one(Token::Comma),
            b'?' => self.scan_hook(),
            b':' => self.scan_colon(),
            b'~' => self.one(Token::BitNot),
            b'=' => self.scan_eq(),
            b'!' => self.scan_bang(),
            b'<' => self.scan_lt(),
            b'>' => self.scan_gt(),
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.two_if(b'=', Token::AssignMul, Token::Mul),
            b'%' => self.two_if(b'=', Token::AssignMod, Token::Mod),
            b'&' => self.scan_amp(),
            b'|' => self.scan_pipe(),
            b'^' => self.two_if(b'=', Token::AssignBitXor, Token::BitXor),
            _ => {
                let err = self.error(format!("unexpected character '{}'", ch as char));
                self.advance();
                return Err(err);
            }
        };
        Ok(Some(token))
    }

    // === Position helpers ===

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current(&self) -> u8 {
        self.source[self.pos]
    }

    fn peek(&self, delta: usize) -> u8 {
        *self.source.get(self.pos + delta).unwrap_or(&0)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.pos;
        self.newline_before = true;
    }

    fn error(&self, message: String) -> LexError {
        LexError {
            message,
            line: self.line,
            column: (self.pos - self.line_start) as u32,
        }
    }

    fn one(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn two_if(&mut self, second: u8, matched: Token, single: Token) -> Token {
        self.advance();
        if !self.is_eof() && self.current() == second {
            self.advance();
            matched
        } else {
            single
        }
    }

    // === Whitespace and comments ===

    fn skip_whitespace(&mut self) {
        while !self.is_eof() {
            match self.current() {
                b' ' | b'\t' | b'\r' => self.advance(),
                b'\n' => {
                    self.advance();
                    self.newline();
                }
                _ => break,
            }
        }
    }

    /// `/`: comment, regex, division, or divide-assign.
    fn scan_slash(&mut self) -> Result<Option<Token>, LexError> {
        match self.peek(1) {
            b'/' => {
                while !self.is_eof() && self.current() != b'\n' {
                    self.advance();
                }
                Ok(None)
            }
            b'*' => self.scan_block_comment(),
            _ if self.at_operand_position => self.scan_regex().map(Some),
            b'=' => {
                self.advance();
                self.advance();
                Ok(Some(Token::AssignDiv))
            }
            _ => {
                self.advance();
                Ok(Some(Token::Div))
            }
        }
    }

    fn scan_block_comment(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.error(String::new());
        self.advance(); // /
        self.advance(); // *
        let mut body = String::new();
        loop {
            if self.is_eof() {
                return Err(LexError {
                    message: "unterminated comment".into(),
                    ..start
                });
            }
            let ch = self.current();
            if ch == b'*' && self.peek(1) == b'/' {
                self.advance();
                self.advance();
                break;
            }
            if ch == b'\n' {
                self.advance();
                self.newline();
            } else {
                self.advance();
            }
            body.push(ch as char);
        }
        // Conditional comments and /*! comments survive minification.
        if body.starts_with('@') {
            Ok(Some(Token::CondComment(body)))
        } else if let Some(kept) = body.strip_prefix('!') {
            Ok(Some(Token::KeepComment(kept.to_string())))
        } else {
            Ok(None)
        }
    }

    fn scan_regex(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let err_at = self.error(String::new());
        self.advance(); // /
        let mut in_class = false;
        loop {
            if self.is_eof() || self.current() == b'\n' {
                return Err(LexError {
                    message: "unterminated regular expression".into(),
                    ..err_at
                });
            }
            match self.current() {
                b'\\' => {
                    self.advance();
                    if !self.is_eof() {
                        self.advance();
                    }
                }
                b'[' => {
                    in_class = true;
                    self.advance();
                }
                b']' => {
                    in_class = false;
                    self.advance();
                }
                b'/' if !in_class => {
                    self.advance();
                    break;
                }
                _ => self.advance(),
            }
        }
        while !self.is_eof() && self.current().is_ascii_alphabetic() {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[start..self.pos])
            .unwrap_or_default()
            .to_string();
        Ok(Token::Regexp(text))
    }

    // === Literals ===

    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        while !self.is_eof()
            && matches!(self.current(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$')
        {
            self.advance();
        }
        let word = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();

        if (word == "get" || word == "set") && !self.speculating && self.is_accessor_head() {
            return if word == "get" { Token::Get } else { Token::Set };
        }
        keyword_from_str(word).unwrap_or_else(|| Token::Name(word.to_string()))
    }

    /// True when the word just scanned is followed by `name (`, i.e. an
    /// ES5 accessor in an object literal: `{get foo() {...}}`.
    fn is_accessor_head(&self) -> bool {
        let mut probe = self.clone();
        probe.speculating = true;
        probe.pending = None;
        let first = match probe.next_token() {
            Ok(Some(token)) => token,
            _ => return false,
        };
        if !matches!(first, Token::Name(_) | Token::Str(_) | Token::Number(_)) {
            return false;
        }
        matches!(probe.next_token(), Ok(Some(Token::LParen)))
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        if self.current() == b'0' && matches!(self.peek(1), b'x' | b'X') {
            self.advance();
            self.advance();
            while !self.is_eof() && self.current().is_ascii_hexdigit() {
                self.advance();
            }
        } else {
            while !self.is_eof() && self.current().is_ascii_digit() {
                self.advance();
            }
            // A trailing dot only belongs to the number when a digit follows,
            // so `42.toString` stays three tokens and the emitter can guard it.
            if !self.is_eof() && self.current() == b'.' && self.peek(1).is_ascii_digit() {
                self.advance();
                while !self.is_eof() && self.current().is_ascii_digit() {
                    self.advance();
                }
            }
            if !self.is_eof() && matches!(self.current(), b'e' | b'E') {
                let mut ahead = 1;
                if matches!(self.peek(1), b'+' | b'-') {
                    ahead = 2;
                }
                if self.peek(ahead).is_ascii_digit() {
                    self.pos += ahead;
                    while !self.is_eof() && self.current().is_ascii_digit() {
                        self.advance();
                    }
                }
            }
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
        Token::Number(text.to_string())
    }

    fn scan_string(&mut self, quote: u8) -> Result<Token, LexError> {
        let err_at = self.error(String::new());
        self.advance();
        let mut value = String::new();
        loop {
            if self.is_eof() {
                return Err(LexError {
                    message: "unterminated string literal".into(),
                    ..err_at
                });
            }
            let ch = self.current();
            match ch {
                b'\\' => {
                    let next = self.peek(1);
                    if next == b'\'' || next == b'"' {
                        // Decode quote escapes; the normalizer re-escapes
                        // whichever quote character it settles on.
                        value.push(next as char);
                    } else {
                        value.push('\\');
                        value.push(next as char);
                        if next == b'\n' {
                            self.advance();
                            self.newline();
                            self.advance();
                            continue;
                        }
                    }
                    self.advance();
                    self.advance();
                }
                b'\n' => {
                    return Err(LexError {
                        message: "unterminated string literal".into(),
                        ..err_at
                    });
                }
                _ if ch == quote => {
                    self.advance();
                    break;
                }
                _ => {
                    value.push(ch as char);
                    self.advance();
                }
            }
        }
        Ok(Token::Str(value))
    }

    // === Context-sensitive punctuation ===

    fn scan_dot(&mut self) -> Token {
        if self.peek(1).is_ascii_digit() {
            return self.scan_number_from_dot();
        }
        self.one(Token::Dot)
    }

    fn scan_number_from_dot(&mut self) -> Token {
        let start = self.pos;
        self.advance(); // .
        while !self.is_eof() && self.current().is_ascii_digit() {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
        Token::Number(text.to_string())
    }

    fn scan_lbrace(&mut self) -> Token {
        self.frames.push(Frame {
            object_literal: self.brace_opens_object_literal(),
            open_hooks: 0,
        });
        self.one(Token::LBrace)
    }

    fn scan_rbrace(&mut self) -> Token {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
        self.one(Token::RBrace)
    }

    fn scan_hook(&mut self) -> Token {
        if let Some(frame) = self.frames.last_mut() {
            frame.open_hooks += 1;
        }
        self.one(Token::Hook)
    }

    fn scan_colon(&mut self) -> Token {
        let frame = self.frames.last_mut().expect("frame stack never empty");
        if frame.open_hooks > 0 {
            frame.open_hooks -= 1;
            return self.one(Token::Colon);
        }
        if frame.object_literal {
            return self.one(Token::ObjectLit);
        }
        self.one(Token::Colon)
    }

    /// A `{` opens an object literal exactly when the previous token puts
    /// us in expression-operand position. Statement starts (after `;`,
    /// `}`, `)`, or at the top of the file) open blocks.
    fn brace_opens_object_literal(&self) -> bool {
        matches!(
            self.last,
            Some(
                Token::Assign
                    | Token::AssignAdd
                    | Token::AssignSub
                    | Token::AssignMul
                    | Token::AssignDiv
                    | Token::AssignMod
                    | Token::AssignBitOr
                    | Token::AssignBitXor
                    | Token::AssignBitAnd
                    | Token::AssignLsh
                    | Token::AssignRsh
                    | Token::AssignUrsh
                    | Token::LParen
                    | Token::LBracket
                    | Token::Comma
                    | Token::Colon
                    | Token::ObjectLit
                    | Token::Hook
                    | Token::Return
                    | Token::Throw
                    | Token::Case
                    | Token::In
                    | Token::New
                    | Token::Typeof
                    | Token::Void
                    | Token::Delete
                    | Token::Yield
                    | Token::Or
                    | Token::And
                    | Token::BitOr
                    | Token::BitXor
                    | Token::BitAnd
                    | Token::ShEq
                    | Token::ShNe
                    | Token::Eq
                    | Token::Ne
                    | Token::Le
                    | Token::Lt
                    | Token::Ge
                    | Token::Gt
                    | Token::Lsh
                    | Token::Rsh
                    | Token::Ursh
                    | Token::Not
                    | Token::BitNot
                    | Token::Pos
                    | Token::Neg
                    | Token::Add
                    | Token::Sub
                    | Token::Mul
                    | Token::Div
                    | Token::Mod
                    | Token::Instanceof
            )
        )
    }

    fn scan_eq(&mut self) -> Token {
        self.advance();
        if self.current_is(b'=') {
            self.advance();
            if self.current_is(b'=') {
                self.advance();
                Token::ShEq
            } else {
                Token::Eq
            }
        } else {
            Token::Assign
        }
    }

    fn scan_bang(&mut self) -> Token {
        self.advance();
        if self.current_is(b'=') {
            self.advance();
            if self.current_is(b'=') {
                self.advance();
                Token::ShNe
            } else {
                Token::Ne
            }
        } else {
            Token::Not
        }
    }

    fn scan_lt(&mut self) -> Token {
        self.advance();
        if self.current_is(b'<') {
            self.advance();
            if self.current_is(b'=') {
                self.advance();
                Token::AssignLsh
            } else {
                Token::Lsh
            }
        } else if self.current_is(b'=') {
            self.advance();
            Token::Le
        } else {
            Token::Lt
        }
    }

    fn scan_gt(&mut self) -> Token {
        self.advance();
        if self.current_is(b'>') {
            self.advance();
            if self.current_is(b'>') {
                self.advance();
                if self.current_is(b'=') {
                    self.advance();
                    Token::AssignUrsh
                } else {
                    Token::Ursh
                }
            } else if self.current_is(b'=') {
                self.advance();
                Token::AssignRsh
            } else {
                Token::Rsh
            }
        } else if self.current_is(b'=') {
            self.advance();
            Token::Ge
        } else {
            Token::Gt
        }
    }

    fn scan_plus(&mut self) -> Token {
        self.advance();
        if self.current_is(b'+') {
            self.advance();
            Token::Inc
        } else if self.current_is(b'=') {
            self.advance();
            Token::AssignAdd
        } else if self.at_operand_position {
            Token::Pos
        } else {
            Token::Add
        }
    }

    fn scan_minus(&mut self) -> Token {
        self.advance();
        if self.current_is(b'-') {
            self.advance();
            Token::Dec
        } else if self.current_is(b'=') {
            self.advance();
            Token::AssignSub
        } else if self.at_operand_position {
            Token::Neg
        } else {
            Token::Sub
        }
    }

    fn scan_amp(&mut self) -> Token {
        self.advance();
        if self.current_is(b'&') {
            self.advance();
            Token::And
        } else if self.current_is(b'=') {
            self.advance();
            Token::AssignBitAnd
        } else {
            Token::BitAnd
        }
    }

    fn scan_pipe(&mut self) -> Token {
        self.advance();
        if self.current_is(b'|') {
            self.advance();
            Token::Or
        } else if self.current_is(b'=') {
            self.advance();
            Token::AssignBitOr
        } else {
            Token::BitOr
        }
    }

    fn current_is(&self, ch: u8) -> bool {
        !self.is_eof() && self.current() == ch
    }

    /// Record the token just produced, updating the operand-position flag.
    fn note(&mut self, token: &Token) {
        self.at_operand_position = !matches!(
            token,
            Token::Name(_)
                | Token::Str(_)
                | Token::Number(_)
                | Token::Regexp(_)
                | Token::RParen
                | Token::RBracket
                | Token::Inc
                | Token::Dec
                | Token::This
                | Token::Null
                | Token::True
                | Token::False
        );
        self.last = Some(token.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        tokenize(source).expect("should tokenize")
    }

    #[test]
    fn test_simple_statement() {
        let tokens = lex("var x = 1;");
        assert_eq!(
            tokens,
            vec![
                Token::Var,
                Token::Name("x".into()),
                Token::Assign,
                Token::Number("1".into()),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_regex_vs_division() {
        let tokens = lex("a = b / c; a = /b/g;");
        assert!(tokens.contains(&Token::Div));
        assert!(tokens.contains(&Token::Regexp("/b/g".into())));
    }

    #[test]
    fn test_unary_vs_binary_plus() {
        let tokens = lex("x = a + +b;");
        assert!(tokens.contains(&Token::Add));
        assert!(tokens.contains(&Token::Pos));
    }

    #[test]
    fn test_object_literal_colon() {
        let tokens = lex("var o = {a: 1};");
        assert!(tokens.contains(&Token::ObjectLit));
        assert!(!tokens.contains(&Token::Colon));
    }

    #[test]
    fn test_ternary_colon_inside_object_literal() {
        let tokens = lex("var o = {a: x ? y : z};");
        let objlits = tokens.iter().filter(|t| **t == Token::ObjectLit).count();
        let colons = tokens.iter().filter(|t| **t == Token::Colon).count();
        assert_eq!(objlits, 1);
        assert_eq!(colons, 1);
    }

    #[test]
    fn test_label_colon_is_not_object_literal() {
        let tokens = lex("loop1: while (x) { break loop1; }");
        assert!(tokens.contains(&Token::Colon));
        assert!(!tokens.contains(&Token::ObjectLit));
    }

    #[test]
    fn test_string_quote_decoding() {
        let tokens = lex(r#"var s = 'it\'s';"#);
        assert!(tokens.contains(&Token::Str("it's".into())));
    }

    #[test]
    fn test_string_keeps_other_escapes() {
        let tokens = lex(r#"var s = "a\nb";"#);
        assert!(tokens.contains(&Token::Str("a\\nb".into())));
    }

    #[test]
    fn test_accessor_reencoding() {
        let tokens = lex("var o = {get foo() { return 1; }};");
        let get_at = tokens.iter().position(|t| *t == Token::Get).unwrap();
        assert_eq!(tokens[get_at + 1], Token::Function);
        assert_eq!(tokens[get_at + 2], Token::Name("foo".into()));
    }

    #[test]
    fn test_get_as_plain_name() {
        let tokens = lex("var get = 4; o.get(x);");
        assert!(!tokens.contains(&Token::Get));
        assert!(tokens.contains(&Token::Name("get".into())));
    }

    #[test]
    fn test_conditional_comment_token() {
        let tokens = lex("/*@cc_on f(); @*/");
        assert!(matches!(&tokens[0], Token::CondComment(body) if body.starts_with("@cc_on")));
    }

    #[test]
    fn test_keep_comment_strips_bang() {
        let tokens = lex("/*! license */ var x;");
        assert_eq!(tokens[0], Token::KeepComment(" license ".into()));
    }

    #[test]
    fn test_plain_comments_dropped() {
        let tokens = lex("// line\n/* block */ var x;");
        assert_eq!(tokens[0], Token::Var);
    }

    #[test]
    fn test_number_dot_method() {
        let tokens = lex("42.toString()");
        assert_eq!(tokens[0], Token::Number("42".into()));
        assert_eq!(tokens[1], Token::Dot);
    }

    #[test]
    fn test_number_forms() {
        let tokens = lex("x = 0xff + 1.5 + .5 + 1e3;");
        assert!(tokens.contains(&Token::Number("0xff".into())));
        assert!(tokens.contains(&Token::Number("1.5".into())));
        assert!(tokens.contains(&Token::Number(".5".into())));
        assert!(tokens.contains(&Token::Number("1e3".into())));
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let errors = tokenize("var s = 'oops").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unterminated"));
    }

    #[test]
    fn test_stray_character_recovers() {
        let errors = tokenize("var x = 1; # var y = 2;").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unexpected character"));
    }

    #[test]
    fn test_shift_operators() {
        let tokens = lex("a >>> b >>= c >>>= d;");
        assert!(tokens.contains(&Token::Ursh));
        assert!(tokens.contains(&Token::AssignRsh));
        assert!(tokens.contains(&Token::AssignUrsh));
    }

    #[test]
    fn test_block_brace_after_paren_is_not_object_literal() {
        // `{` after `)` is a body; the colon inside belongs to the label.
        let tokens = lex("if (x) { lbl: y = {a: 1}; }");
        let objlits = tokens.iter().filter(|t| **t == Token::ObjectLit).count();
        assert_eq!(objlits, 1);
        assert!(tokens.contains(&Token::Colon));
    }

    #[test]
    fn test_asi_between_statements() {
        let tokens = lex("x = 1\ny = 2");
        assert_eq!(
            tokens,
            vec![
                Token::Name("x".into()),
                Token::Assign,
                Token::Number("1".into()),
                Token::Semi,
                Token::Name("y".into()),
                Token::Assign,
                Token::Number("2".into()),
            ]
        );
    }

    #[test]
    fn test_asi_after_return() {
        // `return` is a restricted production; a line terminator ends it
        // regardless of what follows.
        let tokens = lex("function f(){return\nx}");
        let ret = tokens.iter().position(|t| *t == Token::Return).unwrap();
        assert_eq!(tokens[ret + 1], Token::Semi);
    }

    #[test]
    fn test_no_asi_when_expression_continues() {
        let tokens = lex("x = a\n+ b;");
        assert_eq!(tokens.iter().filter(|t| **t == Token::Semi).count(), 1);

        // A line-initial `(` is a call of the previous expression.
        let tokens = lex("a = b\n(c)");
        assert!(!tokens.contains(&Token::Semi));
    }

    #[test]
    fn test_no_asi_before_body_brace() {
        let tokens = lex("if (x)\n{ y = 1; }");
        assert_eq!(tokens.iter().filter(|t| **t == Token::Semi).count(), 1);

        let tokens = lex("function f()\n{ return 1; }");
        assert_eq!(tokens.iter().filter(|t| **t == Token::Semi).count(), 1);
    }

    #[test]
    fn test_asi_before_increment() {
        // `++` may not have a line terminator before its operand, so the
        // break ends the previous statement.
        let tokens = lex("x\n++y");
        assert_eq!(
            tokens,
            vec![
                Token::Name("x".into()),
                Token::Semi,
                Token::Inc,
                Token::Name("y".into()),
            ]
        );
    }
}
