//! Token emission: one final replay over the stream, producing output
//! text with the spacing, elision and parenthesization rules that keep
//! the result re-parseable.
//!
//! The scope stack is rebuilt here against the same offset-keyed index
//! the analysis passes used, so every `Name` token resolves to the same
//! identifier it resolved to during the check pass.

use squish_syntax::Token;

use crate::error::Error;
use crate::options::Options;
use crate::report::Reporter;
use crate::scope::{ScopeId, ScopeTree, GLOBAL_SCOPE};
use crate::walker::context_snippet;

pub(crate) fn emit(
    tokens: &[Token],
    tree: &ScopeTree,
    options: &Options,
    reporter: &mut dyn Reporter,
) -> Result<String, Error> {
    Emitter {
        tokens,
        tree,
        options,
        reporter,
        offset: 0,
        brace_nesting: 0,
        stack: vec![GLOBAL_SCOPE],
        out: String::new(),
        line_start: 0,
        last_accessor: false,
    }
    .run()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

struct Emitter<'a> {
    tokens: &'a [Token],
    tree: &'a ScopeTree,
    options: &'a Options,
    reporter: &'a mut dyn Reporter,
    offset: usize,
    brace_nesting: i32,
    stack: Vec<ScopeId>,
    out: String,
    line_start: usize,
    /// True right after a `get `/`set ` head; suppresses the following
    /// synthetic `function` keyword.
    last_accessor: bool,
}

impl Emitter<'_> {
    fn run(mut self) -> Result<String, Error> {
        while self.offset < self.tokens.len() {
            let token = self.tokens[self.offset].clone();
            self.offset += 1;
            self.emit_token(token)?;
        }

        // A trailing semicolon keeps concatenation with other minified
        // units syntactically safe.
        if !self.options.preserve_all_semicolons
            && !self.out.is_empty()
            && !matches!(
                self.tokens.last(),
                Some(Token::CondComment(_) | Token::KeepComment(_))
            )
        {
            if self.out.ends_with('\n') {
                self.out.pop();
            }
            self.out.push(';');
        }

        Ok(self.out)
    }

    fn emit_token(&mut self, token: Token) -> Result<(), Error> {
        let scope = self.current_scope();
        match token {
            Token::Get | Token::Set => {
                self.last_accessor = true;
                self.push(if token == Token::Get { "get " } else { "set " });
            }

            Token::Name(name) => self.emit_name(&name, scope)?,

            Token::Str(text) | Token::Regexp(text) => self.push(&text),

            Token::Number(text) => {
                // A method call on an integer literal needs parentheses so
                // the dot is not read as a decimal point.
                if matches!(self.next(), Some(Token::Dot)) {
                    self.push("(");
                    self.push(&text);
                    self.push(")");
                } else {
                    self.push(&text);
                }
            }

            Token::Add | Token::Sub => {
                self.push(if token == Token::Add { "+" } else { "-" });
                // `x+ ++y` must not collapse into `x++ +y`, and `x+ +y`
                // must not collapse into `x++y`.
                match self.next() {
                    Some(Token::Inc | Token::Dec | Token::Add | Token::Sub) => {
                        self.out.push(' ');
                    }
                    Some(Token::Pos) if token == Token::Add => self.out.push(' '),
                    Some(Token::Neg) if token == Token::Sub => self.out.push(' '),
                    _ => {}
                }
            }

            Token::Function => self.emit_function()?,

            Token::Return | Token::Typeof => {
                self.push(if token == Token::Return { "return" } else { "typeof" });
                match self.next() {
                    None
                    | Some(
                        Token::LParen
                        | Token::LBracket
                        | Token::LBrace
                        | Token::Str(_)
                        | Token::Regexp(_)
                        | Token::Semi,
                    ) => {}
                    Some(_) => self.out.push(' '),
                }
            }

            Token::Case | Token::Throw => {
                self.push(if token == Token::Case { "case" } else { "throw" });
                if matches!(self.next(), Some(t) if !matches!(t, Token::Str(_))) {
                    self.out.push(' ');
                }
            }

            Token::Break | Token::Continue => {
                self.push(if token == Token::Break { "break" } else { "continue" });
                // Anything but a terminator here is a label.
                if matches!(self.next(), Some(t) if *t != Token::Semi) {
                    self.out.push(' ');
                }
            }

            Token::LBrace => {
                self.push("{");
                self.brace_nesting += 1;
            }

            Token::RBrace => {
                self.push("}");
                self.brace_nesting -= 1;
                let floor = self.tree.scope(scope).brace_nesting;
                if self.brace_nesting < floor {
                    return Err(self.unexpected(&Token::RBrace));
                }
                if self.brace_nesting == floor && self.stack.len() > 1 {
                    self.stack.pop();
                }
            }

            Token::Semi => {
                let keep = self.options.preserve_all_semicolons
                    || matches!(self.next(), Some(t) if *t != Token::RBrace);
                if keep {
                    self.push(";");
                }
                // The column check runs whether or not the `;` itself was
                // kept, so a long statement before a `}` still breaks.
                if let Some(column) = self.options.line_break_column {
                    if self.out.len() - self.line_start > column {
                        self.out.push('\n');
                        self.line_start = self.out.len();
                    }
                }
            }

            Token::Comma => {
                let keep = matches!(
                    self.next(),
                    Some(t) if *t != Token::RBrace && *t != Token::RBracket
                );
                if keep {
                    self.push(",");
                }
            }

            Token::CondComment(body) => self.emit_comment(&body, false),
            Token::KeepComment(body) => self.emit_comment(&body, true),

            other => match other.literal_text() {
                Some(text) => self.push(text),
                None => {
                    return Err(Error::Unprintable {
                        offset: self.offset - 1,
                    })
                }
            },
        }
        Ok(())
    }

    fn emit_name(&mut self, name: &str, scope: ScopeId) -> Result<(), Error> {
        // Property names and object literal keys are emitted verbatim.
        let is_property =
            self.offset >= 2 && matches!(self.tokens.get(self.offset - 2), Some(Token::Dot));
        let is_key = matches!(self.next(), Some(Token::ObjectLit));
        if is_property || is_key {
            self.push(name);
            return Ok(());
        }

        match self.tree.resolve(scope, name) {
            Some((owner, slot)) => {
                let ident = &self.tree.scope(owner).idents[slot];
                let out_name = ident.output_name().to_string();
                let unused = scope != GLOBAL_SCOPE && ident.refcount == 0;
                self.push(&out_name);
                if unused {
                    self.warn(
                        &format!("the symbol {name} is declared but apparently never used"),
                        true,
                    );
                }
            }
            None => self.push(name),
        }
        Ok(())
    }

    fn emit_function(&mut self) -> Result<(), Error> {
        let accessor = self.last_accessor;
        self.last_accessor = false;
        if !accessor {
            self.push("function");
        }

        let mut token = self.consume()?;
        match token.clone() {
            // An accessor head's property name is emitted verbatim; the
            // `get `/`set ` text already provides the separator.
            Token::Name(name) if accessor => {
                self.push(&name);
                token = self.consume()?;
            }
            Token::Str(text) | Token::Number(text) if accessor => {
                self.push(&text);
                token = self.consume()?;
            }
            Token::Name(name) => {
                self.out.push(' ');
                let scope = self.current_scope();
                let (owner, slot) = self.tree.resolve(scope, &name).ok_or(Error::Desync {
                    offset: self.offset,
                })?;
                let ident = &self.tree.scope(owner).idents[slot];
                let out_name = ident.output_name().to_string();
                let unused = scope != GLOBAL_SCOPE && ident.refcount == 0;
                self.push(&out_name);
                if unused {
                    self.warn(
                        &format!("the symbol {name} is declared but apparently never used"),
                        true,
                    );
                }
                token = self.consume()?;
            }
            _ => {}
        }
        if token != Token::LParen {
            return Err(self.unexpected(&token));
        }
        self.push("(");

        let fn_scope = self.tree.scope_at(self.offset).ok_or(Error::Desync {
            offset: self.offset,
        })?;
        self.stack.push(fn_scope);

        loop {
            let token = self.consume()?;
            match token {
                Token::RParen => break,
                Token::Comma => self.push(","),
                Token::Name(name) => {
                    let (owner, slot) = self.tree.resolve(fn_scope, &name).ok_or(Error::Desync {
                        offset: self.offset,
                    })?;
                    let out_name = self.tree.scope(owner).idents[slot].output_name().to_string();
                    self.push(&out_name);
                }
                other => return Err(self.unexpected(&other)),
            }
        }
        self.push(")");

        let token = self.consume()?;
        if token != Token::LBrace {
            return Err(self.unexpected(&token));
        }
        self.push("{");
        self.brace_nesting += 1;

        // Drop the hint directive opening the body; it has served its
        // purpose during analysis.
        if !self.options.preserve_unknown_hints {
            if let (Some(Token::Str(_)), Some(Token::Semi)) =
                (self.tokens.get(self.offset), self.tokens.get(self.offset + 1))
            {
                self.offset += 2;
            }
        }
        Ok(())
    }

    /// Conditional and preserved comments are re-emitted on their own
    /// line; the `!` marker distinguishes "always keep" for downstream
    /// strippers.
    fn emit_comment(&mut self, body: &str, keep: bool) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str("/*");
        if keep {
            self.out.push('!');
        }
        self.out.push_str(body);
        self.out.push_str("*/\n");
    }

    fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(GLOBAL_SCOPE)
    }

    fn next(&self) -> Option<&Token> {
        self.tokens.get(self.offset)
    }

    fn consume(&mut self) -> Result<Token, Error> {
        let token = self
            .tokens
            .get(self.offset)
            .cloned()
            .ok_or(Error::UnexpectedEnd)?;
        self.offset += 1;
        Ok(token)
    }

    fn unexpected(&self, found: &Token) -> Error {
        Error::UnexpectedToken {
            offset: self.offset.saturating_sub(1),
            found: found.display_text().to_string(),
        }
    }

    fn warn(&mut self, message: &str, with_context: bool) {
        if !self.options.verbose {
            return;
        }
        if with_context {
            let snippet = context_snippet(self.tokens, self.offset, 10);
            self.reporter.warning(&format!("{message}\n{snippet}"));
        } else {
            self.reporter.warning(message);
        }
    }

    /// Append text, inserting a space when two identifier characters
    /// would otherwise merge across a token boundary (`else x`, `do x`).
    fn push(&mut self, text: &str) {
        if let (Some(prev), Some(next)) = (self.out.chars().last(), text.chars().next()) {
            if is_ident_char(prev) && is_ident_char(next) {
                self.out.push(' ');
            }
        }
        self.out.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;
    use crate::{normalize, walker};

    fn emit_source(source: &str, options: &Options) -> String {
        let mut tokens = squish_syntax::tokenize(source).expect("should tokenize");
        normalize::normalize(&mut tokens, options);
        let mut tree = ScopeTree::new();
        let mut reporter = CollectingReporter::new();
        walker::build(&tokens, &mut tree, options, &mut reporter).expect("build");
        walker::check(&tokens, &mut tree, options, &mut reporter).expect("check");
        emit(&tokens, &tree, options, &mut reporter).expect("emit")
    }

    fn emit_default(source: &str) -> String {
        emit_source(source, &Options::default())
    }

    #[test]
    fn test_whitespace_stripped() {
        assert_eq!(emit_default("var x  =  1 ;\nvar y = 2;"), "var x=1;var y=2;");
    }

    #[test]
    fn test_plus_before_increment_keeps_space() {
        assert_eq!(emit_default("x = a + ++b;"), "x=a+ ++b;");
    }

    #[test]
    fn test_plus_before_unary_plus_keeps_space() {
        assert_eq!(emit_default("x = a + +b;"), "x=a+ +b;");
    }

    #[test]
    fn test_minus_before_decrement_keeps_space() {
        assert_eq!(emit_default("x = a - --b;"), "x=a- --b;");
    }

    #[test]
    fn test_return_spacing() {
        assert_eq!(emit_default("function f(){return 1;}"), "function f(){return 1};");
        assert_eq!(emit_default("function f(){return(1);}"), "function f(){return(1)};");
        assert_eq!(
            emit_default("function f(){return \"x\";}"),
            "function f(){return\"x\"};"
        );
    }

    #[test]
    fn test_typeof_spacing() {
        assert_eq!(emit_default("x = typeof y;"), "x=typeof y;");
        assert_eq!(emit_default("x = typeof(y);"), "x=typeof(y);");
    }

    #[test]
    fn test_number_method_call_parenthesized() {
        assert_eq!(emit_default("x = 42 .toString();"), "x=(42).toString();");
    }

    #[test]
    fn test_semicolon_elided_before_brace() {
        assert_eq!(emit_default("function f(){x = 1;}"), "function f(){x=1};");
    }

    #[test]
    fn test_semicolons_preserved_on_request() {
        let options = Options {
            preserve_all_semicolons: true,
            ..Options::default()
        };
        assert_eq!(
            emit_source("function f(){x = 1;}", &options),
            "function f(){x=1;}"
        );
    }

    #[test]
    fn test_trailing_comma_elided() {
        assert_eq!(emit_default("x = [1, 2, ];"), "x=[1,2];");
        assert_eq!(emit_default("x = {a: 1, };"), "x={a:1};");
    }

    #[test]
    fn test_else_branch_keeps_space() {
        assert_eq!(emit_default("if (x) y = 1; else y = 2;"), "if(x)y=1;else y=2;");
    }

    #[test]
    fn test_line_break_after_column() {
        let options = Options {
            line_break_column: Some(3),
            ..Options::default()
        };
        assert_eq!(emit_source("x = 1; y = 2; z = 3;", &options), "x=1;\ny=2;\nz=3;");
    }

    #[test]
    fn test_line_break_runs_for_elided_semicolons() {
        let options = Options {
            line_break_column: Some(1),
            ..Options::default()
        };
        assert_eq!(emit_source("if(a){b=1;}c=2;", &options), "if(a){b=1\n}c=2;");
    }

    #[test]
    fn test_keep_comment_reemitted() {
        let out = emit_default("/*! license */\nvar x = 1;");
        assert!(out.starts_with("/*! license */\n"));
        assert!(out.contains("var x=1"));
    }

    #[test]
    fn test_cond_comment_reemitted() {
        let out = emit_default("x = 1; /*@cc_on f(); @*/");
        assert!(out.contains("/*@cc_on f(); @*/"));
    }

    #[test]
    fn test_unused_symbol_warns() {
        let options = Options {
            verbose: true,
            ..Options::default()
        };
        let mut tokens = squish_syntax::tokenize("function f(){var unused = 1;}").expect("tokenize");
        normalize::normalize(&mut tokens, &options);
        let mut tree = ScopeTree::new();
        let mut reporter = CollectingReporter::new();
        walker::build(&tokens, &mut tree, &options, &mut reporter).expect("build");
        walker::check(&tokens, &mut tree, &options, &mut reporter).expect("check");
        emit(&tokens, &tree, &options, &mut reporter).expect("emit");
        assert!(reporter
            .warnings
            .iter()
            .any(|w| w.contains("apparently never used")));
    }

    #[test]
    fn test_break_label_spacing() {
        assert_eq!(
            emit_default("loop1: while (x) { break loop1; }"),
            "loop1:while(x){break loop1};"
        );
    }

    #[test]
    fn test_accessor_emission() {
        assert_eq!(
            emit_default("o = {get foo() {return 1;}};"),
            "o={get foo(){return 1}};"
        );
    }
}
