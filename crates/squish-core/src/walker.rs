//! The two-pass walker: one grammar-shaped traversal replayed by two
//! typed visitor passes.
//!
//! The build pass creates the scope tree and declares symbols; the check
//! pass resolves references and annotates the tree. Both passes must
//! visit tokens in the same order and make identical scope-entry
//! decisions, because the check pass (and later the emitter) reuses the
//! offset-keyed scope index the build pass produced. A disagreement
//! surfaces as [`Error::Desync`].
//!
//! The traversal is not a parser. It tracks brace/bracket/paren nesting
//! and a scope stack, and understands exactly the statement shapes that
//! matter for scoping: function introductions, `var`/`const`/`let`
//! lists, `catch` bindings, `with` blocks, and hint directives.

use squish_syntax::Token;

use crate::error::Error;
use crate::names;
use crate::options::Options;
use crate::report::Reporter;
use crate::scope::{ScopeId, ScopeTree, GLOBAL_SCOPE};

/// Run the build pass over a normalized token stream.
pub(crate) fn build(
    tokens: &[Token],
    tree: &mut ScopeTree,
    options: &Options,
    reporter: &mut dyn Reporter,
) -> Result<(), Error> {
    Walker::new(tokens, tree, options, reporter).parse_scope::<BuildPass>(GLOBAL_SCOPE)
}

/// Run the check pass. Requires a tree produced by [`build`] on the same
/// token stream.
pub(crate) fn check(
    tokens: &[Token],
    tree: &mut ScopeTree,
    options: &Options,
    reporter: &mut dyn Reporter,
) -> Result<(), Error> {
    Walker::new(tokens, tree, options, reporter).parse_scope::<CheckPass>(GLOBAL_SCOPE)
}

/// Nearby-token context attached to warnings, with a marker around the
/// most recently consumed token.
pub(crate) fn context_snippet(tokens: &[Token], offset: usize, max: usize) -> String {
    let start = offset.saturating_sub(max);
    let end = (offset + max).min(tokens.len());
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate().take(end).skip(start) {
        if i + 1 == offset {
            out.push_str(" ---> ");
        }
        out.push_str(token.display_text());
        if i + 1 == offset {
            out.push_str(" <--- ");
        }
    }
    out
}

/// Shared traversal state threaded through the walk.
pub(crate) struct Walker<'a> {
    tokens: &'a [Token],
    tree: &'a mut ScopeTree,
    options: &'a Options,
    reporter: &'a mut dyn Reporter,
    offset: usize,
    brace_nesting: i32,
    stack: Vec<ScopeId>,
}

/// One analysis pass. Implementations are stateless unit types; the
/// walker's skeleton is monomorphized per pass, so there is no runtime
/// mode flag to branch on.
trait Pass {
    /// The scope for the function whose parameter list starts at
    /// `offset` (the token right after its `(`).
    fn function_scope(w: &mut Walker<'_>, parent: ScopeId, offset: usize)
        -> Result<ScopeId, Error>;
    fn function_name(w: &mut Walker<'_>, name: &str);
    fn parameter(w: &mut Walker<'_>, scope: ScopeId, name: &str, position: usize);
    fn var_statement(w: &mut Walker<'_>, counts: bool);
    fn var_name(w: &mut Walker<'_>, name: &str);
    fn catch_name(w: &mut Walker<'_>, name: &str) -> Result<(), Error>;
    fn name_ref(w: &mut Walker<'_>, name: &str);
    fn dynamic_scope(w: &mut Walker<'_>, construct: &str);
    fn hint_pair(w: &mut Walker<'_>, scope: ScopeId, name: &str, value: &str, raw: &str);
    fn unknown_hint(w: &mut Walker<'_>, raw: &str);
}

impl<'a> Walker<'a> {
    fn new(
        tokens: &'a [Token],
        tree: &'a mut ScopeTree,
        options: &'a Options,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            tokens,
            tree,
            options,
            reporter,
            offset: 0,
            brace_nesting: 0,
            stack: Vec::new(),
        }
    }

    fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(GLOBAL_SCOPE)
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

    /// Token at `offset + delta`. `peek(0)` is the next unconsumed token,
    /// `peek(-2)` the one before the most recently consumed.
    fn peek(&self, delta: isize) -> Option<&Token> {
        let index = self.offset.checked_add_signed(delta)?;
        self.tokens.get(index)
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

    /// `eval`, `with` and conditional comments make static resolution
    /// unsound for every enclosing local scope, so the whole chain keeps
    /// its names.
    fn protect_current(&mut self, construct: &str) {
        let scope = self.current_scope();
        self.tree.protect(scope);
        let mut message = format!("using {construct} is not recommended");
        if self.options.munge {
            message.push_str("; it also disables renaming for the enclosing scopes");
        }
        self.warn(&message, true);
    }

    fn parse_scope<P: Pass>(&mut self, scope: ScopeId) -> Result<(), Error> {
        self.stack.push(scope);
        while self.offset < self.tokens.len() {
            let token = self.consume()?;
            match token {
                Token::Var | Token::Const | Token::Let => {
                    P::var_statement(self, token == Token::Var);
                    self.parse_var_list::<P>()?;
                }
                Token::Function => self.parse_function::<P>()?,
                Token::LBrace => self.brace_nesting += 1,
                Token::RBrace => {
                    self.brace_nesting -= 1;
                    let floor = self.tree.scope(scope).brace_nesting;
                    if self.brace_nesting < floor {
                        return Err(self.unexpected(&Token::RBrace));
                    }
                    if self.brace_nesting == floor {
                        self.stack.pop();
                        return Ok(());
                    }
                }
                Token::With => P::dynamic_scope(self, "'with'"),
                Token::Catch => self.parse_catch::<P>()?,
                Token::CondComment(_) => P::dynamic_scope(self, "a conditional comment"),
                Token::Name(name) => P::name_ref(self, &name),
                _ => {}
            }
        }
        self.stack.pop();
        Ok(())
    }

    /// The list after `var`/`const`/`let`: names separated by commas,
    /// each optionally initialized, terminated by `;` or by `in` (for-in
    /// heads).
    fn parse_var_list<P: Pass>(&mut self) -> Result<(), Error> {
        loop {
            let token = self.consume()?;
            let name = match token {
                Token::Name(name) => name,
                other => return Err(self.unexpected(&other)),
            };
            P::var_name(self, &name);

            match self.peek(0) {
                Some(Token::In) => return Ok(()),
                Some(Token::Semi | Token::Assign | Token::Comma) => {
                    self.parse_expression::<P>()?;
                    if matches!(self.peek(-1), Some(Token::Semi)) {
                        return Ok(());
                    }
                }
                Some(other) => {
                    return Err(Error::UnexpectedToken {
                        offset: self.offset,
                        found: other.display_text().to_string(),
                    })
                }
                None => return Err(Error::UnexpectedEnd),
            }
        }
    }

    /// Consume until a `,` or `;` at the entry nesting level.
    fn parse_expression<P: Pass>(&mut self) -> Result<(), Error> {
        let entry_brace_nesting = self.brace_nesting;
        let mut bracket_nesting = 0i32;
        let mut paren_nesting = 0i32;

        while self.offset < self.tokens.len() {
            let token = self.consume()?;
            match token {
                Token::Semi | Token::Comma => {
                    if self.brace_nesting == entry_brace_nesting
                        && bracket_nesting == 0
                        && paren_nesting == 0
                    {
                        return Ok(());
                    }
                }
                Token::Function => self.parse_function::<P>()?,
                Token::LBrace => self.brace_nesting += 1,
                Token::RBrace => {
                    self.brace_nesting -= 1;
                    if self.brace_nesting < entry_brace_nesting {
                        return Err(self.unexpected(&Token::RBrace));
                    }
                }
                Token::LBracket => bracket_nesting += 1,
                Token::RBracket => bracket_nesting -= 1,
                Token::LParen => paren_nesting += 1,
                Token::RParen => paren_nesting -= 1,
                Token::CondComment(_) => P::dynamic_scope(self, "a conditional comment"),
                Token::Name(name) => P::name_ref(self, &name),
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_function<P: Pass>(&mut self) -> Result<(), Error> {
        let parent = self.current_scope();

        // After a `get`/`set` head the next token is a property name,
        // not a binding.
        let accessor = self.offset >= 2
            && matches!(self.tokens.get(self.offset - 2), Some(Token::Get | Token::Set));

        let mut token = self.consume()?;
        match token.clone() {
            Token::Name(name) => {
                if !accessor {
                    P::function_name(self, &name);
                }
                token = self.consume()?;
            }
            Token::Str(_) | Token::Number(_) if accessor => {
                token = self.consume()?;
            }
            _ => {}
        }
        if token != Token::LParen {
            return Err(self.unexpected(&token));
        }

        let fn_scope = P::function_scope(self, parent, self.offset)?;

        let mut position = 0;
        loop {
            let token = self.consume()?;
            match token {
                Token::RParen => break,
                Token::Comma => {}
                Token::Name(name) => {
                    P::parameter(self, fn_scope, &name, position);
                    position += 1;
                }
                other => return Err(self.unexpected(&other)),
            }
        }

        let token = self.consume()?;
        if token != Token::LBrace {
            return Err(self.unexpected(&token));
        }
        self.brace_nesting += 1;

        // A string-statement opening the body is a hint directive:
        // "name:nomunge, other:nomunge". Consume the string here; the
        // trailing semi falls through the scope loop harmlessly.
        if let (Some(Token::Str(payload)), Some(Token::Semi)) = (self.peek(0), self.peek(1)) {
            let payload = payload.clone();
            self.offset += 1;
            self.parse_hint::<P>(fn_scope, &payload);
        }

        self.parse_scope::<P>(fn_scope)
    }

    fn parse_hint<P: Pass>(&mut self, scope: ScopeId, payload: &str) {
        // Payloads carry their quote characters after normalization.
        let body = payload[1..payload.len() - 1].trim();
        if body.is_empty() {
            return;
        }
        for raw in body.split(',') {
            let Some(idx) = raw.find(':') else {
                P::unknown_hint(self, raw);
                return;
            };
            if idx == 0 || idx + 1 >= raw.len() {
                P::unknown_hint(self, raw);
                return;
            }
            let name = raw[..idx].trim();
            let value = raw[idx + 1..].trim();
            P::hint_pair(self, scope, name, value, raw);
        }
    }

    /// `catch (name)`. The binding lands in the enclosing function
    /// scope; no block scope is created for it.
    fn parse_catch<P: Pass>(&mut self) -> Result<(), Error> {
        let token = self.consume()?;
        if token != Token::LParen {
            return Err(self.unexpected(&token));
        }
        let token = self.consume()?;
        let name = match token {
            Token::Name(name) => name,
            other => return Err(self.unexpected(&other)),
        };
        P::catch_name(self, &name)?;
        let token = self.consume()?;
        if token != Token::RParen {
            return Err(self.unexpected(&token));
        }
        Ok(())
    }
}

struct BuildPass;

impl Pass for BuildPass {
    fn function_scope(
        w: &mut Walker<'_>,
        parent: ScopeId,
        offset: usize,
    ) -> Result<ScopeId, Error> {
        Ok(w.tree.add_scope(w.brace_nesting, parent, offset))
    }

    fn function_name(w: &mut Walker<'_>, name: &str) {
        let scope = w.current_scope();
        if w.tree.scope(scope).local(name).is_some() {
            w.warn(
                &format!("the function {name} has already been declared in the same scope"),
                true,
            );
        }
        w.tree.scope_mut(scope).declare(name);
    }

    fn parameter(w: &mut Walker<'_>, scope: ScopeId, name: &str, position: usize) {
        let slot = w.tree.scope_mut(scope).declare(name);
        if position == 0 && name == "$super" {
            // Prototype 1.6 superclass calls require this exact name.
            w.tree.scope_mut(scope).idents[slot].munge_eligible = false;
        }
    }

    fn var_statement(w: &mut Walker<'_>, counts: bool) {
        if !counts {
            return;
        }
        let scope = w.current_scope();
        let scope = w.tree.scope_mut(scope);
        scope.var_statement_count += 1;
        if scope.var_statement_count > 1 {
            w.warn("try to use a single var statement per scope", true);
        }
    }

    fn var_name(w: &mut Walker<'_>, name: &str) {
        let scope = w.current_scope();
        if w.tree.scope(scope).local(name).is_some() {
            w.warn(
                &format!("the variable {name} has already been declared in the same scope"),
                true,
            );
        } else {
            w.tree.scope_mut(scope).declare(name);
        }
    }

    fn catch_name(w: &mut Walker<'_>, name: &str) -> Result<(), Error> {
        let scope = w.current_scope();
        w.tree.scope_mut(scope).declare(name);
        Ok(())
    }

    fn name_ref(w: &mut Walker<'_>, name: &str) {
        if name == "eval" {
            w.protect_current("'eval'");
        }
    }

    fn dynamic_scope(w: &mut Walker<'_>, construct: &str) {
        w.protect_current(construct);
    }

    fn hint_pair(w: &mut Walker<'_>, scope: ScopeId, name: &str, value: &str, _raw: &str) {
        w.tree
            .scope_mut(scope)
            .hints
            .insert(name.to_string(), value.to_string());
    }

    fn unknown_hint(w: &mut Walker<'_>, raw: &str) {
        if !w.options.preserve_unknown_hints {
            w.warn(&format!("not a minifier hint: {raw}"), true);
        }
    }
}

struct CheckPass;

impl Pass for CheckPass {
    fn function_scope(
        w: &mut Walker<'_>,
        _parent: ScopeId,
        offset: usize,
    ) -> Result<ScopeId, Error> {
        w.tree.scope_at(offset).ok_or(Error::Desync { offset })
    }

    fn function_name(_w: &mut Walker<'_>, _name: &str) {}
    fn parameter(_w: &mut Walker<'_>, _scope: ScopeId, _name: &str, _position: usize) {}
    fn var_statement(_w: &mut Walker<'_>, _counts: bool) {}
    fn var_name(_w: &mut Walker<'_>, _name: &str) {}

    fn catch_name(w: &mut Walker<'_>, name: &str) -> Result<(), Error> {
        let scope = w.current_scope();
        let (owner, slot) = w
            .tree
            .resolve(scope, name)
            .ok_or(Error::Desync { offset: w.offset })?;
        w.tree.scope_mut(owner).idents[slot].refcount += 1;
        Ok(())
    }

    fn name_ref(w: &mut Walker<'_>, name: &str) {
        // Property names after `.` (or an accessor head) and object
        // literal keys are not scope references.
        if matches!(w.peek(-2), Some(Token::Dot | Token::Get | Token::Set))
            || matches!(w.peek(0), Some(Token::ObjectLit))
        {
            return;
        }
        let scope = w.current_scope();
        match w.tree.resolve(scope, name) {
            Some((owner, slot)) => w.tree.scope_mut(owner).idents[slot].refcount += 1,
            None => {
                if name.len() <= 3 && !names::is_builtin(name) {
                    // Reserve this undeclared short global so that no
                    // munged local can collide with it. The occurrence
                    // itself is still emitted as-is.
                    w.tree.scope_mut(GLOBAL_SCOPE).declare(name);
                }
            }
        }
    }

    fn dynamic_scope(_w: &mut Walker<'_>, _construct: &str) {}

    fn hint_pair(w: &mut Walker<'_>, scope: ScopeId, name: &str, value: &str, raw: &str) {
        match w.tree.scope(scope).local(name) {
            Some(slot) => {
                if value == "nomunge" {
                    w.tree.scope_mut(scope).idents[slot].munge_eligible = false;
                } else {
                    w.warn(&format!("unsupported hint value: {raw}"), true);
                }
            }
            None => w.warn(&format!("hint refers to an unknown identifier: {raw}"), true),
        }
    }

    fn unknown_hint(_w: &mut Walker<'_>, _raw: &str) {}
}
