//! Token-stream normalization: the local rewrites that run before any
//! scope analysis.
//!
//! Quote re-selection always runs, because string payloads arrive with
//! their quote characters decoded and must be re-serialized either way.
//! The remaining rewrites (string folding, bracket-to-dot member access,
//! bare object keys) are byte-saving optimizations gated behind the
//! `disable_optimizations` flag. None of these can fail.

use squish_syntax::Token;

use crate::names::is_valid_identifier;
use crate::options::Options;

pub(crate) fn normalize(tokens: &mut Vec<Token>, options: &Options) {
    if !options.disable_optimizations {
        fold_string_concat(tokens);
    }
    requote_strings(tokens);
    if !options.disable_optimizations {
        shorten_member_access(tokens);
        shorten_object_keys(tokens);
    }
}

/// Merge `"a" + "b"` into `"ab"`, repeatedly. A fold is skipped when the
/// right operand is itself the receiver of a property access, since
/// `"a"+"b".toUpperCase()` and `"a"+"bcd"[i]` must keep their grouping.
fn fold_string_concat(tokens: &mut Vec<Token>) {
    let mut i = 1;
    while i + 1 < tokens.len() {
        if tokens[i] == Token::Add {
            let foldable = matches!(
                (&tokens[i - 1], &tokens[i + 1]),
                (Token::Str(_), Token::Str(_))
            );
            if foldable {
                if matches!(tokens.get(i + 2), Some(Token::Dot | Token::LBracket)) {
                    i += 3;
                    continue;
                }
                let right = match tokens.remove(i + 1) {
                    Token::Str(s) => s,
                    _ => unreachable!("checked above"),
                };
                tokens.remove(i);
                if let Token::Str(left) = &mut tokens[i - 1] {
                    left.push_str(&right);
                }
                // Stay on the merged token; it may fold again.
                i -= 1;
                continue;
            }
        }
        i += 1;
    }
}

/// Pick the cheaper quote character for every string, escape only that
/// character, and wrap the payload in it. After this pass string
/// payloads are exact output text. `</script` is neutralized last so the
/// result stays safe when inlined in HTML.
fn requote_strings(tokens: &mut [Token]) {
    for token in tokens.iter_mut() {
        if let Token::Str(value) = token {
            let singles = value.matches('\'').count();
            let doubles = value.matches('"').count();
            let quote = if doubles <= singles { '"' } else { '\'' };

            let mut quoted = String::with_capacity(value.len() + 2);
            quoted.push(quote);
            for c in value.chars() {
                if c == quote {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            quoted.push(quote);

            if quoted.contains("</script") {
                quoted = quoted.replace("</script", "<\\/script");
            }
            *value = quoted;
        }
    }
}

fn unquoted(payload: &str) -> &str {
    &payload[1..payload.len() - 1]
}

/// Rewrite `name["ident"]` into `name.ident`. Runs after requoting, so
/// the string payload carries its quotes.
fn shorten_member_access(tokens: &mut Vec<Token>) {
    let mut i = 1;
    while i + 2 < tokens.len() {
        let applies = tokens[i] == Token::LBracket
            && matches!(tokens[i - 1], Token::Name(_))
            && matches!(tokens[i + 1], Token::Str(_))
            && tokens[i + 2] == Token::RBracket;
        if applies {
            let ident = match &tokens[i + 1] {
                Token::Str(payload) => unquoted(payload).to_string(),
                _ => unreachable!("checked above"),
            };
            if is_valid_identifier(&ident) {
                tokens[i] = Token::Dot;
                tokens[i + 1] = Token::Name(ident);
                tokens.remove(i + 2);
                i += 2;
                continue;
            }
        }
        i += 1;
    }
}

/// Rewrite `'foo': ...` into `foo: ...` in object literals.
fn shorten_object_keys(tokens: &mut [Token]) {
    for i in 1..tokens.len() {
        if tokens[i] == Token::ObjectLit {
            let ident = match &tokens[i - 1] {
                Token::Str(payload) => unquoted(payload).to_string(),
                _ => continue,
            };
            if is_valid_identifier(&ident) {
                tokens[i - 1] = Token::Name(ident);
            }
        }
    }
}
