//! Replacement-name pools and identifier validity checks.
//!
//! The pools are pure data, generated once per process. Order matters:
//! names are handed out front to back, so the pools enumerate `a`..`z`,
//! `A`..`Z`, then each prefix extended with `a`..`z`, `A`..`Z`, `0`..`9`.

use once_cell::sync::Lazy;

/// Short built-in globals assumed present in every browser. Undeclared
/// references to these are not treated as implicit globals, and the
/// replacement pools never contain them.
const BUILTIN: &[&str] = &["NaN", "top"];

fn suffixes() -> impl Iterator<Item = char> {
    ('a'..='z').chain('A'..='Z').chain('0'..='9')
}

/// 1-character candidates: 52 names.
pub static ONES: Lazy<Vec<String>> = Lazy::new(|| {
    ('a'..='z').chain('A'..='Z').map(String::from).collect()
});

fn raw_twos() -> Vec<String> {
    let mut out = Vec::with_capacity(ONES.len() * 62);
    for one in ONES.iter() {
        for c in suffixes() {
            out.push(format!("{one}{c}"));
        }
    }
    out
}

/// 2-character candidates, minus two-letter reserved words.
pub static TWOS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut twos = raw_twos();
    twos.retain(|s| !matches!(s.as_str(), "as" | "is" | "do" | "if" | "in"));
    twos.retain(|s| !is_builtin(s));
    twos
});

/// 3-character candidates, minus three-letter reserved words and
/// built-ins. Built from the unfiltered two-character set so that e.g.
/// `doa` is still available even though `do` is not.
pub static THREES: Lazy<Vec<String>> = Lazy::new(|| {
    let twos = raw_twos();
    let mut out = Vec::with_capacity(twos.len() * 62);
    for two in &twos {
        for c in suffixes() {
            out.push(format!("{two}{c}"));
        }
    }
    out.retain(|s| !matches!(s.as_str(), "for" | "int" | "new" | "try" | "use" | "var"));
    out.retain(|s| !is_builtin(s));
    out
});

pub fn is_builtin(s: &str) -> bool {
    BUILTIN.contains(&s)
}

/// Reserved words, plus a few names (`arguments`, `eval`, `undefined`,
/// ...) that are not formally reserved but must never be produced by a
/// rewrite.
pub fn is_reserved(s: &str) -> bool {
    matches!(
        s,
        "break"
            | "case"
            | "catch"
            | "continue"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "in"
            | "instanceof"
            | "new"
            | "return"
            | "switch"
            | "this"
            | "throw"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "abstract"
            | "boolean"
            | "byte"
            | "char"
            | "class"
            | "const"
            | "debugger"
            | "double"
            | "enum"
            | "export"
            | "extends"
            | "final"
            | "float"
            | "goto"
            | "implements"
            | "import"
            | "int"
            | "interface"
            | "long"
            | "native"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "short"
            | "static"
            | "super"
            | "synchronized"
            | "throws"
            | "transient"
            | "volatile"
            | "let"
            | "yield"
            | "arguments"
            | "eval"
            | "true"
            | "false"
            | "Infinity"
            | "NaN"
            | "null"
            | "undefined"
    )
}

/// Conservative identifier check used by the bracket-to-dot and
/// object-key rewrites. A rejected string may still be a valid
/// identifier (e.g. with unicode), in which case the rewrite is simply
/// not applied.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !is_reserved(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_sizes() {
        assert_eq!(ONES.len(), 52);
        // 52 * 62 minus the five two-letter reserved words.
        assert_eq!(TWOS.len(), 52 * 62 - 5);
        // Unfiltered twos * 62, minus six reserved words, "NaN" and "top".
        assert_eq!(THREES.len(), 52 * 62 * 62 - 8);
    }

    #[test]
    fn test_pools_exclude_reserved() {
        assert!(!TWOS.contains(&"do".to_string()));
        assert!(!TWOS.contains(&"if".to_string()));
        assert!(!THREES.contains(&"var".to_string()));
        assert!(!THREES.contains(&"NaN".to_string()));
        assert!(!THREES.contains(&"top".to_string()));
        // The unfiltered prefix survives in longer names.
        assert!(THREES.contains(&"doa".to_string()));
    }

    #[test]
    fn test_pool_order() {
        assert_eq!(ONES[0], "a");
        assert_eq!(ONES[25], "z");
        assert_eq!(ONES[26], "A");
        assert_eq!(TWOS[0], "aa");
    }

    #[test]
    fn test_valid_identifier() {
        assert!(is_valid_identifier("foo"));
        assert!(is_valid_identifier("_bar9"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("9lives"));
        assert!(!is_valid_identifier("foo-bar"));
        assert!(!is_valid_identifier("class"));
        assert!(!is_valid_identifier("eval"));
        // '$' is valid in JS but deliberately rejected here.
        assert!(!is_valid_identifier("$super"));
    }
}
