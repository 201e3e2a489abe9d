//! Token model for the minifier.
//!
//! Tokens are addressed by their index in the stream; no spans are kept
//! past tokenization. Payload-bearing kinds carry their decoded text,
//! every other kind maps to a fixed printed form via [`Token::literal_text`].

/// A single JavaScript token.
///
/// The printed form of the fixed kinds deliberately embeds spacing
/// (`"var "`, `" in "`, ...) so that the emitter can concatenate tokens
/// without re-deriving most whitespace rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Payload-bearing kinds ===
    /// Identifier: `foo`, `_bar`, `$baz`
    Name(String),
    /// String literal payload. Decoded by the lexer (quote escapes only);
    /// the normalizer re-quotes it, after which the payload includes the
    /// surrounding quote characters.
    Str(String),
    /// Number literal, kept as source text: `42`, `3.14`, `0xff`
    Number(String),
    /// Regular expression, including delimiters and flags: `/pat/gi`
    Regexp(String),
    /// JScript conditional comment `/*@ ... @*/`, payload without `/*` `*/`
    CondComment(String),
    /// Preserved comment `/*! ... */`, payload without `/*!` `*/`
    KeepComment(String),

    // === Keywords ===
    Function,
    Var,
    Let,
    Const,
    If,
    Else,
    For,
    In,
    With,
    While,
    Do,
    Try,
    Catch,
    Finally,
    Throw,
    Switch,
    Break,
    Continue,
    Case,
    Default,
    Return,
    New,
    Delete,
    Typeof,
    Void,
    Instanceof,
    This,
    Null,
    True,
    False,
    Yield,
    Debugger,
    /// Accessor head `get`, always followed by a synthetic [`Token::Function`]
    Get,
    /// Accessor head `set`, always followed by a synthetic [`Token::Function`]
    Set,

    // === Punctuation ===
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Hook,
    /// `:` introducing an object-literal value (distinct from [`Token::Colon`])
    ObjectLit,
    /// `:` in a ternary, label, or switch case
    Colon,

    // === Operators ===
    Assign,
    AssignAdd,
    AssignSub,
    AssignMul,
    AssignDiv,
    AssignMod,
    AssignBitOr,
    AssignBitXor,
    AssignBitAnd,
    AssignLsh,
    AssignRsh,
    AssignUrsh,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    ShEq,
    ShNe,
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
    Lsh,
    Rsh,
    Ursh,
    Not,
    BitNot,
    /// Unary plus
    Pos,
    /// Unary minus
    Neg,
    Inc,
    Dec,
    /// Binary plus
    Add,
    /// Binary minus
    Sub,
    Mul,
    Div,
    Mod,
}

impl Token {
    /// The fixed printed form of this token, or `None` for payload-bearing
    /// kinds (and for any future kind someone forgets to add here, which the
    /// emitter treats as a fatal gap).
    pub fn literal_text(&self) -> Option<&'static str> {
        let text = match self {
            Token::Function => "function",
            Token::Var => "var ",
            Token::Let => "let ",
            Token::Const => "const ",
            Token::If => "if",
            Token::Else => "else",
            Token::For => "for",
            Token::In => " in ",
            Token::With => "with",
            Token::While => "while",
            Token::Do => "do",
            Token::Try => "try",
            Token::Catch => "catch",
            Token::Finally => "finally",
            Token::Throw => "throw",
            Token::Switch => "switch",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Case => "case",
            Token::Default => "default",
            Token::Return => "return",
            Token::New => "new ",
            Token::Delete => "delete ",
            Token::Typeof => "typeof",
            Token::Void => "void ",
            Token::Instanceof => " instanceof ",
            Token::This => "this",
            Token::Null => "null",
            Token::True => "true",
            Token::False => "false",
            Token::Yield => "yield ",
            Token::Debugger => "debugger",
            Token::Get => "get ",
            Token::Set => "set ",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Semi => ";",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Hook => "?",
            Token::ObjectLit => ":",
            Token::Colon => ":",
            Token::Assign => "=",
            Token::AssignAdd => "+=",
            Token::AssignSub => "-=",
            Token::AssignMul => "*=",
            Token::AssignDiv => "/=",
            Token::AssignMod => "%=",
            Token::AssignBitOr => "|=",
            Token::AssignBitXor => "^=",
            Token::AssignBitAnd => "&=",
            Token::AssignLsh => "<<=",
            Token::AssignRsh => ">>=",
            Token::AssignUrsh => ">>>=",
            Token::Or => "||",
            Token::And => "&&",
            Token::BitOr => "|",
            Token::BitXor => "^",
            Token::BitAnd => "&",
            Token::ShEq => "===",
            Token::ShNe => "!==",
            Token::Eq => "==",
            Token::Ne => "!=",
            Token::Le => "<=",
            Token::Lt => "<",
            Token::Ge => ">=",
            Token::Gt => ">",
            Token::Lsh => "<<",
            Token::Rsh => ">>",
            Token::Ursh => ">>>",
            Token::Not => "!",
            Token::BitNot => "~",
            Token::Pos => "+",
            Token::Neg => "-",
            Token::Inc => "++",
            Token::Dec => "--",
            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Div => "/",
            Token::Mod => "%",

            Token::Name(_)
            | Token::Str(_)
            | Token::Number(_)
            | Token::Regexp(_)
            | Token::CondComment(_)
            | Token::KeepComment(_) => return None,
        };
        Some(text)
    }

    /// Payload text for payload-bearing kinds.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Token::Name(s)
            | Token::Str(s)
            | Token::Number(s)
            | Token::Regexp(s)
            | Token::CondComment(s)
            | Token::KeepComment(s) => Some(s),
            _ => None,
        }
    }

    /// Best-effort display text, used in warning snippets.
    pub fn display_text(&self) -> &str {
        self.payload()
            .or_else(|| self.literal_text())
            .unwrap_or("<?>")
    }
}

/// Look up a keyword from an identifier string. `get`/`set` are contextual
/// and handled by the lexer, not here.
pub(crate) fn keyword_from_str(s: &str) -> Option<Token> {
    let kind = match s {
        "function" => Token::Function,
        "var" => Token::Var,
        "let" => Token::Let,
        "const" => Token::Const,
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "in" => Token::In,
        "with" => Token::With,
        "while" => Token::While,
        "do" => Token::Do,
        "try" => Token::Try,
        "catch" => Token::Catch,
        "finally" => Token::Finally,
        "throw" => Token::Throw,
        "switch" => Token::Switch,
        "break" => Token::Break,
        "continue" => Token::Continue,
        "case" => Token::Case,
        "default" => Token::Default,
        "return" => Token::Return,
        "new" => Token::New,
        "delete" => Token::Delete,
        "typeof" => Token::Typeof,
        "void" => Token::Void,
        "instanceof" => Token::Instanceof,
        "this" => Token::This,
        "null" => Token::Null,
        "true" => Token::True,
        "false" => Token::False,
        "yield" => Token::Yield,
        "debugger" => Token::Debugger,
        _ => return None,
    };
    Some(kind)
}
