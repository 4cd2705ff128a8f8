use std::fmt;

use lazy_static::lazy_static;
use miette::SourceSpan;
use regex::Regex;

/// A token produced by the [`Lexer`](crate::Lexer).
///
/// `span` is relative to the start of the line the token was read from.
/// `value` is only captured for categories where the text matters
/// (identifiers and literals), see [`TokenKind::captures_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: Option<&'a str>,
    pub span: SourceSpan,
}

/// All lexical categories of the language.
///
/// The order of [`TokenKind::PRIORITY`] is significant: at each position the
/// lexer takes the first category whose pattern matches, not the longest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,

    // Condition operators
    And,
    Or,
    Assign,

    // Literals
    DoubleLiteral,
    IntLiteral,

    // Arithmetic and comparison operators
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    Not,

    // Keywords
    Final,
    Int,
    Double,
    Boolean,
    Char,
    String,
    Void,
    True,
    False,
    If,
    While,
    Return,

    // Text literals
    StringLiteral,
    CharLiteral,

    Identifier,
}

impl TokenKind {
    /// Every category, in the order the lexer tries them.
    pub const PRIORITY: [TokenKind; 36] = [
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::Comma,
        TokenKind::Semicolon,
        TokenKind::Dot,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Assign,
        TokenKind::DoubleLiteral,
        TokenKind::IntLiteral,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Lt,
        TokenKind::Gt,
        TokenKind::Not,
        TokenKind::Final,
        TokenKind::Int,
        TokenKind::Double,
        TokenKind::Boolean,
        TokenKind::Char,
        TokenKind::String,
        TokenKind::Void,
        TokenKind::True,
        TokenKind::False,
        TokenKind::If,
        TokenKind::While,
        TokenKind::Return,
        TokenKind::StringLiteral,
        TokenKind::CharLiteral,
        TokenKind::Identifier,
    ];

    /// Keywords that name a variable type.
    pub const TYPE_KEYWORDS: &'static [TokenKind] = &[
        TokenKind::Int,
        TokenKind::Double,
        TokenKind::Boolean,
        TokenKind::Char,
        TokenKind::String,
    ];

    /// Recognition pattern, matched at the current position only.
    fn pattern(self) -> &'static str {
        match self {
            TokenKind::LBrace => r"\{",
            TokenKind::RBrace => r"\}",
            TokenKind::LParen => r"\(",
            TokenKind::RParen => r"\)",
            TokenKind::LBracket => r"\[",
            TokenKind::RBracket => r"\]",
            TokenKind::Comma => r",",
            TokenKind::Semicolon => r";",
            TokenKind::Dot => r"\.",
            TokenKind::And => r"&&",
            TokenKind::Or => r"\|\|",
            TokenKind::Assign => r"=",
            TokenKind::DoubleLiteral => r"-?\d+\.\d+\b",
            TokenKind::IntLiteral => r"-?\d+\b",
            TokenKind::Plus => r"\+",
            TokenKind::Minus => r"-",
            TokenKind::Star => r"\*",
            TokenKind::Slash => r"/",
            TokenKind::Lt => r"<",
            TokenKind::Gt => r">",
            TokenKind::Not => r"!",
            TokenKind::Final => r"final\b",
            TokenKind::Int => r"int\b",
            TokenKind::Double => r"double\b",
            TokenKind::Boolean => r"boolean\b",
            TokenKind::Char => r"char\b",
            TokenKind::String => r"String\b",
            TokenKind::Void => r"void\b",
            TokenKind::True => r"true\b",
            TokenKind::False => r"false\b",
            TokenKind::If => r"if\b",
            TokenKind::While => r"while\b",
            TokenKind::Return => r"return\b",
            TokenKind::StringLiteral => r#""[^"\\',]*""#,
            TokenKind::CharLiteral => r"'[^'\\]'",
            TokenKind::Identifier => r"_\w+|[a-zA-Z]\w*",
        }
    }

    /// Whether the lexer keeps the matched text for this category.
    pub fn captures_value(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::IntLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
        )
    }

    /// Whether this is one of the five variable type keywords.
    pub fn is_type_keyword(self) -> bool {
        Self::TYPE_KEYWORDS.contains(&self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::And => "`&&`",
            TokenKind::Or => "`||`",
            TokenKind::Assign => "`=`",
            TokenKind::DoubleLiteral => "double literal",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Not => "`!`",
            TokenKind::Final => "`final`",
            TokenKind::Int => "`int`",
            TokenKind::Double => "`double`",
            TokenKind::Boolean => "`boolean`",
            TokenKind::Char => "`char`",
            TokenKind::String => "`String`",
            TokenKind::Void => "`void`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::If => "`if`",
            TokenKind::While => "`while`",
            TokenKind::Return => "`return`",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "char literal",
            TokenKind::Identifier => "identifier",
        };
        f.write_str(text)
    }
}

lazy_static! {
    /// Anchored patterns for every category, in priority order.
    pub(crate) static ref TOKEN_PATTERNS: Vec<(TokenKind, Regex)> = TokenKind::PRIORITY
        .iter()
        .map(|kind| {
            let pattern = format!("^(?:{})", kind.pattern());
            let regex = Regex::new(&pattern).expect("token patterns are valid regular expressions");
            (*kind, regex)
        })
        .collect();
}
