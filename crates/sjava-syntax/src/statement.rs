use std::fmt;

use crate::{SyntaxError, Token, TokenKind};

/// The grammar rule a line is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    VariableDeclaration,
    Return,
    /// `if (...) {` or `while (...) {`
    Conditional,
    MethodDeclaration,
    Assignment,
    MethodCall,
    /// A lone `}`
    CloseScope,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::VariableDeclaration => "variable declaration",
            StatementKind::Return => "return statement",
            StatementKind::Conditional => "conditional block",
            StatementKind::MethodDeclaration => "method declaration",
            StatementKind::Assignment => "assignment",
            StatementKind::MethodCall => "method call",
            StatementKind::CloseScope => "closing brace",
        };
        f.write_str(name)
    }
}

/// Decides which statement grammar applies from the first two tokens of a line.
///
/// Only a leading identifier looks at the second token: `=` makes it an
/// assignment and `(` a method call. Anything else is an unknown statement.
pub fn classify(first: &Token<'_>, second: Option<&Token<'_>>) -> Result<StatementKind, SyntaxError> {
    let kind = match first.kind {
        TokenKind::Final
        | TokenKind::Int
        | TokenKind::Double
        | TokenKind::Boolean
        | TokenKind::Char
        | TokenKind::String => Some(StatementKind::VariableDeclaration),
        TokenKind::Return => Some(StatementKind::Return),
        TokenKind::If | TokenKind::While => Some(StatementKind::Conditional),
        TokenKind::Void => Some(StatementKind::MethodDeclaration),
        TokenKind::Identifier => match second.map(|token| token.kind) {
            Some(TokenKind::Assign) => Some(StatementKind::Assignment),
            Some(TokenKind::LParen) => Some(StatementKind::MethodCall),
            _ => None,
        },
        TokenKind::RBrace => Some(StatementKind::CloseScope),
        _ => None,
    };

    kind.ok_or_else(|| SyntaxError::UnknownStatement {
        first: first.kind,
        second: second.map(|token| token.kind),
        span: first.span,
    })
}
