use std::fmt;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::TokenKind;

/// Errors raised while lexing a line or matching it against a grammar rule.
///
/// Spans are relative to the start of the offending line.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SyntaxError {
    /// No lexical category matches at the current position.
    #[error("Unknown token `{text}`")]
    #[diagnostic(code(sjava::syntax::unknown_token))]
    UnknownToken {
        text: String,
        #[label("not a token of the language")]
        span: SourceSpan,
    },

    /// The first one or two tokens of a line do not start any statement.
    #[error("Unknown statement starting with {first}")]
    #[diagnostic(
        code(sjava::syntax::unknown_statement),
        help("Statements are declarations, assignments, calls, `if`/`while` blocks, `return;` or a closing brace")
    )]
    UnknownStatement {
        first: TokenKind,
        second: Option<TokenKind>,
        #[label("cannot start a statement here")]
        span: SourceSpan,
    },

    /// A grammar step required something else, or tokens were left over.
    #[error("Unexpected {}, expected {expected}", describe_found(.found))]
    #[diagnostic(code(sjava::syntax::unexpected_token))]
    UnexpectedToken {
        expected: Expected,
        found: Option<TokenKind>,
        #[label("unexpected here")]
        span: Option<SourceSpan>,
    },
}

fn describe_found(found: &Option<TokenKind>) -> String {
    match found {
        Some(kind) => kind.to_string(),
        None => "end of line".to_string(),
    }
}

/// What a grammar step was looking for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    OneOf(&'static [TokenKind]),
    /// A literal or identifier in value position.
    Value,
    EndOfStatement,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::OneOf(kinds) => {
                f.write_str("one of ")?;
                for (index, kind) in kinds.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
            Expected::Value => f.write_str("a value"),
            Expected::EndOfStatement => f.write_str("end of statement"),
        }
    }
}
