//! Lexical and statement-level syntax of sJava.
//!
//! sJava programs are validated one line at a time. This crate provides the
//! pieces that do not depend on any symbol information:
//! - [`TokenKind`]: the closed set of lexical categories, each bound to a
//!   recognition pattern, in priority order
//! - [`Lexer`]: splits a single line into [`Token`]s, first matching category wins
//! - [`Cursor`]: current-plus-lookahead view over a line used by the parser
//! - [`classify`]: picks the [`StatementKind`] of a line from its first two tokens

mod cursor;
mod error;
mod lexer;
mod statement;
mod token;
mod types;

pub use cursor::Cursor;
pub use error::{Expected, SyntaxError};
pub use lexer::{is_comment, validate_method_name, Lexer, ILLEGAL_METHOD_PREFIX, LINE_COMMENT};
pub use statement::{classify, StatementKind};
pub use token::{Token, TokenKind};
pub use types::VarType;
