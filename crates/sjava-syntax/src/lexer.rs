use miette::SourceSpan;

use crate::token::TOKEN_PATTERNS;
use crate::{SyntaxError, Token, TokenKind};

/// Prefix marking a whole line as a comment.
pub const LINE_COMMENT: &str = "//";

/// Routine names may not start with this prefix.
pub const ILLEGAL_METHOD_PREFIX: &str = "_";

/// Whether the line is a line comment. Only a comment starting in the first
/// column counts.
pub fn is_comment(line: &str) -> bool {
    line.starts_with(LINE_COMMENT)
}

/// Rejects routine names that start with [`ILLEGAL_METHOD_PREFIX`].
pub fn validate_method_name(name: &Token<'_>) -> Result<(), SyntaxError> {
    match name.value {
        Some(text) if text.starts_with(ILLEGAL_METHOD_PREFIX) => Err(SyntaxError::UnknownToken {
            text: text.to_string(),
            span: name.span,
        }),
        _ => Ok(()),
    }
}

/// Lazily splits one line into tokens.
///
/// At every position the categories of [`TokenKind::PRIORITY`] are tried in
/// order and the first one matching exactly at that position wins. Whitespace
/// between tokens is skipped. A comment line yields no tokens. After an
/// [`SyntaxError::UnknownToken`] the lexer is exhausted.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    line: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str) -> Self {
        let mut lexer = Self { line, position: 0 };
        if is_comment(line) {
            lexer.position = line.len();
        } else {
            lexer.skip_whitespace();
        }
        lexer
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.line[self.position..];
        self.position += rest.len() - rest.trim_start().len();
    }

    fn unknown_token(&mut self) -> SyntaxError {
        let line = self.line;
        let rest = &line[self.position..];
        let text = rest.split_whitespace().next().unwrap_or(rest);
        let span = SourceSpan::new(self.position.into(), text.len());
        self.position = self.line.len();
        SyntaxError::UnknownToken {
            text: text.to_string(),
            span,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.line.len() {
            return None;
        }

        let start = self.position;
        let rest = &self.line[start..];
        let matched = TOKEN_PATTERNS
            .iter()
            .find_map(|(kind, pattern)| pattern.find(rest).map(|m| (*kind, m.end())));

        let Some((kind, len)) = matched else {
            return Some(Err(self.unknown_token()));
        };

        let end = start + len;
        self.position = end;
        self.skip_whitespace();

        Some(Ok(Token {
            kind,
            value: kind.captures_value().then(|| &self.line[start..end]),
            span: SourceSpan::new(start.into(), len),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        Lexer::new(line)
            .map(|token| token.expect("line should lex").kind)
            .collect()
    }

    #[test]
    fn test_lex_declaration() {
        assert_eq!(
            kinds("final int a = 5, b;"),
            vec![
                TokenKind::Final,
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::IntLiteral,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lex_method_declaration() {
        assert_eq!(
            kinds("void foo(final String s, char c){"),
            vec![
                TokenKind::Void,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::Final,
                TokenKind::String,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Char,
                TokenKind::Identifier,
                TokenKind::RParen,
                TokenKind::LBrace,
            ]
        );
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        let tokens: Vec<_> = Lexer::new("integer returned iffy String1 _int")
            .map(|token| token.unwrap())
            .collect();
        assert!(tokens.iter().all(|token| token.kind == TokenKind::Identifier));
        let names: Vec<_> = tokens.iter().map(|token| token.value.unwrap()).collect();
        assert_eq!(names, vec!["integer", "returned", "iffy", "String1", "_int"]);
    }

    #[test]
    fn test_condition_keywords_before_paren() {
        assert_eq!(
            kinds("while(a||b&&true){"),
            vec![
                TokenKind::While,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::True,
                TokenKind::RParen,
                TokenKind::LBrace,
            ]
        );
    }

    #[test]
    fn test_numeric_literals() {
        let tokens: Vec<_> = Lexer::new("-7 7.25 -0.5 42").map(|token| token.unwrap()).collect();
        let lexed: Vec<_> = tokens.iter().map(|token| (token.kind, token.value.unwrap())).collect();
        assert_eq!(
            lexed,
            vec![
                (TokenKind::IntLiteral, "-7"),
                (TokenKind::DoubleLiteral, "7.25"),
                (TokenKind::DoubleLiteral, "-0.5"),
                (TokenKind::IntLiteral, "42"),
            ]
        );
    }

    #[test]
    fn test_minus_without_digits_is_operator() {
        assert_eq!(
            kinds("a - b"),
            vec![TokenKind::Identifier, TokenKind::Minus, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_text_literals() {
        let tokens: Vec<_> = Lexer::new(r#"String s = "hello world"; char c = 'x';"#)
            .map(|token| token.unwrap())
            .collect();
        assert_eq!(tokens[3].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[3].value, Some(r#""hello world""#));
        assert_eq!(tokens[8].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[8].value, Some("'x'"));
    }

    #[test]
    fn test_only_values_are_captured() {
        let tokens: Vec<_> = Lexer::new("int a = 3;").map(|token| token.unwrap()).collect();
        let values: Vec<_> = tokens.iter().map(|token| token.value).collect();
        assert_eq!(values, vec![None, Some("a"), None, Some("3"), None]);
    }

    #[test]
    fn test_spans_are_line_relative() {
        let tokens: Vec<_> = Lexer::new("   x  = 10;").map(|token| token.unwrap()).collect();
        assert_eq!(tokens[0].span, SourceSpan::new(3.into(), 1));
        assert_eq!(tokens[1].span, SourceSpan::new(6.into(), 1));
        assert_eq!(tokens[2].span, SourceSpan::new(8.into(), 2));
    }

    #[test]
    fn test_comment_and_blank_lines() {
        assert!(kinds("// int a = 5;").is_empty());
        assert!(kinds("//").is_empty());
        assert!(kinds("").is_empty());
        assert!(kinds(" \t ").is_empty());
    }

    #[test]
    fn test_indented_comment_is_not_a_comment() {
        assert_eq!(kinds("  // x"), vec![TokenKind::Slash, TokenKind::Slash, TokenKind::Identifier]);
    }

    #[test]
    fn test_unknown_token_stops_lexing() {
        let mut lexer = Lexer::new("int a = #5;");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Ok(_))));
        match lexer.next() {
            Some(Err(SyntaxError::UnknownToken { text, span })) => {
                assert_eq!(text, "#5;");
                assert_eq!(span, SourceSpan::new(8.into(), 3));
            }
            other => panic!("Expected unknown token, got {:?}", other),
        }
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_validate_method_name() {
        let valid = Lexer::new("foo").next().unwrap().unwrap();
        assert!(validate_method_name(&valid).is_ok());

        let reserved = Lexer::new("_foo").next().unwrap().unwrap();
        assert!(matches!(
            validate_method_name(&reserved),
            Err(SyntaxError::UnknownToken { text, .. }) if text == "_foo"
        ));
    }
}
