use crate::{Expected, Lexer, SyntaxError, Token, TokenKind};

/// Current-plus-lookahead view over the tokens of one line.
///
/// `current` is the token consumed last and `peek` is the one about to be
/// consumed. Both are filled from the lexer as soon as the cursor is built, so
/// an unknown token is reported when it becomes the lookahead.
#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: Lexer<'a>,
    current: Option<Token<'a>>,
    next: Option<Token<'a>>,
}

impl<'a> Cursor<'a> {
    pub fn new(line: &'a str) -> Result<Self, SyntaxError> {
        let mut tokens = Lexer::new(line);
        let current = tokens.next().transpose()?;
        let next = tokens.next().transpose()?;
        Ok(Self {
            tokens,
            current,
            next,
        })
    }

    /// The token consumed last.
    pub fn current(&self) -> Option<&Token<'a>> {
        self.current.as_ref()
    }

    /// The token about to be consumed.
    pub fn peek(&self) -> Option<&Token<'a>> {
        self.next.as_ref()
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.next.map(|token| token.kind)
    }

    fn bump(&mut self) -> Result<(), SyntaxError> {
        self.current = self.next.take();
        self.next = self.tokens.next().transpose()?;
        Ok(())
    }

    /// Consume the lookahead if it has the given kind.
    pub fn advance_if(&mut self, kind: TokenKind) -> Result<bool, SyntaxError> {
        if self.peek_kind() == Some(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the lookahead if it has any of the given kinds.
    pub fn advance_if_any(&mut self, kinds: &[TokenKind]) -> Result<Option<Token<'a>>, SyntaxError> {
        match self.next {
            Some(token) if kinds.contains(&token.kind) => {
                self.bump()?;
                Ok(Some(token))
            }
            _ => Ok(None),
        }
    }

    /// Expect the next token to be of a specific kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, SyntaxError> {
        match self.next {
            Some(token) if token.kind == kind => {
                self.bump()?;
                Ok(token)
            }
            _ => Err(self.unexpected(Expected::Token(kind))),
        }
    }

    /// Expect the next token to be any of the given kinds.
    pub fn expect_one_of(&mut self, kinds: &'static [TokenKind]) -> Result<Token<'a>, SyntaxError> {
        self.advance_if_any(kinds)?
            .ok_or_else(|| self.unexpected(Expected::OneOf(kinds)))
    }

    /// Assert that the statement is over, i.e. no tokens remain.
    pub fn finish(&self) -> Result<(), SyntaxError> {
        match self.next {
            Some(_) => Err(self.unexpected(Expected::EndOfStatement)),
            None => Ok(()),
        }
    }

    /// Builds an [`SyntaxError::UnexpectedToken`] for the current lookahead.
    pub fn unexpected(&self, expected: Expected) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            expected,
            found: self.peek_kind(),
            span: self.next.map(|token| token.span),
        }
    }
}
