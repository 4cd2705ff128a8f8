use sjava_resolve::{MethodSymbol, ScopeId, ScopeTree, VariableSymbol};
use sjava_syntax::{classify, validate_method_name, Cursor, Expected, StatementKind, Token, TokenKind, VarType};

use crate::semantic::{identifier, require_non_final, verify_assignment_token, SemanticAnalyzer, VALUE_KINDS};
use crate::{LineError, SemanticError};

type ParseResult<T> = Result<T, LineError>;

/// Parses and validates a single line against the scope that is current
/// when the parser is created.
///
/// Declarations are recorded in that scope as a side effect, and assignments
/// mark their target initialized. A parser handles exactly one line.
pub struct Parser<'s> {
    scopes: &'s mut ScopeTree,
    scope: ScopeId,
}

impl<'s> Parser<'s> {
    pub fn new(scopes: &'s mut ScopeTree) -> Self {
        let scope = scopes.current();
        Self { scopes, scope }
    }

    /// Returns the kind of statement on the line, or `None` for a blank or
    /// comment line.
    pub fn parse(self, line: &str) -> ParseResult<Option<StatementKind>> {
        let cursor = Cursor::new(line)?;
        let Some(first) = cursor.current().copied() else {
            return Ok(None);
        };
        let kind = classify(&first, cursor.peek())?;
        log::trace!("Parsing {} in scope {:?}: {}", kind, self.scope, line.trim());

        let mut statement = StatementParser {
            scopes: self.scopes,
            scope: self.scope,
            cursor,
            first,
        };
        statement.parse(kind)?;
        Ok(Some(kind))
    }
}

/// Grammar rules for one line. `first` is the token the line was
/// classified by; the cursor starts with it as the current token.
struct StatementParser<'s, 'a> {
    scopes: &'s mut ScopeTree,
    scope: ScopeId,
    cursor: Cursor<'a>,
    first: Token<'a>,
}

impl<'s, 'a> StatementParser<'s, 'a> {
    fn parse(&mut self, kind: StatementKind) -> ParseResult<()> {
        match kind {
            StatementKind::VariableDeclaration => self.parse_variable_declaration()?,
            StatementKind::Return => {
                self.cursor.expect(TokenKind::Semicolon)?;
            }
            StatementKind::Conditional => self.parse_conditional()?,
            StatementKind::MethodDeclaration => self.parse_method_declaration()?,
            StatementKind::Assignment => self.parse_assignment()?,
            StatementKind::MethodCall => self.parse_method_call()?,
            StatementKind::CloseScope => {}
        }
        self.cursor.finish()?;
        Ok(())
    }

    fn analyzer(&self) -> SemanticAnalyzer<'_> {
        SemanticAnalyzer::new(&*self.scopes, self.scope)
    }

    /// Consumes a value that may be assigned to a variable of type `ty`. An
    /// identifier must name a declared, initialized, covariant variable.
    fn expect_value(&mut self, ty: VarType) -> ParseResult<Token<'a>> {
        let token = match self.cursor.peek() {
            Some(token) if VALUE_KINDS.contains(&token.kind) => *token,
            _ => return Err(self.cursor.unexpected(Expected::Value).into()),
        };
        verify_assignment_token(ty, &token)?;
        self.cursor.expect(token.kind)?;
        if token.kind == TokenKind::Identifier {
            self.analyzer().verify_variable_usage(ty, &token)?;
        }
        Ok(token)
    }

    //--------------------------------------------------------------------------
    // [final] <type> <id> [= <value>] ("," <id> [= <value>])* ";"
    // A final declaration requires every initializer.
    //--------------------------------------------------------------------------

    fn parse_variable_declaration(&mut self) -> ParseResult<()> {
        let is_final = self.first.kind == TokenKind::Final;
        let type_token = if is_final {
            self.cursor.expect_one_of(TokenKind::TYPE_KEYWORDS)?
        } else {
            self.first
        };
        let ty = VarType::from_keyword(type_token.kind)
            .ok_or_else(|| self.cursor.unexpected(Expected::OneOf(TokenKind::TYPE_KEYWORDS)))?;

        loop {
            let name = self.cursor.expect(TokenKind::Identifier)?;
            let is_initialized = if is_final {
                self.cursor.expect(TokenKind::Assign)?;
                true
            } else {
                self.cursor.advance_if(TokenKind::Assign)?
            };
            // The initializer is checked before the name exists, so `int a = a;`
            // never sees itself.
            if is_initialized {
                self.expect_value(ty)?;
            }
            self.declare_variable(&name, VariableSymbol::new(ty, is_final, is_initialized))?;

            if !self.cursor.advance_if(TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    fn declare_variable(&mut self, name: &Token<'a>, symbol: VariableSymbol) -> ParseResult<()> {
        self.scopes
            .add_variable(self.scope, identifier(name), symbol)
            .map_err(|_| SemanticError::VariableAlreadyDeclared {
                name: identifier(name).to_string(),
                span: name.span,
            })?;
        Ok(())
    }

    //--------------------------------------------------------------------------
    // <id> "=" <value> ";"
    //--------------------------------------------------------------------------

    fn parse_assignment(&mut self) -> ParseResult<()> {
        let target = self.first;
        let symbol = self.analyzer().declared_variable(&target)?;
        self.cursor.expect(TokenKind::Assign)?;
        require_non_final(&target, &symbol)?;
        self.expect_value(symbol.ty())?;
        self.cursor.expect(TokenKind::Semicolon)?;

        if let Ok(symbol) = self.scopes.lookup_variable_mut(self.scope, identifier(&target)) {
            symbol.mark_initialized();
        }
        Ok(())
    }

    //--------------------------------------------------------------------------
    // ("if" | "while") "(" <value> (("&&" | "||") <value>)* ")" "{"
    // Every operand is checked, there is no short-circuiting.
    //--------------------------------------------------------------------------

    fn parse_conditional(&mut self) -> ParseResult<()> {
        self.cursor.expect(TokenKind::LParen)?;
        loop {
            self.expect_value(VarType::Boolean)?;
            if self.cursor.advance_if_any(&[TokenKind::And, TokenKind::Or])?.is_none() {
                break;
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::LBrace)?;
        Ok(())
    }

    //--------------------------------------------------------------------------
    // "void" <id> "(" [<param> ("," <param>)*] ")" "{"
    // <param> ::= ["final"] <type> <id>
    //--------------------------------------------------------------------------

    fn parse_method_declaration(&mut self) -> ParseResult<()> {
        let name = self.cursor.expect(TokenKind::Identifier)?;
        validate_method_name(&name)?;
        self.cursor.expect(TokenKind::LParen)?;

        let mut method = MethodSymbol::new();
        if !self.cursor.advance_if(TokenKind::RParen)? {
            loop {
                self.parse_parameter(&mut method)?;
                if !self.cursor.advance_if(TokenKind::Comma)? {
                    break;
                }
            }
            self.cursor.expect(TokenKind::RParen)?;
        }
        self.cursor.expect(TokenKind::LBrace)?;

        self.scopes
            .add_method(self.scope, identifier(&name), method)
            .map_err(|_| SemanticError::MethodAlreadyDeclared {
                name: identifier(&name).to_string(),
                span: name.span,
            })?;
        Ok(())
    }

    fn parse_parameter(&mut self, method: &mut MethodSymbol) -> ParseResult<()> {
        let is_final = self.cursor.advance_if(TokenKind::Final)?;
        let ty = self
            .cursor
            .advance_if_any(TokenKind::TYPE_KEYWORDS)?
            .and_then(|token| VarType::from_keyword(token.kind))
            .ok_or_else(|| SemanticError::MissingParameterType {
                span: self.cursor.peek().map(|token| token.span),
            })?;
        let name = self.cursor.expect(TokenKind::Identifier)?;

        method
            .add_parameter(identifier(&name), VariableSymbol::parameter(ty, is_final))
            .map_err(|_| SemanticError::DuplicateParameter {
                name: identifier(&name).to_string(),
                span: name.span,
            })?;
        Ok(())
    }

    //--------------------------------------------------------------------------
    // <id> "(" [<value> ("," <value>)*] ")" ";"
    // Arguments are matched by position against the declared parameters.
    //--------------------------------------------------------------------------

    fn parse_method_call(&mut self) -> ParseResult<()> {
        let name = self.first;
        let params = self
            .scopes
            .lookup_method(self.scope, identifier(&name))
            .map(MethodSymbol::parameter_types)
            .map_err(|_| SemanticError::UndeclaredMethod {
                name: identifier(&name).to_string(),
                span: name.span,
            })?;

        self.cursor.expect(TokenKind::LParen)?;
        for (position, ty) in params.into_iter().enumerate() {
            if position > 0 {
                self.cursor.expect(TokenKind::Comma)?;
            }
            self.expect_value(ty)?;
        }
        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }
}
