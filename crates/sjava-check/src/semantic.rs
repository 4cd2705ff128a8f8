//! Rule tables of the language and the scope-aware checks built on them.

use std::fmt;

use sjava_resolve::{ScopeId, ScopeTree, VariableSymbol};
use sjava_syntax::{StatementKind, Token, TokenKind, VarType};

use crate::SemanticError;

/// Token kinds that can stand in a value position.
pub const VALUE_KINDS: &[TokenKind] = &[
    TokenKind::IntLiteral,
    TokenKind::DoubleLiteral,
    TokenKind::StringLiteral,
    TokenKind::CharLiteral,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Identifier,
];

/// Token kinds that may be assigned to a variable of type `ty`.
/// An identifier is always allowed and checked against [`covariant_types`].
pub fn assignable_kinds(ty: VarType) -> &'static [TokenKind] {
    match ty {
        VarType::Int => &[TokenKind::IntLiteral, TokenKind::Identifier],
        VarType::Double => &[TokenKind::IntLiteral, TokenKind::DoubleLiteral, TokenKind::Identifier],
        VarType::Boolean => &[
            TokenKind::IntLiteral,
            TokenKind::DoubleLiteral,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Identifier,
        ],
        VarType::Char => &[TokenKind::CharLiteral, TokenKind::Identifier],
        VarType::String => &[TokenKind::StringLiteral, TokenKind::Identifier],
    }
}

/// Variable types whose values may flow into a variable of type `ty`.
pub fn covariant_types(ty: VarType) -> &'static [VarType] {
    match ty {
        VarType::Int => &[VarType::Int],
        VarType::Double => &[VarType::Int, VarType::Double],
        VarType::Boolean => &[VarType::Int, VarType::Double, VarType::Boolean],
        VarType::Char => &[VarType::Char],
        VarType::String => &[VarType::String],
    }
}

/// Where a statement appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementContext {
    Global,
    MethodBody,
}

impl StatementContext {
    pub fn allowed(self) -> &'static [StatementKind] {
        match self {
            StatementContext::Global => &[
                StatementKind::MethodDeclaration,
                StatementKind::VariableDeclaration,
                StatementKind::Assignment,
            ],
            StatementContext::MethodBody => &[
                StatementKind::VariableDeclaration,
                StatementKind::Conditional,
                StatementKind::Assignment,
                StatementKind::Return,
                StatementKind::MethodCall,
                StatementKind::CloseScope,
            ],
        }
    }
}

impl fmt::Display for StatementContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementContext::Global => f.write_str("in the global scope"),
            StatementContext::MethodBody => f.write_str("inside a method body"),
        }
    }
}

/// Rejects statement kinds that may not appear in `context`.
pub fn verify_statement(statement: StatementKind, context: StatementContext) -> Result<(), SemanticError> {
    if context.allowed().contains(&statement) {
        Ok(())
    } else {
        Err(SemanticError::UnexpectedStatementAtScope { statement, context })
    }
}

/// Checks that a value token's kind fits a variable of type `ty`.
pub fn verify_assignment_token(ty: VarType, token: &Token<'_>) -> Result<(), SemanticError> {
    if assignable_kinds(ty).contains(&token.kind) {
        Ok(())
    } else {
        Err(SemanticError::InvalidAssignmentToken {
            found: token.kind,
            expected: ty,
            span: token.span,
        })
    }
}

/// Rejects assignment to a final variable.
pub fn require_non_final(name: &Token<'_>, symbol: &VariableSymbol) -> Result<(), SemanticError> {
    if symbol.is_final() {
        Err(SemanticError::CannotAssignFinal {
            name: identifier(name).to_string(),
            span: name.span,
        })
    } else {
        Ok(())
    }
}

pub(crate) fn identifier<'a>(token: &Token<'a>) -> &'a str {
    token.value.unwrap_or_default()
}

/// Checks that need to see the declarations visible from one scope.
#[derive(Debug, Clone, Copy)]
pub struct SemanticAnalyzer<'s> {
    scopes: &'s ScopeTree,
    scope: ScopeId,
}

impl<'s> SemanticAnalyzer<'s> {
    pub fn new(scopes: &'s ScopeTree, scope: ScopeId) -> Self {
        Self { scopes, scope }
    }

    /// The variable named by `name`, if it is visible.
    pub fn declared_variable(&self, name: &Token<'_>) -> Result<VariableSymbol, SemanticError> {
        self.scopes
            .lookup_variable(self.scope, identifier(name))
            .copied()
            .map_err(|_| SemanticError::UndeclaredVariable {
                name: identifier(name).to_string(),
                span: name.span,
            })
    }

    /// Validates reading the variable `name` where a value of type `expected`
    /// is needed: it must be declared, then initialized, then of a covariant
    /// type.
    pub fn verify_variable_usage(&self, expected: VarType, name: &Token<'_>) -> Result<(), SemanticError> {
        let symbol = self.declared_variable(name)?;
        if !symbol.is_initialized() {
            return Err(SemanticError::UninitializedVariable {
                name: identifier(name).to_string(),
                span: name.span,
            });
        }
        if !covariant_types(expected).contains(&symbol.ty()) {
            return Err(SemanticError::ContravariantType {
                name: identifier(name).to_string(),
                found: symbol.ty(),
                expected,
                span: name.span,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sjava_syntax::Lexer;

    fn token(text: &str) -> Token<'_> {
        Lexer::new(text).next().unwrap().unwrap()
    }

    #[test]
    fn test_literal_kinds() {
        let accepted = [
            (VarType::Int, "5"),
            (VarType::Int, "-3"),
            (VarType::Double, "5"),
            (VarType::Double, "2.5"),
            (VarType::Boolean, "true"),
            (VarType::Boolean, "false"),
            (VarType::Boolean, "-7"),
            (VarType::Boolean, "7.2"),
            (VarType::Char, "'c'"),
            (VarType::String, "\"hi\""),
        ];
        for (ty, text) in accepted {
            assert!(verify_assignment_token(ty, &token(text)).is_ok(), "{} <- {}", ty, text);
        }

        let rejected = [
            (VarType::Int, "2.5"),
            (VarType::Int, "true"),
            (VarType::Double, "'c'"),
            (VarType::Boolean, "'a'"),
            (VarType::Boolean, "\"true\""),
            (VarType::Char, "\"c\""),
            (VarType::Char, "5"),
            (VarType::String, "'s'"),
            (VarType::String, "5"),
        ];
        for (ty, text) in rejected {
            assert!(
                matches!(
                    verify_assignment_token(ty, &token(text)),
                    Err(SemanticError::InvalidAssignmentToken { .. })
                ),
                "{} <- {}",
                ty,
                text
            );
        }
    }

    #[test]
    fn test_covariance_is_widening_only() {
        assert!(covariant_types(VarType::Boolean).contains(&VarType::Int));
        assert!(covariant_types(VarType::Boolean).contains(&VarType::Double));
        assert!(!covariant_types(VarType::Int).contains(&VarType::Double));
        assert!(!covariant_types(VarType::Double).contains(&VarType::Boolean));
        assert_eq!(covariant_types(VarType::Char), &[VarType::Char]);
        assert_eq!(covariant_types(VarType::String), &[VarType::String]);
    }

    #[test]
    fn test_statement_placement() {
        use StatementKind::*;

        for kind in [MethodDeclaration, VariableDeclaration, Assignment] {
            assert!(verify_statement(kind, StatementContext::Global).is_ok());
        }
        for kind in [Conditional, Return, MethodCall, CloseScope] {
            assert!(verify_statement(kind, StatementContext::Global).is_err());
        }
        for kind in [VariableDeclaration, Conditional, Assignment, Return, MethodCall, CloseScope] {
            assert!(verify_statement(kind, StatementContext::MethodBody).is_ok());
        }
        assert_eq!(
            verify_statement(MethodDeclaration, StatementContext::MethodBody),
            Err(SemanticError::UnexpectedStatementAtScope {
                statement: MethodDeclaration,
                context: StatementContext::MethodBody,
            })
        );
    }

    #[test]
    fn test_variable_usage_order_of_checks() {
        let mut scopes = ScopeTree::new();
        let root = scopes.root();
        scopes
            .add_variable(root, "fresh", VariableSymbol::uninitialized(VarType::String))
            .unwrap();
        scopes
            .add_variable(root, "ready", VariableSymbol::initialized(VarType::String))
            .unwrap();
        let analyzer = SemanticAnalyzer::new(&scopes, root);

        assert!(matches!(
            analyzer.verify_variable_usage(VarType::Int, &token("missing")),
            Err(SemanticError::UndeclaredVariable { .. })
        ));
        // Uninitialized wins over the type mismatch
        assert!(matches!(
            analyzer.verify_variable_usage(VarType::Int, &token("fresh")),
            Err(SemanticError::UninitializedVariable { .. })
        ));
        assert!(matches!(
            analyzer.verify_variable_usage(VarType::Int, &token("ready")),
            Err(SemanticError::ContravariantType {
                found: VarType::String,
                expected: VarType::Int,
                ..
            })
        ));
        assert!(analyzer.verify_variable_usage(VarType::String, &token("ready")).is_ok());
    }

    #[test]
    fn test_require_non_final() {
        let name = token("x");
        assert!(require_non_final(&name, &VariableSymbol::initialized(VarType::Int)).is_ok());
        assert!(matches!(
            require_non_final(&name, &VariableSymbol::new(VarType::Int, true, false)),
            Err(SemanticError::CannotAssignFinal { name, .. }) if name == "x"
        ));
    }
}
