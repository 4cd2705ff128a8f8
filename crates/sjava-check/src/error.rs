use std::fmt;

use miette::{Diagnostic, SourceSpan};
use sjava_source::SourceText;
use sjava_syntax::{StatementKind, SyntaxError, TokenKind, VarType};
use thiserror::Error;

use crate::semantic::StatementContext;

/// Violations of declaration, initialization, finality, typing and statement
/// placement rules. Spans are relative to the start of the line.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Variable `{name}` is not declared")]
    #[diagnostic(code(sjava::semantic::undeclared_variable))]
    UndeclaredVariable {
        name: String,
        #[label("not found in any enclosing scope")]
        span: SourceSpan,
    },

    #[error("Method `{name}` is not declared")]
    #[diagnostic(
        code(sjava::semantic::undeclared_method),
        help("Methods must be declared in the global scope")
    )]
    UndeclaredMethod {
        name: String,
        #[label("called here")]
        span: SourceSpan,
    },

    #[error("Variable `{name}` is used before it is initialized")]
    #[diagnostic(code(sjava::semantic::uninitialized_variable))]
    UninitializedVariable {
        name: String,
        #[label("has no value yet")]
        span: SourceSpan,
    },

    #[error("Variable `{name}` of type {found} cannot be used where {expected} is expected")]
    #[diagnostic(code(sjava::semantic::contravariant_type))]
    ContravariantType {
        name: String,
        found: VarType,
        expected: VarType,
        #[label("this is {found}")]
        span: SourceSpan,
    },

    #[error("Cannot assign {found} to a variable of type {expected}")]
    #[diagnostic(code(sjava::semantic::invalid_assignment_token))]
    InvalidAssignmentToken {
        found: TokenKind,
        expected: VarType,
        #[label("not a valid {expected} value")]
        span: SourceSpan,
    },

    #[error("Cannot assign to final variable `{name}`")]
    #[diagnostic(code(sjava::semantic::cannot_assign_final))]
    CannotAssignFinal {
        name: String,
        #[label("declared final")]
        span: SourceSpan,
    },

    #[error("Variable `{name}` is already declared in this block")]
    #[diagnostic(code(sjava::semantic::variable_already_declared))]
    VariableAlreadyDeclared {
        name: String,
        #[label("declared again here")]
        span: SourceSpan,
    },

    #[error("Method `{name}` is already declared")]
    #[diagnostic(code(sjava::semantic::method_already_declared))]
    MethodAlreadyDeclared {
        name: String,
        #[label("declared again here")]
        span: SourceSpan,
    },

    #[error("Parameter `{name}` appears twice")]
    #[diagnostic(code(sjava::semantic::duplicate_parameter))]
    DuplicateParameter {
        name: String,
        #[label("second parameter with this name")]
        span: SourceSpan,
    },

    #[error("Parameter is missing its type")]
    #[diagnostic(
        code(sjava::semantic::missing_parameter_type),
        help("Parameters are written `[final] <type> <name>`")
    )]
    MissingParameterType {
        #[label("expected a type here")]
        span: Option<SourceSpan>,
    },

    #[error("Statement not allowed {context}: {statement}")]
    #[diagnostic(code(sjava::semantic::unexpected_statement))]
    UnexpectedStatementAtScope {
        statement: StatementKind,
        context: StatementContext,
    },
}

impl SemanticError {
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            SemanticError::UndeclaredVariable { span, .. }
            | SemanticError::UndeclaredMethod { span, .. }
            | SemanticError::UninitializedVariable { span, .. }
            | SemanticError::ContravariantType { span, .. }
            | SemanticError::InvalidAssignmentToken { span, .. }
            | SemanticError::CannotAssignFinal { span, .. }
            | SemanticError::VariableAlreadyDeclared { span, .. }
            | SemanticError::MethodAlreadyDeclared { span, .. }
            | SemanticError::DuplicateParameter { span, .. } => Some(*span),
            SemanticError::MissingParameterType { span } => *span,
            SemanticError::UnexpectedStatementAtScope { .. } => None,
        }
    }
}

/// Errors about the block structure of a whole program rather than the
/// contents of one statement.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum StructureError {
    #[error("Mismatched braces")]
    #[diagnostic(
        code(sjava::structure::mismatched_braces),
        help("Every line opening a block needs exactly one matching closing brace line")
    )]
    MismatchedBraces,

    #[error("Could not bring the parameters of `{method}` into scope")]
    #[diagnostic(code(sjava::structure::failed_method_scope_initialization))]
    FailedMethodScopeInitialization { method: String },

    #[error("Method `{method}` must end with `return;` right before its closing brace")]
    #[diagnostic(code(sjava::structure::missing_return))]
    MissingReturnStatement { method: String },
}

/// Any error that can be attributed to a single line.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum LineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] StructureError),
}

impl LineError {
    /// Line-relative span of the offending token, if the error has one.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            LineError::Syntax(SyntaxError::UnknownToken { span, .. })
            | LineError::Syntax(SyntaxError::UnknownStatement { span, .. }) => Some(*span),
            LineError::Syntax(SyntaxError::UnexpectedToken { span, .. }) => *span,
            LineError::Semantic(error) => error.span(),
            LineError::Structure(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LineError::Syntax(SyntaxError::UnknownToken { .. }) => ErrorKind::UnknownToken,
            LineError::Syntax(SyntaxError::UnknownStatement { .. }) => ErrorKind::UnknownStatement,
            LineError::Syntax(SyntaxError::UnexpectedToken { .. }) => ErrorKind::UnexpectedToken,
            LineError::Semantic(error) => match error {
                SemanticError::UndeclaredVariable { .. } | SemanticError::UndeclaredMethod { .. } => {
                    ErrorKind::UndeclaredVariable
                }
                SemanticError::UninitializedVariable { .. } => ErrorKind::UninitializedVariable,
                SemanticError::ContravariantType { .. } => ErrorKind::ContravariantType,
                SemanticError::InvalidAssignmentToken { .. } => ErrorKind::InvalidAssignmentToken,
                SemanticError::CannotAssignFinal { .. } => ErrorKind::CannotAssignFinal,
                SemanticError::VariableAlreadyDeclared { .. } => ErrorKind::VariableAlreadyDeclared,
                SemanticError::MethodAlreadyDeclared { .. } => ErrorKind::MethodAlreadyDeclared,
                SemanticError::DuplicateParameter { .. } | SemanticError::MissingParameterType { .. } => {
                    ErrorKind::InvalidParameterDefinition
                }
                SemanticError::UnexpectedStatementAtScope { .. } => ErrorKind::UnexpectedStatementAtScope,
            },
            LineError::Structure(error) => match error {
                StructureError::MismatchedBraces => ErrorKind::MismatchedBraces,
                StructureError::FailedMethodScopeInitialization { .. } => {
                    ErrorKind::FailedMethodScopeInitialization
                }
                StructureError::MissingReturnStatement { .. } => ErrorKind::MissingReturnStatement,
            },
        }
    }
}

/// The category of a rejected program, independent of message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownToken,
    UnknownStatement,
    MismatchedBraces,
    UnexpectedToken,
    VariableAlreadyDeclared,
    MethodAlreadyDeclared,
    InvalidParameterDefinition,
    UndeclaredVariable,
    UninitializedVariable,
    ContravariantType,
    InvalidAssignmentToken,
    CannotAssignFinal,
    UnexpectedStatementAtScope,
    FailedMethodScopeInitialization,
    MissingReturnStatement,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The first error found in a program, with the line it was found on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Line {line}: {cause}")]
pub struct CheckError {
    /// 1-based line number
    pub line: usize,
    /// Span within the whole source: the offending token if known, else the line
    pub span: SourceSpan,
    #[source]
    pub cause: LineError,
}

impl CheckError {
    pub fn new(source: &SourceText, line: usize, cause: impl Into<LineError>) -> Self {
        let cause = cause.into();
        let line_span = source
            .line_span(line)
            .unwrap_or_else(|| SourceSpan::new(source.text().len().into(), 0));
        let span = match cause.span() {
            Some(token) => SourceSpan::new((line_span.offset() + token.offset()).into(), token.len()),
            None => line_span,
        };
        Self { line, span, cause }
    }

    pub fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }
}
