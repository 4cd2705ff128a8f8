use miette::Diagnostic;
use thiserror::Error;

/// Signals raised by a single [`SymbolTable`](crate::SymbolTable).
///
/// These carry no source location; the checker attaches one when it turns
/// them into user-facing errors.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SymbolError {
    #[error("`{name}` is already declared in this scope")]
    #[diagnostic(code(sjava::resolve::already_declared))]
    AlreadyDeclared { name: String },

    #[error("`{name}` is not declared")]
    #[diagnostic(code(sjava::resolve::not_found))]
    NotFound { name: String },
}
