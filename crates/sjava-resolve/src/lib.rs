//! Symbol management for sJava.
//!
//! Variables and routines are recorded in ordered [`SymbolTable`]s. Every
//! block gets its own [`Scope`] inside a [`ScopeTree`], and lookups walk
//! outward from the innermost scope so inner declarations shadow outer ones.

mod error;
mod scope;
mod symbol;

pub use error::SymbolError;
pub use scope::{Scope, ScopeId, ScopeTree};
pub use symbol::{MethodSymbol, SymbolTable, VariableSymbol};
