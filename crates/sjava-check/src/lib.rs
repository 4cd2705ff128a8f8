//! Static checking of sJava programs.
//!
//! [`Interpreter`] drives the check over a [`SourceText`] in two passes, using
//! a [`Parser`] per line, the [`semantic`] rule tables and a
//! [`DepthTracker`] to follow block nesting. The first problem found is
//! returned as a [`CheckError`] carrying its line number.
//!
//! ```
//! use sjava_check::{check, ErrorKind};
//! use sjava_source::SourceText;
//!
//! let valid = SourceText::new("ok.sjava", "int a = 1;\nvoid f(int b) {\na = b;\nreturn;\n}\n");
//! assert!(check(&valid).is_ok());
//!
//! let invalid = SourceText::new("bad.sjava", "final int a = 1;\na = 2;\n");
//! let error = check(&invalid).unwrap_err();
//! assert_eq!((error.line, error.kind()), (2, ErrorKind::CannotAssignFinal));
//! ```

mod depth;
mod error;
mod interpreter;
mod parser;
pub mod semantic;

pub use depth::{closes_scope, opens_scope, DepthChange, DepthMode, DepthTracker};
pub use error::{CheckError, ErrorKind, LineError, SemanticError, StructureError};
pub use interpreter::{CheckReport, Interpreter};
pub use parser::Parser;
pub use semantic::{SemanticAnalyzer, StatementContext};

use sjava_source::SourceText;

/// Checks a whole program.
pub fn check(source: &SourceText) -> Result<CheckReport, CheckError> {
    Interpreter::new(source).interpret()
}
