use std::fmt;

use sjava_resolve::ScopeTree;
use sjava_source::SourceText;
use sjava_syntax::StatementKind;

use crate::depth::{closes_scope, DepthMode, DepthTracker};
use crate::semantic::{verify_statement, StatementContext};
use crate::{CheckError, LineError, Parser, StructureError};

/// Summary of a program that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub lines: usize,
    /// Global variables in declaration order
    pub globals: Vec<String>,
    /// Methods in declaration order
    pub methods: Vec<String>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} global variables, {} methods",
            self.lines,
            self.globals.len(),
            self.methods.len()
        )
    }
}

/// Checks a whole program in two passes.
///
/// The first pass reads only the global scope: it records global variables
/// and method signatures and remembers where each method is declared. The
/// second pass then walks every method body on its own, starting from a
/// fresh copy of the globals with the method's parameters in scope.
///
/// The first error ends the run.
pub struct Interpreter<'a> {
    source: &'a SourceText,
    global: ScopeTree,
    /// Line of each method declaration, in declaration order
    method_lines: Vec<usize>,
}

impl<'a> Interpreter<'a> {
    pub fn new(source: &'a SourceText) -> Self {
        Self {
            source,
            global: ScopeTree::new(),
            method_lines: Vec::new(),
        }
    }

    pub fn interpret(mut self) -> Result<CheckReport, CheckError> {
        log::debug!("Checking {}", self.source.name());
        self.scan_globals()?;
        for ordinal in 0..self.method_lines.len() {
            self.check_method(ordinal)?;
        }

        let root = self.global.scope(self.global.root());
        let report = CheckReport {
            lines: self.source.line_count(),
            globals: root.variables().iter().map(|(name, _)| name.to_string()).collect(),
            methods: root.methods().iter().map(|(name, _)| name.to_string()).collect(),
        };
        log::info!("{} is valid: {}", self.source.name(), report);
        Ok(report)
    }

    fn fail(&self, line: usize, cause: impl Into<LineError>) -> CheckError {
        CheckError::new(self.source, line, cause)
    }

    /// First pass. Only lines at depth zero are parsed; the rest are fed to
    /// the depth tracker so the nesting stays known.
    fn scan_globals(&mut self) -> Result<(), CheckError> {
        let source = self.source;
        let mut tracker = DepthTracker::new(DepthMode::CountOnly);

        for (number, line) in source.lines() {
            if tracker.is_global() {
                if closes_scope(line) {
                    return Err(self.fail(number, StructureError::MismatchedBraces));
                }
                let statement = Parser::new(&mut self.global)
                    .parse(line)
                    .map_err(|error| CheckError::new(source, number, error))?;
                if let Some(kind) = statement {
                    verify_statement(kind, StatementContext::Global)
                        .map_err(|error| CheckError::new(source, number, error))?;
                    if kind == StatementKind::MethodDeclaration {
                        self.method_lines.push(number);
                    }
                }
            }
            tracker
                .accept(line, &mut self.global)
                .map_err(|error| CheckError::new(source, number, error))?;
        }

        if !tracker.is_global() {
            return Err(self.fail(source.line_count(), StructureError::MismatchedBraces));
        }
        log::debug!(
            "Global scope holds {} variables and {} methods",
            self.global.scope(self.global.root()).variables().len(),
            self.method_lines.len()
        );
        Ok(())
    }

    /// Second pass for the method declared `ordinal`-th.
    fn check_method(&self, ordinal: usize) -> Result<(), CheckError> {
        let source = self.source;
        let declaration = self.method_lines[ordinal];
        let (name, method) = self.global.method_at(ordinal).ok_or_else(|| {
            self.fail(
                declaration,
                StructureError::FailedMethodScopeInitialization {
                    method: format!("method #{}", ordinal + 1),
                },
            )
        })?;
        log::debug!("Checking method `{}` declared on line {}", name, declaration);

        let mut scopes = self.global.duplicate();
        let mut tracker = DepthTracker::new(DepthMode::Switching);
        let header = source.line(declaration).unwrap_or_default();
        tracker
            .accept(header, &mut scopes)
            .map_err(|error| self.fail(declaration, error))?;

        let body = scopes.current();
        for (param, symbol) in method.parameters().iter() {
            scopes.add_variable(body, param, *symbol).map_err(|_| {
                self.fail(
                    declaration,
                    StructureError::FailedMethodScopeInitialization {
                        method: name.to_string(),
                    },
                )
            })?;
        }

        // Blank and comment lines do not count as statements here
        let mut previous = None;
        let mut last = None;
        let mut closing_line = None;
        for (number, line) in source.lines_from(declaration + 1) {
            tracker
                .accept(line, &mut scopes)
                .map_err(|error| self.fail(number, error))?;
            let statement = Parser::new(&mut scopes)
                .parse(line)
                .map_err(|error| self.fail(number, error))?;
            if let Some(kind) = statement {
                verify_statement(kind, StatementContext::MethodBody).map_err(|error| self.fail(number, error))?;
                previous = last;
                last = Some(kind);
            }
            if tracker.is_global() {
                closing_line = Some(number);
                break;
            }
        }

        let closing_line =
            closing_line.ok_or_else(|| self.fail(source.line_count(), StructureError::MismatchedBraces))?;
        if previous != Some(StatementKind::Return) || last != Some(StatementKind::CloseScope) {
            return Err(self.fail(
                closing_line,
                StructureError::MissingReturnStatement {
                    method: name.to_string(),
                },
            ));
        }
        log::trace!("Method `{}` ends on line {}", name, closing_line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn run(text: &str) -> Result<CheckReport, CheckError> {
        let source = SourceText::new("test.sjava", text);
        Interpreter::new(&source).interpret()
    }

    fn failure(text: &str) -> (usize, ErrorKind) {
        let error = run(text).unwrap_err();
        (error.line, error.kind())
    }

    #[test]
    fn test_empty_program() {
        let report = run("").unwrap();
        assert_eq!(report.lines, 0);
        assert!(report.globals.is_empty() && report.methods.is_empty());
    }

    #[test]
    fn test_report_lists_declarations_in_order() {
        let report = run("int b = 1;\nvoid z() {\nreturn;\n}\nint a;\nvoid y() {\nreturn;\n}\n").unwrap();
        assert_eq!(report.lines, 8);
        assert_eq!(report.globals, vec!["b", "a"]);
        assert_eq!(report.methods, vec!["z", "y"]);
    }

    #[test]
    fn test_parameters_follow_declaration_order() {
        // `aa` sorts before `zz`, so a name-ordered table would pair the
        // bodies with the wrong parameter lists
        let text = "void zz(String s) {\ns = \"x\";\nreturn;\n}\nvoid aa(int n) {\nn = 3;\nreturn;\n}\n";
        assert!(run(text).is_ok());
    }

    #[test]
    fn test_methods_see_later_globals() {
        let text = "void f() {\ng = 2;\nreturn;\n}\nint g;\n";
        assert!(run(text).is_ok());
    }

    #[test]
    fn test_method_changes_stay_private() {
        let text = "int g;\nvoid f() {\ng = 1;\nreturn;\n}\nvoid h() {\nint x = g;\nreturn;\n}\n";
        assert_eq!(failure(text), (7, ErrorKind::UninitializedVariable));
    }

    #[test]
    fn test_body_only_checked_in_second_pass() {
        // Line 3 is wrong but line 5 fails first in the global pass
        let text = "void f() {\nint a = b;\nreturn;\n}\nreturn;\n";
        assert_eq!(failure(text), (5, ErrorKind::UnexpectedStatementAtScope));
    }

    #[test]
    fn test_brace_errors() {
        assert_eq!(failure("int a;\n}\n"), (2, ErrorKind::MismatchedBraces));
        assert_eq!(
            failure("void f() {\nreturn;\n}\n}\n"),
            (4, ErrorKind::MismatchedBraces)
        );
        assert_eq!(
            failure("void f() {\nif (true) {\nreturn;\n}\n"),
            (4, ErrorKind::MismatchedBraces)
        );
    }

    #[test]
    fn test_return_must_precede_closing_brace() {
        assert_eq!(failure("void f() {\n}\n"), (2, ErrorKind::MissingReturnStatement));
        assert_eq!(
            failure("void f() {\nreturn;\nint a;\n}\n"),
            (4, ErrorKind::MissingReturnStatement)
        );
        assert_eq!(
            failure("void f() {\nif (true) {\nreturn;\n}\n}\n"),
            (5, ErrorKind::MissingReturnStatement)
        );
        assert!(run("void f() {\nreturn;\n\n// done\n}\n").is_ok());
    }

    #[test]
    fn test_nested_block_scopes() {
        let text = "void f(int a) {\nwhile (a) {\nint b = a;\nreturn;\n}\nint b = 2;\nreturn;\n}\n";
        assert!(run(text).is_ok());

        let leaked = "void f(int a) {\nif (a) {\nint b = a;\n}\nb = 2;\nreturn;\n}\n";
        assert_eq!(failure(leaked), (5, ErrorKind::UndeclaredVariable));
    }

    #[test]
    fn test_parameter_shadows_global() {
        let text = "String a = \"g\";\nvoid f(int a) {\nint b = a;\nreturn;\n}\n";
        assert!(run(text).is_ok());
    }

    #[test]
    fn test_method_declared_inside_body() {
        let text = "void f() {\nvoid g() {\nreturn;\n}\nreturn;\n}\n";
        assert_eq!(failure(text), (2, ErrorKind::UnexpectedStatementAtScope));
    }
}
