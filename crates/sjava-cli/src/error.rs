use miette::{Diagnostic, NamedSource, SourceSpan};
use sjava_check::CheckError;
use sjava_source::{SourceError, SourceText};
use thiserror::Error;

/// Why a run did not end with a valid program.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error("{path} is not a valid sJava program")]
    #[diagnostic(code(sjava::cli::rejected))]
    Rejected {
        path: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
        #[help]
        help: String,
        #[source]
        source: CheckError,
    },
}

impl CliError {
    /// 1 for an invalid program, 2 when the file could not be read.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Rejected { .. } => 1,
            CliError::Source(_) => 2,
        }
    }
}

/// Attaches the program text to a check failure for rendering.
pub fn convert_check_error(error: CheckError, source: &SourceText) -> CliError {
    CliError::Rejected {
        path: source.name().to_string(),
        src: source.named_source(),
        span: error.span,
        message: error.cause.to_string(),
        help: format!("{} on line {}", error.kind(), error.line),
        source: error,
    }
}
