use std::path::PathBuf;
use thiserror::Error;
use miette::Diagnostic;

/// Errors that can occur when loading a source file
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    /// The file could not be opened or read as UTF-8 text
    #[error("Failed to read source file {}", path.display())]
    #[diagnostic(
        code(sjava::source::io),
        help("Make sure the path exists, has proper permissions and contains UTF-8 text")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
