use std::path::Path;

use sjava_check::CheckReport;
use sjava_source::SourceText;

use crate::error::{convert_check_error, CliError};

/// Loads and checks one program.
pub fn check_file(path: &Path) -> Result<CheckReport, CliError> {
    let source = SourceText::load(path)?;
    sjava_check::check(&source).map_err(|error| convert_check_error(error, &source))
}
