//! Source text management for the sJava checker.
//!
//! The checker walks its input twice: once to collect global declarations and
//! routine locations, and once per routine to validate the body. Instead of
//! rewinding a file stream for every pass, the whole file is loaded into a
//! [`SourceText`] that indexes its lines up front and hands out any line by
//! its 1-based number.
//!
//! ## Diagnostics
//!
//! [`SourceText::line_span`] maps a line number back to a byte span of the
//! original text and [`SourceText::named_source`] packages the text for miette,
//! so errors raised by later stages can be rendered against the file.

mod error;
mod file;

pub use error::SourceError;
pub use file::SourceText;
