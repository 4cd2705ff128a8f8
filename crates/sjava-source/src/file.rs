use std::ops::Range;
use std::path::Path;

use miette::{NamedSource, SourceSpan};

use crate::SourceError;

/// The full text of one input file, indexed by line.
///
/// Line numbers are 1-based throughout. Both `\n` and `\r\n` terminators are
/// accepted and stripped, and a trailing terminator does not produce an extra
/// empty line.
///
/// # Example
///
/// ```
/// use sjava_source::SourceText;
///
/// let source = SourceText::new("main.sjava", "int a = 5;\nvoid f() {\n");
/// assert_eq!(source.line_count(), 2);
/// assert_eq!(source.line(2), Some("void f() {"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    /// Display name of the source, usually its path
    name: String,
    /// Raw contents
    text: String,
    /// Byte range of every line, terminator excluded
    lines: Vec<Range<usize>>,
}

impl SourceText {
    /// Builds a source buffer from text already in memory.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = index_lines(&text);
        Self {
            name: name.into(),
            text,
            lines,
        }
    }

    /// Reads a whole file into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::new(path.display().to_string(), text);
        log::debug!("Loaded {} ({} lines)", source.name, source.line_count());
        Ok(source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the text of line `number`, or `None` past the end of input.
    pub fn line(&self, number: usize) -> Option<&str> {
        let range = self.lines.get(number.checked_sub(1)?)?;
        Some(&self.text[range.clone()])
    }

    /// Byte span of line `number` within the whole text.
    pub fn line_span(&self, number: usize) -> Option<SourceSpan> {
        let range = self.lines.get(number.checked_sub(1)?)?;
        Some(SourceSpan::new(range.start.into(), range.len()))
    }

    /// Iterates over `(line number, text)` pairs from the first line.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines_from(1)
    }

    /// Iterates over `(line number, text)` pairs starting at line `number`.
    pub fn lines_from(&self, number: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .skip(number.saturating_sub(1))
            .map(move |(index, range)| (index + 1, &self.text[range.clone()]))
    }

    /// Packages the text for miette's source rendering.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.text.clone())
    }
}

fn index_lines(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for (offset, byte) in bytes.iter().enumerate() {
        if *byte == b'\n' {
            let end = if offset > start && bytes[offset - 1] == b'\r' {
                offset - 1
            } else {
                offset
            };
            lines.push(start..end);
            start = offset + 1;
        }
    }
    if start < bytes.len() {
        lines.push(start..bytes.len());
    }

    lines
}
