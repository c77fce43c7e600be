use std::fmt;

/// A position within a delimited source file.
///
/// All indices are 1-based to align with human expectations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcePosition {
    /// Line number in the source (1-based)
    pub line: Option<u64>,
    /// Column (field) number in the source (1-based)
    pub column: Option<u64>,
}

impl SourcePosition {
    /// Position of a whole line.
    #[must_use]
    pub fn line(line: u64) -> Self {
        Self {
            line: Some(line),
            column: None,
        }
    }

    /// Returns a copy pointing at the given 0-based column index.
    #[must_use]
    pub fn with_column_index(mut self, index: usize) -> Self {
        self.column = Some(index as u64 + 1);
        self
    }

    /// Returns true when the position does not contain any location metadata.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.column.is_none()
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "line {line}, column {column}"),
            (Some(line), None) => write!(f, "line {line}"),
            (None, Some(column)) => write!(f, "column {column}"),
            (None, None) => write!(f, "unknown position"),
        }
    }
}
