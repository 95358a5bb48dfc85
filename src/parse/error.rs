use std::fmt;

/// Errors produced when parsing group DSL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    line: usize,
    column: usize,
}

impl ParseError {
    pub(crate) fn at_offset(input: &str, offset: usize, message: impl Into<String>) -> Self {
        let consumed = &input[..offset.min(input.len())];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
            + 1;
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    /// One-based line of the error.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column of the error, in characters.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::at_offset("group \"a\" {\n  bogus", 14, "expected group statement");
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 3);
        assert_eq!(
            err.to_string(),
            "parse error at line 2, column 3: expected group statement"
        );
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let err = ParseError::at_offset("abc", 10, "eof");
        assert_eq!((err.line(), err.column()), (1, 4));
    }
}
