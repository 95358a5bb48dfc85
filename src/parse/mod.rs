mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::ParsedCatalog;

/// Parse DSL text into a [`ParsedCatalog`].
///
/// # Errors
///
/// Returns [`ParseError`] with the line and column of the first syntax error.
pub fn parse(input: &str) -> Result<ParsedCatalog, ParseError> {
    use winnow::Parser;
    grammar::parse_catalog
        .parse(input)
        .map_err(|e| ParseError::at_offset(input, e.offset(), e.inner().to_string()))
}
