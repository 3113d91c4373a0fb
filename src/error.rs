use std::{error::Error, fmt::Display};

/// A single diagnostic produced by either stage of the front end.
///
/// Every message is already formatted with its location prefix
/// (`"<column>: ..."` or `"<column> <row>: ..."`) by the stage that raised
/// it, so `ParseError` itself only needs to carry the final string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// `"<column>: <message>"` — used for errors that aren't anchored to a
    /// specific in-line token (indent errors, missing bodies, ...).
    pub fn at_column(column: usize, message: impl Display) -> Self {
        Self(format!("{column}: {message}"))
    }

    /// `"<column> <row>: <message>"` — used for errors anchored to a
    /// specific token.
    pub fn at(column: usize, row: usize, message: impl Display) -> Self {
        Self(format!("{column} {row}: {message}"))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ParseError {}
