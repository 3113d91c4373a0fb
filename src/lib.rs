//! Front end for Sunaba, a small indentation-sensitive imperative
//! language: tokenisation with layout (see [`lexer`]) followed by an
//! indentation-aware recursive-descent parser (see [`parser`]) that
//! produces a typed [`parser::ast::Program`].
//!
//! ```
//! let program = sunaba::compile("def add(a, b)\n    a -> b\n").unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::ParseError;
pub use lexer::{tokenise, LineToken, Token};
pub use parser::ast::Program;
pub use parser::parse;

/// Runs the whole front end: [`tokenise`] then [`parse`].
pub fn compile(source: &str) -> Result<Program, ParseError> {
    parse(&tokenise(source)?)
}

/// Serialises tokeniser output to the stable, tag-tagged JSON shape used
/// by golden fixtures (see `SPEC_FULL.md` §6).
pub fn tokens_to_json(tokens: &[LineToken]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tokens)
}

/// Serialises a parsed program to the same stable JSON shape.
pub fn program_to_json(program: &Program) -> serde_json::Result<String> {
    serde_json::to_string_pretty(program)
}
