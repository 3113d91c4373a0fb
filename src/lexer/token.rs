use serde::{Deserialize, Serialize};

/// One of the binary/comparison operators the tokeniser can emit.
///
/// Shared between `Token::Operator` and `ast::Binary` — a binary
/// expression node's operator is just whatever operator token stood
/// between its two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorKind {
    Plus,
    Minus,
    Times,
    Divide,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl OperatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Plus => "+",
            OperatorKind::Minus => "-",
            OperatorKind::Times => "*",
            OperatorKind::Divide => "/",
            OperatorKind::Equal => "=",
            OperatorKind::NotEqual => "!=",
            OperatorKind::GreaterThan => ">",
            OperatorKind::GreaterOrEqual => ">=",
            OperatorKind::LessThan => "<",
            OperatorKind::LessOrEqual => "<=",
        }
    }
}

/// A single lexical token together with its in-line `row` (the 1-based
/// codepoint-unit offset at which it starts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Token {
    Identifier { value: String, row: usize },
    Memory { row: usize },
    If { row: usize },
    While { row: usize },
    Def { row: usize },
    Const { row: usize },
    NumericLiteral { value: String, row: usize },
    Operator { value: OperatorKind, row: usize },
    Assignment { row: usize },
    Separator { row: usize },
    ParentheseStart { row: usize },
    ParentheseEnd { row: usize },
    BracketStart { row: usize },
    BracketEnd { row: usize },
}

impl Token {
    pub fn row(&self) -> usize {
        match self {
            Token::Identifier { row, .. }
            | Token::Memory { row }
            | Token::If { row }
            | Token::While { row }
            | Token::Def { row }
            | Token::Const { row }
            | Token::NumericLiteral { row, .. }
            | Token::Operator { row, .. }
            | Token::Assignment { row }
            | Token::Separator { row }
            | Token::ParentheseStart { row }
            | Token::ParentheseEnd { row }
            | Token::BracketStart { row }
            | Token::BracketEnd { row } => *row,
        }
    }

    /// A short, human-readable description used in syntax error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Identifier { .. } => "an identifier",
            Token::Memory { .. } => "`memory`",
            Token::If { .. } => "`if`",
            Token::While { .. } => "`while`",
            Token::Def { .. } => "`def`",
            Token::Const { .. } => "`const`",
            Token::NumericLiteral { .. } => "a numeric literal",
            Token::Operator { .. } => "an operator",
            Token::Assignment { .. } => "`->`",
            Token::Separator { .. } => "`,`",
            Token::ParentheseStart { .. } => "`(`",
            Token::ParentheseEnd { .. } => "`)`",
            Token::BracketStart { .. } => "`[`",
            Token::BracketEnd { .. } => "`]`",
        }
    }
}

/// All tokens belonging to a single non-blank, non-comment-only source
/// line, together with the line's 1-based `column` and its `indent`
/// level (an index into the tokeniser's indent stack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineToken {
    pub column: usize,
    pub indent: usize,
    pub tokens: Vec<Token>,
}

fn keyword_for(word: &str) -> Option<fn(usize) -> Token> {
    match word {
        "memory" => Some(|row| Token::Memory { row }),
        "if" => Some(|row| Token::If { row }),
        "while" => Some(|row| Token::While { row }),
        "def" => Some(|row| Token::Def { row }),
        "const" => Some(|row| Token::Const { row }),
        _ => None,
    }
}

/// Builds an `Identifier` token, or the matching keyword token if `word`
/// is a reserved name.
pub fn identifier_or_keyword(word: String, row: usize) -> Token {
    match keyword_for(&word) {
        Some(make) => make(row),
        None => Token::Identifier { value: word, row },
    }
}
