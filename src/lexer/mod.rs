//! Tokenisation with layout: turns source text into [`LineToken`]s,
//! tracking per-line indentation and per-character column (here called
//! `row`, following the data model in `SPEC_FULL.md`) offsets.

mod token;

pub use token::{identifier_or_keyword, LineToken, OperatorKind, Token};

use crate::error::ParseError;
use log::trace;

/// Width (in UTF-16-ish codepoint units) that `ch` advances `row` by.
/// Non-BMP codepoints are encoded as a surrogate pair in the reference
/// implementation's host language, so they occupy two units; everything
/// else occupies one.
fn width(ch: char) -> usize {
    if (ch as u32) > 0xFFFF {
        2
    } else {
        1
    }
}

/// An identifier character per §4.1: ASCII letters/digits, `_ @ $ ? '`,
/// or any codepoint at or beyond U+0100.
fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(ch, '_' | '@' | '$' | '?' | '\'')
        || (ch as u32) >= 0x100
}

/// Tokenises `source` into a finite sequence of [`LineToken`]s, one per
/// non-blank, non-comment-only line.
pub fn tokenise(source: &str) -> Result<Vec<LineToken>, ParseError> {
    let mut indent_stack: Vec<usize> = vec![0];
    let mut comment_depth: u32 = 0;
    let mut out = Vec::new();

    let raw_lines: Vec<&str> = source.split('\n').collect();
    let total_lines = raw_lines.len();

    for (idx, raw_line) in raw_lines.iter().enumerate() {
        let column = idx + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        let tokens = tokenise_line(line, column, &mut comment_depth)?;
        if tokens.is_empty() {
            continue;
        }

        let indent = compute_indent(line, &mut indent_stack, column)?;
        trace!("line {column}: indent {indent}, {} token(s)", tokens.len());
        out.push(LineToken {
            column,
            indent,
            tokens,
        });
    }

    if comment_depth > 0 {
        return Err(ParseError::at_column(
            total_lines,
            "The multi-line comment is not closed",
        ));
    }

    Ok(out)
}

/// Computes the leading-whitespace "space count" of `line` (tab = 8,
/// anything else whitespace = 1) and resolves it against the indent
/// stack, pushing or truncating as needed.
fn compute_indent(
    line: &str,
    indent_stack: &mut Vec<usize>,
    column: usize,
) -> Result<usize, ParseError> {
    let mut space = 0usize;
    for ch in line.chars() {
        if !ch.is_whitespace() {
            break;
        }
        space += if ch == '\t' { 8 } else { 1 };
    }

    if let Some(pos) = indent_stack.iter().position(|&s| s == space) {
        indent_stack.truncate(pos + 1);
        Ok(pos)
    } else if space > *indent_stack.last().unwrap() {
        indent_stack.push(space);
        Ok(indent_stack.len() - 1)
    } else {
        Err(ParseError::at_column(column, "Invalid indent space"))
    }
}

/// Tokenises the code on a single line, threading the nestable
/// block-comment depth counter across lines.
fn tokenise_line(
    line: &str,
    column: usize,
    comment_depth: &mut u32,
) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    let mut row = 0usize; // 0-based codepoint-unit offset

    while i < chars.len() {
        // Elided comment text contributes no row width: the tokens after
        // a comment report the same row they would if it weren't there.
        if *comment_depth > 0 {
            if chars[i] == '/' && chars.get(i + 1) == Some(&'*') {
                *comment_depth += 1;
                i += 2;
            } else if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                *comment_depth -= 1;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        let ch = chars[i];

        if ch.is_whitespace() {
            row += width(ch);
            i += 1;
            continue;
        }

        if ch == '#' {
            break;
        }

        let start_row = row;

        match ch {
            '0'..='9' => {
                let mut text = String::new();
                while let Some(&c) = chars.get(i) {
                    if c.is_ascii_digit() {
                        text.push(c);
                        row += width(c);
                        i += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token::NumericLiteral {
                    value: text,
                    row: start_row + 1,
                });
            }
            c if is_identifier_char(c) && !c.is_ascii_digit() => {
                let mut text = String::new();
                while let Some(&c) = chars.get(i) {
                    if is_identifier_char(c) {
                        text.push(c);
                        row += width(c);
                        i += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(identifier_or_keyword(text, start_row + 1));
            }
            '-' => {
                i += 1;
                row += width(ch);
                if chars.get(i) == Some(&'>') {
                    row += width('>');
                    i += 1;
                    tokens.push(Token::Assignment {
                        row: start_row + 1,
                    });
                } else {
                    tokens.push(Token::Operator {
                        value: OperatorKind::Minus,
                        row: start_row + 1,
                    });
                }
            }
            '!' => {
                i += 1;
                row += width(ch);
                if chars.get(i) == Some(&'=') {
                    row += width('=');
                    i += 1;
                    tokens.push(Token::Operator {
                        value: OperatorKind::NotEqual,
                        row: start_row + 1,
                    });
                } else {
                    return Err(ParseError::at(
                        column,
                        start_row + 1,
                        "There should be only '=' after the '!'",
                    ));
                }
            }
            '>' | '<' => {
                i += 1;
                row += width(ch);
                if chars.get(i) == Some(&'=') {
                    row += width('=');
                    i += 1;
                    let value = if ch == '>' {
                        OperatorKind::GreaterOrEqual
                    } else {
                        OperatorKind::LessOrEqual
                    };
                    tokens.push(Token::Operator {
                        value,
                        row: start_row + 1,
                    });
                } else {
                    let value = if ch == '>' {
                        OperatorKind::GreaterThan
                    } else {
                        OperatorKind::LessThan
                    };
                    tokens.push(Token::Operator {
                        value,
                        row: start_row + 1,
                    });
                }
            }
            '/' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 2;
                    *comment_depth += 1;
                } else {
                    i += 1;
                    row += width(ch);
                    tokens.push(Token::Operator {
                        value: OperatorKind::Divide,
                        row: start_row + 1,
                    });
                }
            }
            '+' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::Operator {
                    value: OperatorKind::Plus,
                    row: start_row + 1,
                });
            }
            '*' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::Operator {
                    value: OperatorKind::Times,
                    row: start_row + 1,
                });
            }
            '=' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::Operator {
                    value: OperatorKind::Equal,
                    row: start_row + 1,
                });
            }
            ',' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::Separator {
                    row: start_row + 1,
                });
            }
            '(' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::ParentheseStart {
                    row: start_row + 1,
                });
            }
            ')' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::ParentheseEnd {
                    row: start_row + 1,
                });
            }
            '[' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::BracketStart {
                    row: start_row + 1,
                });
            }
            ']' => {
                i += 1;
                row += width(ch);
                tokens.push(Token::BracketEnd {
                    row: start_row + 1,
                });
            }
            other => {
                return Err(ParseError::at(
                    column,
                    start_row + 1,
                    format_args!("Unexpected character '{other}'"),
                ));
            }
        }
    }

    Ok(tokens)
}
