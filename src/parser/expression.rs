//! The expression grammar: §4.2.3 (three-state recursive descent),
//! §4.2.4 (left-rotation to enforce left-associativity) and §4.2.5
//! (balanced-region scanning for brackets/parentheses/argument lists).

use crate::error::ParseError;
use crate::lexer::{OperatorKind, Token};

use super::ast::{
    Binary, Call, Expression, Identifier, Member, NumericLiteral, Unary, UnaryOperator,
};

/// Parses `tokens` as a single expression. `tokens` must be consumed in
/// full — every call site already knows the exact boundary of the
/// expression it wants (the rest of a line, the inside of a bracket
/// pair, one comma-separated argument, ...).
pub(crate) fn parse_expression(tokens: &[Token], column: usize) -> Result<Expression, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::at_column(column, "Expected an expression"));
    }
    let (operand, rest) = parse_operand(tokens, None, column)?;
    let expr = parse_binary_chain(operand, rest, column)?;
    Ok(rotate_left(expr))
}

/// The `null`/`unary(op)` state: expects an operand, optionally wrapped
/// in a pending prefix `+`/`-`.
fn parse_operand<'a>(
    tokens: &'a [Token],
    pending_unary: Option<UnaryOperator>,
    column: usize,
) -> Result<(Expression, &'a [Token]), ParseError> {
    let Some(first) = tokens.first() else {
        return Err(ParseError::at_column(column, "Expected an expression"));
    };

    match first {
        Token::Operator {
            value: OperatorKind::Plus,
            ..
        } => parse_operand(&tokens[1..], Some(UnaryOperator::Plus), column),
        Token::Operator {
            value: OperatorKind::Minus,
            ..
        } => parse_operand(&tokens[1..], Some(UnaryOperator::Minus), column),

        Token::Identifier { value, .. } => {
            let id = Identifier::new(value.clone());
            let (expr, rest) = parse_postfix(id, &tokens[1..], column)?;
            Ok((apply_unary(pending_unary, expr), rest))
        }

        Token::Memory { row } => {
            let rest = &tokens[1..];
            match rest.first() {
                Some(Token::BracketStart { .. }) => {
                    let (property_tokens, after) =
                        scan_balanced(rest, column, is_bracket_start, is_bracket_end)?;
                    if property_tokens.is_empty() {
                        return Err(ParseError::at(column, rest[0].row(), "Empty index expression"));
                    }
                    let property = parse_expression(property_tokens, column)?;
                    let expr = Expression::Member(Member {
                        target: Identifier::new("memory"),
                        property: Box::new(property),
                    });
                    Ok((apply_unary(pending_unary, expr), after))
                }
                _ => Err(ParseError::at(column, *row, "`memory` must be indexed with '['")),
            }
        }

        Token::NumericLiteral { value, row } => {
            let row = *row;
            let magnitude = parse_magnitude(value, column, row)?;
            let expr = match pending_unary {
                Some(UnaryOperator::Minus) => {
                    let value = i32::try_from(-magnitude).map_err(|_| out_of_range(column, row))?;
                    Expression::NumericLiteral(NumericLiteral { value })
                }
                Some(UnaryOperator::Plus) => {
                    let value = i32::try_from(magnitude).map_err(|_| out_of_range(column, row))?;
                    Expression::Unary(Unary {
                        operator: UnaryOperator::Plus,
                        argument: Box::new(Expression::NumericLiteral(NumericLiteral { value })),
                    })
                }
                None => {
                    let value = i32::try_from(magnitude).map_err(|_| out_of_range(column, row))?;
                    Expression::NumericLiteral(NumericLiteral { value })
                }
            };
            Ok((expr, &tokens[1..]))
        }

        Token::ParentheseStart { .. } => {
            let (inner_tokens, after) = scan_balanced(tokens, column, is_paren_start, is_paren_end)?;
            if inner_tokens.is_empty() {
                return Err(ParseError::at(
                    column,
                    tokens[0].row(),
                    "Empty parenthesised expression",
                ));
            }
            let inner = parse_expression(inner_tokens, column)?;
            Ok((apply_unary(pending_unary, inner), after))
        }

        other => Err(unexpected_operand(column, other)),
    }
}

/// After an `Identifier`, decides between a bare identifier, a member
/// expression (`id[...]`) and a call (`id(...)`).
fn parse_postfix<'a>(
    id: Identifier,
    rest: &'a [Token],
    column: usize,
) -> Result<(Expression, &'a [Token]), ParseError> {
    match rest.first() {
        Some(Token::BracketStart { .. }) => {
            let (property_tokens, after) = scan_balanced(rest, column, is_bracket_start, is_bracket_end)?;
            if property_tokens.is_empty() {
                return Err(ParseError::at(column, rest[0].row(), "Empty index expression"));
            }
            let property = parse_expression(property_tokens, column)?;
            Ok((
                Expression::Member(Member {
                    target: id,
                    property: Box::new(property),
                }),
                after,
            ))
        }
        Some(Token::ParentheseStart { .. }) => {
            let (args_tokens, after) = scan_balanced(rest, column, is_paren_start, is_paren_end)?;
            let arguments = parse_argument_list(args_tokens, column)?;
            Ok((
                Expression::Call(Call {
                    callee: id,
                    arguments,
                }),
                after,
            ))
        }
        _ => Ok((Expression::Identifier(id), rest)),
    }
}

/// The `binary(left)` state: expects an operator, then recurses for the
/// right-hand side. Builds a right-leaning chain; [`rotate_left`] fixes
/// associativity up afterwards.
fn parse_binary_chain<'a>(
    left: Expression,
    rest: &'a [Token],
    column: usize,
) -> Result<Expression, ParseError> {
    match rest.first() {
        None => Ok(left),
        Some(Token::Operator { value, .. }) => {
            let operator = *value;
            let (right_operand, rest) = parse_operand(&rest[1..], None, column)?;
            let right = parse_binary_chain(right_operand, rest, column)?;
            Ok(Expression::Binary(Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }))
        }
        Some(other) => Err(ParseError::at(
            column,
            other.row(),
            format_args!("Expected an operator, found {}", other.describe()),
        )),
    }
}

/// All binary operators sit at a single precedence level and associate
/// left-to-right. A plain recursive-descent parse naturally builds a
/// right-leaning tree (`a + (b + c)`); this rotates it into the
/// equivalent left-leaning normal form (`(a + b) + c`) by repeatedly
/// swapping the root with its right child until the right child is no
/// longer a `Binary`. Parenthesised sub-expressions are untouched: they
/// were built (and rotated) independently and appear here only as
/// opaque operands.
fn rotate_left(expr: Expression) -> Expression {
    match expr {
        Expression::Binary(Binary {
            operator,
            left,
            right,
        }) => match *right {
            Expression::Binary(Binary {
                operator: inner_operator,
                left: inner_left,
                right: inner_right,
            }) => {
                let new_left = Expression::Binary(Binary {
                    operator,
                    left,
                    right: inner_left,
                });
                rotate_left(Expression::Binary(Binary {
                    operator: inner_operator,
                    left: Box::new(new_left),
                    right: inner_right,
                }))
            }
            other => Expression::Binary(Binary {
                operator,
                left,
                right: Box::new(other),
            }),
        },
        other => other,
    }
}

fn apply_unary(operator: Option<UnaryOperator>, expr: Expression) -> Expression {
    match operator {
        Some(operator) => Expression::Unary(Unary {
            operator,
            argument: Box::new(expr),
        }),
        None => expr,
    }
}

fn parse_magnitude(text: &str, column: usize, row: usize) -> Result<i64, ParseError> {
    text.parse::<i64>().map_err(|_| out_of_range(column, row))
}

fn out_of_range(column: usize, row: usize) -> ParseError {
    ParseError::at(column, row, "Out of range integer value")
}

fn unexpected_operand(column: usize, token: &Token) -> ParseError {
    let row = token.row();
    match token {
        Token::If { .. } | Token::While { .. } | Token::Def { .. } | Token::Const { .. } => {
            ParseError::at(
                column,
                row,
                format_args!("Unexpected keyword {} in expression", token.describe()),
            )
        }
        _ => ParseError::at(
            column,
            row,
            format_args!("Expected an expression, found {}", token.describe()),
        ),
    }
}

fn is_bracket_start(t: &Token) -> bool {
    matches!(t, Token::BracketStart { .. })
}

fn is_bracket_end(t: &Token) -> bool {
    matches!(t, Token::BracketEnd { .. })
}

fn is_paren_start(t: &Token) -> bool {
    matches!(t, Token::ParentheseStart { .. })
}

fn is_paren_end(t: &Token) -> bool {
    matches!(t, Token::ParentheseEnd { .. })
}

/// Scans `tokens` (whose first element must be the opening bracket or
/// parenthesis) for its matching close, tracking nesting depth. Returns
/// the tokens strictly between the open/close pair and the remainder of
/// `tokens` after the close.
pub(crate) fn scan_balanced<'a>(
    tokens: &'a [Token],
    column: usize,
    is_start: fn(&Token) -> bool,
    is_end: fn(&Token) -> bool,
) -> Result<(&'a [Token], &'a [Token]), ParseError> {
    let opening_row = tokens[0].row();
    let mut depth = 0i32;
    for (i, t) in tokens.iter().enumerate() {
        if is_start(t) {
            depth += 1;
        } else if is_end(t) {
            depth -= 1;
            if depth == 0 {
                return Ok((&tokens[1..i], &tokens[i + 1..]));
            }
        }
    }
    Err(ParseError::at(column, opening_row, "Unclosed bracket or parenthesis"))
}

/// Splits `tokens` at commas appearing at nesting depth 0 (depth
/// increasing on any open bracket/parenthesis and decreasing on the
/// matching close). Always yields at least one (possibly empty) slice.
fn split_top_level(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match t {
            Token::ParentheseStart { .. } | Token::BracketStart { .. } => depth += 1,
            Token::ParentheseEnd { .. } | Token::BracketEnd { .. } => depth -= 1,
            Token::Separator { .. } if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Parses a comma-separated argument list. An entirely empty `tokens`
/// slice (immediate `()`) yields zero arguments; any empty slot between
/// commas (`f(,x)`, `f(x,)`, `f(x,,y)`) is rejected rather than treated
/// as a hole (see SPEC_FULL.md's resolution of the corresponding open
/// question).
fn parse_argument_list(tokens: &[Token], column: usize) -> Result<Vec<Expression>, ParseError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let mut arguments = Vec::new();
    for part in split_top_level(tokens) {
        if part.is_empty() {
            return Err(ParseError::at_column(column, "Empty argument"));
        }
        arguments.push(parse_expression(part, column)?);
    }
    Ok(arguments)
}

/// Parses a comma-separated parameter list (`def f(a, b)`): each slot
/// must be exactly one identifier.
pub(crate) fn parse_param_list(
    tokens: &[Token],
    column: usize,
) -> Result<Vec<Identifier>, ParseError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let mut params = Vec::new();
    for part in split_top_level(tokens) {
        match part {
            [Token::Identifier { value, .. }] => params.push(Identifier::new(value.clone())),
            [] => return Err(ParseError::at_column(column, "Empty parameter")),
            [first, ..] => {
                return Err(ParseError::at(column, first.row(), "Expected a parameter name"))
            }
        }
    }
    Ok(params)
}
