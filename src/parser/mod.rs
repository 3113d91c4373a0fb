//! The indentation-aware recursive-descent parser: §4.2 of
//! `SPEC_FULL.md`. Consumes [`LineToken`]s and produces a [`Program`].

pub mod ast;
mod expression;

use crate::error::ParseError;
use crate::lexer::{LineToken, Token};
use ast::{
    Assignment, AssignmentTarget, Constant, Expression, ExpressionStatement, FunctionDeclaration,
    Identifier, If, Program, RootStatement, Statement, While,
};
use expression::{parse_expression, parse_param_list, scan_balanced};
use log::trace;

/// Parses a finite sequence of line-tokens (as produced by
/// [`crate::lexer::tokenise`]) into a [`Program`].
pub fn parse(line_tokens: &[LineToken]) -> Result<Program, ParseError> {
    let mut state = ParserState::default();
    for line in line_tokens {
        state.accept(line)?;
    }
    state.finish()
}

/// An `if`/`while`/`def` header whose body is still being collected.
#[derive(Debug)]
enum BlockKind {
    If(Expression),
    While(Expression),
    Def {
        id: Identifier,
        params: Vec<Identifier>,
    },
}

/// A completed statement awaiting insertion into either the program
/// root or the body of whatever block currently contains it. Mirrors
/// `RootStatement` exactly; `Constant` and `FunctionDeclaration` are
/// only ever constructed while the block stack is empty.
enum AstStatementKind {
    Assignment(Assignment),
    ExpressionStatement(ExpressionStatement),
    If(If),
    While(While),
    Constant(Constant),
    FunctionDeclaration(FunctionDeclaration),
}

impl AstStatementKind {
    fn into_root(self) -> RootStatement {
        match self {
            AstStatementKind::Assignment(a) => RootStatement::Assignment(a),
            AstStatementKind::ExpressionStatement(e) => RootStatement::ExpressionStatement(e),
            AstStatementKind::If(i) => RootStatement::If(i),
            AstStatementKind::While(w) => RootStatement::While(w),
            AstStatementKind::Constant(c) => RootStatement::Constant(c),
            AstStatementKind::FunctionDeclaration(f) => RootStatement::FunctionDeclaration(f),
        }
    }

    fn into_statement(self) -> Statement {
        match self {
            AstStatementKind::Assignment(a) => Statement::Assignment(a),
            AstStatementKind::ExpressionStatement(e) => Statement::ExpressionStatement(e),
            AstStatementKind::If(i) => Statement::If(i),
            AstStatementKind::While(w) => Statement::While(w),
            AstStatementKind::Constant(_) | AstStatementKind::FunctionDeclaration(_) => {
                unreachable!(
                    "`const` and `def` only ever open at indent 0, so they only ever close onto the program root"
                )
            }
        }
    }
}

#[derive(Default)]
struct ParserState {
    root: Vec<RootStatement>,
    block_stack: Vec<(BlockKind, Vec<Statement>)>,
    /// Set while the previous line just opened a block: the next line
    /// must be indented at least this far.
    min_indent: Option<usize>,
    /// Set while the previous line was a non-block statement: the next
    /// line must be indented no further than this.
    max_indent: Option<usize>,
    /// Column of the most recently opened (and not yet closed) block,
    /// for the "no body" diagnostic.
    last_open_column: usize,
}

impl ParserState {
    fn emit(&mut self, stmt: AstStatementKind) {
        match self.block_stack.last_mut() {
            Some((_, body)) => body.push(stmt.into_statement()),
            None => self.root.push(stmt.into_root()),
        }
    }

    /// Closes (finalises) every block nested deeper than `target`,
    /// innermost first, attaching each to its parent's body or to the
    /// program root.
    fn close_to(&mut self, target: usize) {
        while self.block_stack.len() > target {
            let (kind, body) = self.block_stack.pop().unwrap();
            let stmt = match kind {
                BlockKind::If(test) => AstStatementKind::If(If { test, body }),
                BlockKind::While(test) => AstStatementKind::While(While { test, body }),
                BlockKind::Def { id, params } => {
                    AstStatementKind::FunctionDeclaration(FunctionDeclaration { id, params, body })
                }
            };
            self.emit(stmt);
        }
    }

    fn accept(&mut self, line: &LineToken) -> Result<(), ParseError> {
        if let Some(min) = self.min_indent {
            if line.indent < min {
                return Err(ParseError::at_column(line.column, "Invalid indent space"));
            }
        }
        if let Some(max) = self.max_indent {
            if line.indent > max {
                return Err(ParseError::at_column(line.column, "Invalid indent space"));
            }
        }

        self.close_to(line.indent);
        trace!("line {}: indent {}", line.column, line.indent);

        let first = line
            .tokens
            .first()
            .expect("blank and comment-only lines are dropped by the tokeniser");

        match first {
            Token::Identifier { .. } | Token::Memory { .. } => {
                self.dispatch_value_statement(line)?;
                self.max_indent = Some(line.indent);
                self.min_indent = None;
            }
            Token::If { .. } => {
                let test = parse_expression(&line.tokens[1..], line.column)?;
                self.open_block(BlockKind::If(test), line.column);
            }
            Token::While { .. } => {
                let test = parse_expression(&line.tokens[1..], line.column)?;
                self.open_block(BlockKind::While(test), line.column);
            }
            Token::Const { .. } => {
                if line.indent != 0 {
                    return Err(ParseError::at_column(
                        line.column,
                        "`const` is only valid at the top level",
                    ));
                }
                let constant = parse_constant(line)?;
                self.emit(AstStatementKind::Constant(constant));
                self.max_indent = Some(line.indent);
                self.min_indent = None;
            }
            Token::Def { .. } => {
                if line.indent != 0 {
                    return Err(ParseError::at_column(
                        line.column,
                        "`def` is only valid at the top level",
                    ));
                }
                let (id, params) = parse_def_header(line)?;
                self.open_block(BlockKind::Def { id, params }, line.column);
            }
            other => {
                return Err(ParseError::at(
                    line.column,
                    other.row(),
                    format_args!("{} cannot start a statement", other.describe()),
                ));
            }
        }

        Ok(())
    }

    fn open_block(&mut self, kind: BlockKind, column: usize) {
        let indent = self.block_stack.len();
        self.block_stack.push((kind, Vec::new()));
        self.min_indent = Some(indent + 1);
        self.max_indent = None;
        self.last_open_column = column;
    }

    fn dispatch_value_statement(&mut self, line: &LineToken) -> Result<(), ParseError> {
        if let Some(arrow) = find_assignment(&line.tokens) {
            let left_tokens = &line.tokens[..arrow];
            let right_tokens = &line.tokens[arrow + 1..];
            if left_tokens.is_empty() {
                return Err(ParseError::at_column(
                    line.column,
                    "Expected an expression before '->'",
                ));
            }
            if right_tokens.is_empty() {
                return Err(ParseError::at_column(
                    line.column,
                    "Expected an expression after '->'",
                ));
            }
            let left = match parse_expression(left_tokens, line.column)? {
                Expression::Identifier(id) => AssignmentTarget::Identifier(id),
                Expression::Member(member) => AssignmentTarget::Member(member),
                _ => {
                    return Err(ParseError::at_column(
                        line.column,
                        "Assignment target must be an identifier or a member expression",
                    ))
                }
            };
            let right = parse_expression(right_tokens, line.column)?;
            self.emit(AstStatementKind::Assignment(Assignment { left, right }));
        } else {
            let expression = parse_expression(&line.tokens, line.column)?;
            let Expression::Call(call) = expression else {
                return Err(ParseError::at_column(
                    line.column,
                    "A top-level expression statement must be a call",
                ));
            };
            self.emit(AstStatementKind::ExpressionStatement(ExpressionStatement {
                expression: call,
            }));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Program, ParseError> {
        if self.min_indent.is_some() {
            return Err(ParseError::at_column(
                self.last_open_column,
                "There is no body for the last `if` or `while` or `def` statement",
            ));
        }
        self.close_to(0);
        Ok(Program { body: self.root })
    }
}

fn find_assignment(tokens: &[Token]) -> Option<usize> {
    tokens
        .iter()
        .position(|t| matches!(t, Token::Assignment { .. }))
}

fn parse_constant(line: &LineToken) -> Result<Constant, ParseError> {
    let tokens = &line.tokens[1..];
    let Some(Token::Identifier { value, .. }) = tokens.first() else {
        return Err(ParseError::at_column(
            line.column,
            "Expected an identifier after `const`",
        ));
    };
    let left = Identifier::new(value.clone());
    let Some(Token::Assignment { .. }) = tokens.get(1) else {
        return Err(ParseError::at_column(
            line.column,
            "Expected '->' after the constant's name",
        ));
    };
    let right = parse_expression(&tokens[2..], line.column)?;
    Ok(Constant { left, right })
}

fn parse_def_header(line: &LineToken) -> Result<(Identifier, Vec<Identifier>), ParseError> {
    let tokens = &line.tokens[1..];
    let Some(Token::Identifier { value, .. }) = tokens.first() else {
        return Err(ParseError::at_column(
            line.column,
            "Expected a function name after `def`",
        ));
    };
    let id = Identifier::new(value.clone());
    let Some(Token::ParentheseStart { .. }) = tokens.get(1) else {
        return Err(ParseError::at_column(
            line.column,
            "Expected '(' after the function name",
        ));
    };
    let (param_tokens, after) =
        scan_balanced(&tokens[1..], line.column, is_paren_start, is_paren_end)?;
    if !after.is_empty() {
        return Err(ParseError::at(
            line.column,
            after[0].row(),
            format_args!("Unexpected {} after the parameter list", after[0].describe()),
        ));
    }
    let params = parse_param_list(param_tokens, line.column)?;
    Ok((id, params))
}

fn is_paren_start(t: &Token) -> bool {
    matches!(t, Token::ParentheseStart { .. })
}

fn is_paren_end(t: &Token) -> bool {
    matches!(t, Token::ParentheseEnd { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenise;
    use crate::parser::ast::*;

    fn program(src: &str) -> Program {
        parse(&tokenise(src).unwrap()).unwrap()
    }

    #[test]
    fn simple_add_function() {
        let program = program("def add(a, b)\n    a -> b\n");
        assert_eq!(
            program,
            Program {
                body: vec![RootStatement::FunctionDeclaration(FunctionDeclaration {
                    id: Identifier::new("add"),
                    params: vec![Identifier::new("a"), Identifier::new("b")],
                    body: vec![Statement::Assignment(Assignment {
                        left: AssignmentTarget::Identifier(Identifier::new("a")),
                        right: Expression::Identifier(Identifier::new("b")),
                    })],
                })],
            }
        );
    }

    #[test]
    fn memory_assignment() {
        let program = program("memory[i + 1] -> 7\n");
        let RootStatement::Assignment(assignment) = &program.body[0] else {
            panic!("expected an assignment");
        };
        assert_eq!(
            assignment.left,
            AssignmentTarget::Member(Member {
                target: Identifier::new("memory"),
                property: Box::new(Expression::Binary(Binary {
                    operator: crate::lexer::OperatorKind::Plus,
                    left: Box::new(Expression::Identifier(Identifier::new("i"))),
                    right: Box::new(Expression::NumericLiteral(NumericLiteral { value: 1 })),
                })),
            })
        );
    }

    #[test]
    fn if_with_body_succeeds() {
        let program = program("if x\n    y -> 1\n");
        assert_eq!(program.body.len(), 1);
        assert!(matches!(program.body[0], RootStatement::If(_)));
    }

    #[test]
    fn if_without_body_reports_missing_body() {
        let err = parse(&tokenise("if x\n").unwrap()).unwrap_err();
        assert_eq!(
            err.message(),
            "1: There is no body for the last `if` or `while` or `def` statement"
        );
    }

    #[test]
    fn const_and_def_are_root_only() {
        let err = parse(&tokenise("if x\n    const y -> 1\n").unwrap()).unwrap_err();
        assert_eq!(err.message(), "2: `const` is only valid at the top level");
    }

    #[test]
    fn call_statement_at_root() {
        let program = program("print(1, 2)\n");
        assert_eq!(
            program.body[0],
            RootStatement::ExpressionStatement(ExpressionStatement {
                expression: Call {
                    callee: Identifier::new("print"),
                    arguments: vec![
                        Expression::NumericLiteral(NumericLiteral { value: 1 }),
                        Expression::NumericLiteral(NumericLiteral { value: 2 }),
                    ],
                },
            })
        );
    }

    #[test]
    fn non_call_expression_statement_is_rejected() {
        let err = parse(&tokenise("a + b\n").unwrap()).unwrap_err();
        assert_eq!(
            err.message(),
            "1: A top-level expression statement must be a call"
        );
    }

    #[test]
    fn invalid_assignment_target_is_rejected() {
        let err = parse(&tokenise("a + b -> x\n").unwrap()).unwrap_err();
        assert_eq!(
            err.message(),
            "1: Assignment target must be an identifier or a member expression"
        );
    }

    #[test]
    fn statement_cannot_start_with_a_literal() {
        let err = parse(&tokenise("1 + 2\n").unwrap()).unwrap_err();
        assert_eq!(err.message(), "1 1: a numeric literal cannot start a statement");
    }

    #[test]
    fn nested_while_inside_function() {
        let program = program("def loop(n)\n    while n\n        n -> n\n");
        let RootStatement::FunctionDeclaration(func) = &program.body[0] else {
            panic!("expected a function declaration");
        };
        assert_eq!(func.body.len(), 1);
        let Statement::While(while_stmt) = &func.body[0] else {
            panic!("expected a while loop");
        };
        assert_eq!(while_stmt.body.len(), 1);
    }
}
