use sunaba::parser::ast::*;
use sunaba::{compile, tokenise};

/// S1 — simple add function.
#[test]
fn simple_add_function() {
    let program = compile("def add(a, b)\n    a -> b\n").expect("should parse");
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

/// S2 — left-associativity of a run of same-precedence operators.
#[test]
fn left_associative_chain_at_root() {
    let program = compile("x -> 1 + 2 + 3 + 4\n").expect("should parse");
    let RootStatement::Assignment(assignment) = &program.body[0] else {
        panic!("expected an assignment");
    };
    fn lit(v: i32) -> Expression {
        Expression::NumericLiteral(NumericLiteral { value: v })
    }
    fn bin(l: Expression, op: sunaba::lexer::OperatorKind, r: Expression) -> Expression {
        Expression::Binary(Binary {
            operator: op,
            left: Box::new(l),
            right: Box::new(r),
        })
    }
    use sunaba::lexer::OperatorKind::Plus;
    let expected = bin(bin(bin(lit(1), Plus, lit(2)), Plus, lit(3)), Plus, lit(4));
    assert_eq!(assignment.right, expected);
}

/// S3 — memory access with an expression index.
#[test]
fn memory_access_assignment() {
    let program = compile("memory[i + 1] -> 7\n").expect("should parse");
    let RootStatement::Assignment(assignment) = &program.body[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(
        assignment.left,
        AssignmentTarget::Member(Member {
            target: Identifier::new("memory"),
            property: Box::new(Expression::Binary(Binary {
                operator: sunaba::lexer::OperatorKind::Plus,
                left: Box::new(Expression::Identifier(Identifier::new("i"))),
                right: Box::new(Expression::NumericLiteral(NumericLiteral { value: 1 })),
            })),
        })
    );
}

/// S4 — a block must have a body.
#[test]
fn if_with_body_succeeds_without_body_fails() {
    compile("if x\n    y -> 1\n").expect("if with a body should parse");

    let err = compile("if x\n").unwrap_err();
    assert_eq!(
        err.message(),
        "1: There is no body for the last `if` or `while` or `def` statement"
    );
}

/// S5 — integer literal overflow.
#[test]
fn overflowing_literal_is_rejected() {
    let err = compile("x -> 9999999999\n").unwrap_err();
    assert_eq!(err.message(), "1 6: Out of range integer value");
}

/// S6 — nested block comments disappear without affecting tokenisation.
/// The comment text itself is deleted outright (not replaced by a space),
/// so the surrounding line-tokens are compared against the source with
/// the comment literally cut out, rather than against a source that also
/// drops the whitespace following the comment.
#[test]
fn nested_block_comment_is_transparent() {
    let comment = "/* a /* b */ c */";
    let rest = " x -> 1";
    let with_comment = tokenise(&format!("{comment}{rest}")).unwrap();
    let without_comment = tokenise(rest).unwrap();
    assert_eq!(with_comment, without_comment);
}

/// S7 — dedenting to a space count that was never pushed is an error.
#[test]
fn dedent_to_unseen_indent_level_is_rejected() {
    let err = tokenise("if x\n    y -> 1\n  z -> 2\n").unwrap_err();
    assert_eq!(err.message(), "3: Invalid indent space");
}

#[test]
fn blank_and_comment_lines_do_not_shift_column() {
    let lines = tokenise("x -> 1\n\n# just a comment\ny -> 2\n").unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].column, 1);
    assert_eq!(lines[1].column, 4);
}

#[test]
fn every_binary_node_is_left_normal_form() {
    fn check(expr: &Expression) {
        if let Expression::Binary(binary) = expr {
            assert!(
                !matches!(*binary.right, Expression::Binary(_)),
                "right child of a Binary must never itself be Binary"
            );
            check(&binary.left);
            check(&binary.right);
        }
    }

    let program = compile("x -> 1 + 2 - 3 * 4 / 5\n").unwrap();
    let RootStatement::Assignment(assignment) = &program.body[0] else {
        panic!("expected an assignment");
    };
    check(&assignment.right);
}

#[test]
fn const_and_function_declarations_are_root_only() {
    let err = compile("if x\n    const y -> 1\n").unwrap_err();
    assert_eq!(err.message(), "2: `const` is only valid at the top level");

    let err = compile("if x\n    def f()\n        y -> 1\n").unwrap_err();
    assert_eq!(err.message(), "2: `def` is only valid at the top level");
}

#[test]
fn call_statement_and_non_call_expression_statement() {
    let program = compile("print(1, 2)\n").expect("call statement should parse");
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

    let err = compile("1 + 2\n").unwrap_err();
    assert_eq!(
        err.message(),
        "1: A top-level expression statement must be a call"
    );
}

#[test]
fn full_program_with_const_function_and_control_flow() {
    let source = "\
const limit -> 10

def run(n)
    i -> 0
    while i < limit
        memory[i] -> n
        i -> i + 1

run(limit)
";
    let program = compile(source).expect("should parse a complete program");
    assert_eq!(program.body.len(), 3);
    assert!(matches!(program.body[0], RootStatement::Constant(_)));
    assert!(matches!(
        program.body[1],
        RootStatement::FunctionDeclaration(_)
    ));
    assert!(matches!(
        program.body[2],
        RootStatement::ExpressionStatement(_)
    ));

    let RootStatement::FunctionDeclaration(func) = &program.body[1] else {
        unreachable!();
    };
    assert_eq!(func.body.len(), 2);
    assert!(matches!(func.body[1], Statement::While(_)));
}

#[test]
fn json_dump_round_trips_through_serde() {
    let program = compile("def add(a, b)\n    a -> b\n").unwrap();
    let json = sunaba::program_to_json(&program).unwrap();
    let restored: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(program, restored);
}
