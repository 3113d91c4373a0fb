//! The typed AST produced by [`crate::parser::parse`].
//!
//! Every node derives `Serialize`/`Deserialize` with an internal `type`
//! tag so that a textual dump of a `Program` matches the stable,
//! tag-tagged JSON shape fixtures expect (see `SPEC_FULL.md` §6).

use serde::{Deserialize, Serialize};

use crate::lexer::OperatorKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<RootStatement>,
}

/// A statement permitted at indent 0 — everything a nested [`Statement`]
/// allows, plus `const` and `def`, which are forbidden anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RootStatement {
    Assignment(Assignment),
    ExpressionStatement(ExpressionStatement),
    If(If),
    While(While),
    Constant(Constant),
    FunctionDeclaration(FunctionDeclaration),
}

/// A statement nested inside an `if`, `while`, or `def` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    Assignment(Assignment),
    ExpressionStatement(ExpressionStatement),
    If(If),
    While(While),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub left: AssignmentTarget,
    pub right: Expression,
}

/// The left-hand side of an assignment: always either a bare identifier
/// or an indexed member expression (`memory[i]`, `buf[j]`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssignmentTarget {
    Identifier(Identifier),
    Member(Member),
}

/// The only expression allowed to stand alone as a statement is a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Call,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub test: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub test: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub left: Identifier,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub id: Identifier,
    pub params: Vec<Identifier>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    Unary(Unary),
    Binary(Binary),
    Member(Member),
    Call(Call),
    Identifier(Identifier),
    NumericLiteral(NumericLiteral),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub operator: OperatorKind,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Indexed access `target[property]`. `target` is always an identifier —
/// including the distinguished name `memory` for the `memory[...]` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub target: Identifier,
    pub property: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub callee: Identifier,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericLiteral {
    pub value: i32,
}
