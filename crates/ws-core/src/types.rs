use serde::{Deserialize, Serialize};

use crate::value::WsValue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn synthetic() -> Self {
        Self {
            start: SourceLocation { line: 1, column: 1 },
            end: SourceLocation { line: 1, column: 1 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Equal,
    NotEqual,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOp {
    Sqrt,
    Sin,
    Cos,
    Not,
}

/// World queries available to expressions. All are keyed off a single operand;
/// `DistanceTo`, `SameTeam` and `SearchObject` are relative to the actor
/// running the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKind {
    PositionX,
    PositionY,
    Radius,
    Direction,
    ActionPoints,
    MaxActionPoints,
    HitPoints,
    DistanceTo,
    IsWorm,
    IsFood,
    IsProjectile,
    SameTeam,
    SearchObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expression {
    NumberLiteral {
        value: f64,
        location: SourceSpan,
    },
    BooleanLiteral {
        value: bool,
        location: SourceSpan,
    },
    NullLiteral {
        location: SourceSpan,
    },
    SelfActor {
        location: SourceSpan,
    },
    Variable {
        name: String,
        location: SourceSpan,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        location: SourceSpan,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        location: SourceSpan,
    },
    Query {
        query: QueryKind,
        operand: Box<Expression>,
        location: SourceSpan,
    },
}

impl Expression {
    pub fn location(&self) -> &SourceSpan {
        match self {
            Self::NumberLiteral { location, .. }
            | Self::BooleanLiteral { location, .. }
            | Self::NullLiteral { location }
            | Self::SelfActor { location }
            | Self::Variable { location, .. }
            | Self::Binary { location, .. }
            | Self::Unary { location, .. }
            | Self::Query { location, .. } => location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Sequence {
        statements: Vec<Statement>,
        location: SourceSpan,
    },
    Assign {
        name: String,
        value: Expression,
        location: SourceSpan,
    },
    Print {
        value: Expression,
        location: SourceSpan,
    },
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        location: SourceSpan,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
        location: SourceSpan,
    },
    Break {
        location: SourceSpan,
    },
    Invoke {
        name: String,
        location: SourceSpan,
    },
    Turn {
        angle: Expression,
        location: SourceSpan,
    },
    Move {
        location: SourceSpan,
    },
    Jump {
        location: SourceSpan,
    },
    Eat {
        location: SourceSpan,
    },
    Fire {
        location: SourceSpan,
    },
}

impl Statement {
    pub fn location(&self) -> &SourceSpan {
        match self {
            Self::Sequence { location, .. }
            | Self::Assign { location, .. }
            | Self::Print { location, .. }
            | Self::If { location, .. }
            | Self::While { location, .. }
            | Self::Break { location }
            | Self::Invoke { location, .. }
            | Self::Turn { location, .. }
            | Self::Move { location }
            | Self::Jump { location }
            | Self::Eat { location }
            | Self::Fire { location } => location,
        }
    }
}

/// A named, parameterless, globally-scoped reusable statement body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub body: Statement,
    pub location: SourceSpan,
}

/// A parsed program: procedure definitions in source order (later definitions
/// with the same name shadow earlier ones at lookup time) plus the main
/// statement, which is always a `Sequence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub procedures: Vec<Procedure>,
    pub main: Statement,
}

/// Result of one `run` call on the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RunOutcome {
    /// The program ran to completion; `printed` holds every value passed to
    /// `print` since the program started or last completed, in order.
    Completed { printed: Vec<WsValue> },
    /// An action was refused for lack of action points; the position stack is
    /// preserved and a later `run` resumes at the same statement.
    Suspended,
}
