use crate::ast::RawExpr;
use crate::position::Position;

/// An anonymous abstraction. Parameters are bare names; unlike a `let`'s
/// parameters, they never carry a declared type, so every parameter is
/// typed with a fresh type variable (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Lambda {
    pub params: Vec<String>,
    pub body: Box<RawExpr>,
    pub position: Position,
}
