use crate::ast::{id::IdReference, RawExpr};
use crate::position::Position;

/// Curried function application: `funRef arg0 arg1 ... argN`.
///
/// Arity here is the *syntactic* argument count supplied at this call site;
/// it may be less than the callee's arrow arity (a partial application,
/// see [`crate::lift`]) but never, after typing, more than it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Apply {
    pub function: IdReference,
    pub args: Vec<RawExpr>,
    pub position: Position,
}
