use crate::ast::RawExpr;
use crate::position::Position;
use crate::types::Type;

/// A named top-level binding: `let name param0 .. paramN [: declaredType] = body`.
///
/// `declared_type` is already a resolved [`Type`] by the time it reaches
/// this crate; the surface-syntax-to-`Type` conversion (what the teacher's
/// `TypeName` → `Type` `TryFrom` impl does) is the parser's job, which is
/// out of scope here (spec.md §1).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawLet {
    pub name: String,
    pub params: Vec<String>,
    pub declared_type: Option<Type>,
    pub body: RawExpr,
    pub position: Position,
}
