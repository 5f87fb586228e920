use crate::position::Position;

/// A reference to a previously bound name: a function, a let, or a
/// lambda/let parameter. Resolved against the [`crate::typechecker::scope::Scope`]
/// in scope at the point of occurrence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IdReference {
    pub name: String,
    pub position: Position,
}
