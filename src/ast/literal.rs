use crate::position::Position;

/// The three literal forms the raw AST carries. Grouped in one file the way
/// the teacher groups its primitive number forms under a single `Num` node;
/// these don't warrant a file each.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IntLiteral {
    pub value: i64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoolLiteral {
    pub value: bool,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StringLiteral {
    pub value: String,
    pub position: Position,
}
