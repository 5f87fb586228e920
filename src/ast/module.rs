use crate::ast::let_binding::RawLet;
use crate::position::Position;

/// A module is an ordered sequence of top-level lets; later lets may refer
/// to earlier ones (spec.md §4.5 "Module"), never the reverse.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawModule {
    pub name: String,
    pub lets: Vec<RawLet>,
    pub position: Position,
}
