//! Raw (untyped) AST consumed by the [`crate::typechecker`].
//!
//! This mirrors the subset of the surface language's AST that the typer and
//! closure lifter actually operate over. Lexing and parsing produce these
//! nodes; both are out of scope for this crate (spec.md §1). Callers
//! construct `RawModule` values directly, whether from a real parser or,
//! as in this crate's own tests, literally.

pub mod apply;
pub mod id;
pub mod lambda;
pub mod let_binding;
pub mod literal;
pub mod module;

pub use apply::Apply;
pub use id::IdReference;
pub use lambda::Lambda;
pub use let_binding::RawLet;
pub use literal::{BoolLiteral, IntLiteral, StringLiteral};
pub use module::RawModule;

use crate::position::Position;

/// Any raw expression form. Top-level definitions (`RawLet`) are not an
/// `Expression` variant; only `Module` holds a sequence of them, matching
/// spec.md §3's "Raw AST nodes" list exactly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum RawExpr {
    IdReference(IdReference),
    IntLiteral(IntLiteral),
    BoolLiteral(BoolLiteral),
    StringLiteral(StringLiteral),
    Apply(Apply),
    Lambda(Lambda),
}

impl RawExpr {
    pub fn position(&self) -> Position {
        match self {
            RawExpr::IdReference(e) => e.position,
            RawExpr::IntLiteral(e) => e.position,
            RawExpr::BoolLiteral(e) => e.position,
            RawExpr::StringLiteral(e) => e.position,
            RawExpr::Apply(e) => e.position,
            RawExpr::Lambda(e) => e.position,
        }
    }
}
