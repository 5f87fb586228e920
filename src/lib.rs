//! A Hindley-Milner typer and closure lifter for a small ML-family
//! functional language.
//!
//! This crate consumes a raw AST (built by some external parser) and a
//! prelude [`typechecker::scope::Scope`] of built-in bindings, resolves
//! every node's type through unification, and rewrites partial
//! applications into fresh top-level helper lets so that downstream code
//! generation never has to synthesise a closure object. Lexing, parsing,
//! bytecode emission, and any CLI front end are external collaborators;
//! none of that lives here.
//!
//! The two stages are exposed both separately (`type_full`, `lift::lift_module`)
//! and combined (`type_and_lift`), plus `type_tree` for typing a single
//! expression outside of any module.

pub mod ast;
pub mod lift;
pub mod position;
pub mod typechecker;
pub mod types;

pub use ast::{Apply, IdReference, Lambda, RawExpr, RawLet, RawModule};
pub use position::Position;
pub use typechecker::error::{TypeCheckError, TypeResult};
pub use typechecker::scope::{Scope, Symbol, SymbolLocation};
pub use typechecker::typed_ast::{TypedExpr, TypedLet, TypedModule};
pub use typechecker::{prelude, InferenceConfig, Typer};
pub use types::Type;

/// Type a standalone expression outside of any module (spec.md §3's
/// "Lifetimes" note names this entry point `typeTree`). Useful for callers
/// that only need to check a single REPL-style expression against a
/// prelude, without the sibling-clearing semantics of a full module.
pub fn type_tree(expr: RawExpr, prelude_scope: Scope, config: InferenceConfig) -> TypeResult<TypedExpr> {
    let mut typer = Typer::new(prelude_scope, config);
    typer.type_standalone_expr(expr)
}

/// Type every let in `module`, in declaration order, without running the
/// closure lifter (spec.md §3's "Lifetimes" note names this `typeFull`).
pub fn type_full(module: RawModule, prelude_scope: Scope, config: InferenceConfig) -> TypeResult<TypedModule> {
    let mut typer = Typer::new(prelude_scope, config);
    typer.type_module(module)
}

/// Type `module` and then closure-lift the result, the single entry point
/// most callers want.
pub fn type_and_lift(module: RawModule, prelude_scope: Scope, config: InferenceConfig) -> TypeResult<TypedModule> {
    let typed = type_full(module, prelude_scope, config)?;
    Ok(lift::lift_module(typed))
}
