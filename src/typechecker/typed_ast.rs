//! Typed AST (spec.md §3 "Typed AST").
//!
//! Mirrors the raw AST node-for-node, but every node now carries a resolved
//! [`Type`] and references carry a resolved [`Symbol`]. Unlike the teacher's
//! `TypeInformation` (a `Rc<RefCell<Option<Type>>>` shared mutable slot
//! threaded through every node so later unifications can update earlier
//! nodes in place), these nodes hold a plain `Type` value: this crate's
//! substitution store (spec.md §4.3) is the single source of truth during
//! inference, and the prune pass (§4.6, [`prune_typed_let`]) is the one
//! place that rewrites the already-built tree afterwards.

use crate::position::Position;
use crate::typechecker::scope::Symbol;
use crate::typechecker::subst::{recursive_prune, Substitution};
use crate::types::Type;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedIdReference {
    pub symbol: Symbol,
    pub ty: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedIntLiteral {
    pub value: i64,
    pub ty: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedBoolLiteral {
    pub value: bool,
    pub ty: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedStringLiteral {
    pub value: String,
    pub ty: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedApply {
    pub function: TypedIdReference,
    pub args: Vec<TypedExpr>,
    pub ty: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedLambdaParameter {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedLambda {
    pub params: Vec<TypedLambdaParameter>,
    pub body: Box<TypedExpr>,
    pub ty: Type,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TypedExpr {
    IdReference(TypedIdReference),
    IntLiteral(TypedIntLiteral),
    BoolLiteral(TypedBoolLiteral),
    StringLiteral(TypedStringLiteral),
    Apply(TypedApply),
    Lambda(TypedLambda),
}

impl TypedExpr {
    pub fn ty(&self) -> &Type {
        match self {
            TypedExpr::IdReference(e) => &e.ty,
            TypedExpr::IntLiteral(e) => &e.ty,
            TypedExpr::BoolLiteral(e) => &e.ty,
            TypedExpr::StringLiteral(e) => &e.ty,
            TypedExpr::Apply(e) => &e.ty,
            TypedExpr::Lambda(e) => &e.ty,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            TypedExpr::IdReference(e) => e.position,
            TypedExpr::IntLiteral(e) => e.position,
            TypedExpr::BoolLiteral(e) => e.position,
            TypedExpr::StringLiteral(e) => e.position,
            TypedExpr::Apply(e) => e.position,
            TypedExpr::Lambda(e) => e.position,
        }
    }

    fn map_types(self, subst: &Substitution) -> TypedExpr {
        match self {
            TypedExpr::IdReference(mut e) => {
                e.ty = recursive_prune(subst, &e.ty);
                e.symbol.ty = recursive_prune(subst, &e.symbol.ty);
                TypedExpr::IdReference(e)
            }
            TypedExpr::IntLiteral(mut e) => {
                e.ty = recursive_prune(subst, &e.ty);
                TypedExpr::IntLiteral(e)
            }
            TypedExpr::BoolLiteral(mut e) => {
                e.ty = recursive_prune(subst, &e.ty);
                TypedExpr::BoolLiteral(e)
            }
            TypedExpr::StringLiteral(mut e) => {
                e.ty = recursive_prune(subst, &e.ty);
                TypedExpr::StringLiteral(e)
            }
            TypedExpr::Apply(mut e) => {
                e.ty = recursive_prune(subst, &e.ty);
                e.function.ty = recursive_prune(subst, &e.function.ty);
                e.function.symbol.ty = recursive_prune(subst, &e.function.symbol.ty);
                e.args = e.args.into_iter().map(|a| a.map_types(subst)).collect();
                TypedExpr::Apply(e)
            }
            TypedExpr::Lambda(mut e) => {
                e.ty = recursive_prune(subst, &e.ty);
                e.params = e
                    .params
                    .into_iter()
                    .map(|p| TypedLambdaParameter { ty: recursive_prune(subst, &p.ty), ..p })
                    .collect();
                e.body = Box::new(e.body.map_types(subst));
                TypedExpr::Lambda(e)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedLet {
    pub name: String,
    pub params: Vec<TypedLambdaParameter>,
    pub body: TypedExpr,
    pub ty: Type,
    pub position: Position,
}

impl TypedLet {
    fn map_types(self, subst: &Substitution) -> TypedLet {
        TypedLet {
            ty: recursive_prune(subst, &self.ty),
            params: self
                .params
                .into_iter()
                .map(|p| TypedLambdaParameter { ty: recursive_prune(subst, &p.ty), ..p })
                .collect(),
            body: self.body.map_types(subst),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypedModule {
    pub name: String,
    pub lets: Vec<TypedLet>,
    pub position: Position,
}

/// The post-pass of spec.md §4.6: replace every node's type (and every
/// contained symbol's type) with its `recursive_prune`. `subst` should be
/// the substitution accumulated while typing the single let this is run
/// against. Callers invoke this once per let, before clearing the store
/// for the next sibling (spec.md §4.5 "Module").
pub fn prune_typed_let(subst: &Substitution, the_let: TypedLet) -> TypedLet {
    the_let.map_types(subst)
}
