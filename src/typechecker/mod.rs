//! Hindley-Milner typer driver (spec.md §4.5).
//!
//! A single threaded environment `(scope, substitutions, freshCounter)`,
//! following spec.md §9's "Threaded environment" design note: one mutable
//! context struct passed by `&mut self`, rather than the teacher's
//! per-node-type `TypeCheckable`/`TypedConstruct`/`ShallowCheck` trait set.
//! That trait split exists in the teacher to support a two-stage
//! shallow/deep check and LSP incremental re-checking, neither of which is
//! in scope here (spec.md §1).

pub mod error;
pub mod scope;
pub mod subst;
pub mod typed_ast;
pub mod unify;

use log::{debug, trace};

use crate::ast::{Apply, BoolLiteral, IdReference, IntLiteral, Lambda, RawExpr, RawLet, RawModule, StringLiteral};
use crate::position::Position;
use crate::types::{Type, TypeVarGen, FUNCTION_CONSTRUCTOR};

use self::error::{NotAFunction, ScopeUnderflow, TypeCheckError, TypeResult, UnknownSymbol};
use self::scope::{RootFrameUnderflow, Scope, Symbol, SymbolLocation};
use self::subst::{self, Substitution};
use self::typed_ast::{
    prune_typed_let, TypedApply, TypedBoolLiteral, TypedExpr, TypedIdReference, TypedIntLiteral, TypedLambda,
    TypedLambdaParameter, TypedLet, TypedModule, TypedStringLiteral,
};
use self::unify::unify;

/// Tunable knobs for one typing run (spec.md §5, §9's "Global counter" note
/// kept per-run, never process-wide, so tests get stable, reproducible
/// variable ids).
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Recursion depth guard (spec.md §5: "implementations should guard
    /// stack depth ... for deep inputs"). `None` means unbounded, matching
    /// the teacher's own lack of an explicit guard.
    pub max_depth: Option<usize>,
    /// Starting offset for the fresh type-variable counter.
    pub fresh_var_offset: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        InferenceConfig { max_depth: Some(4096), fresh_var_offset: 0 }
    }
}

/// The threaded inference environment for a single `type_module` (or
/// standalone `type_tree`) invocation.
pub struct Typer {
    scope: Scope,
    subst: Substitution,
    var_gen: TypeVarGen,
    config: InferenceConfig,
    depth: usize,
}

impl Typer {
    pub fn new(prelude: Scope, config: InferenceConfig) -> Self {
        let var_gen = TypeVarGen::starting_at(config.fresh_var_offset);
        Typer { scope: prelude, subst: Substitution::new(), var_gen, config, depth: 0 }
    }

    fn enter(&mut self, position: Position) {
        self.depth += 1;
        if let Some(max) = self.config.max_depth {
            if self.depth > max {
                log::error!("recursion depth {} exceeds configured max {max}; aborting run", self.depth);
                panic!("mlcore: typer recursion depth exceeded configured max_depth ({max})");
            }
        }
        trace!("descending into expression at {position}");
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn pop_scope(&mut self, position: Position) -> TypeResult<()> {
        self.scope
            .pop()
            .map_err(|_: RootFrameUnderflow| TypeCheckError::ScopeUnderflow(ScopeUnderflow, position))
    }

    // -- Literals (spec.md §4.5 "Literal") --------------------------------

    fn type_int_literal(&mut self, lit: IntLiteral) -> TypedExpr {
        TypedExpr::IntLiteral(TypedIntLiteral { value: lit.value, ty: Type::int(), position: lit.position })
    }

    fn type_bool_literal(&mut self, lit: BoolLiteral) -> TypedExpr {
        TypedExpr::BoolLiteral(TypedBoolLiteral { value: lit.value, ty: Type::bool(), position: lit.position })
    }

    fn type_string_literal(&mut self, lit: StringLiteral) -> TypedExpr {
        TypedExpr::StringLiteral(TypedStringLiteral { value: lit.value, ty: Type::string(), position: lit.position })
    }

    // -- IdReference (spec.md §4.5 "IdReference") -------------------------

    fn type_reference(&mut self, reference: IdReference) -> TypeResult<TypedIdReference> {
        let Some(symbol) = self.scope.lookup(&reference.name) else {
            debug!("unknown symbol '{}' at {}", reference.name, reference.position);
            return Err(TypeCheckError::UnknownSymbol(
                UnknownSymbol { name: reference.name.clone() },
                reference.position,
            ));
        };
        Ok(TypedIdReference { ty: symbol.ty.clone(), symbol, position: reference.position })
    }

    // -- Apply (spec.md §4.5 "Apply") --------------------------------------

    /// Types each argument, then peels one arrow off the callee's type per
    /// argument, unifying the peeled parameter against that argument's
    /// type. This is the refinement-type construction of spec.md §4.5 done
    /// incrementally rather than in one shot: building the full
    /// `Function(arg0.tpe, …, Function(argn.tpe, freshVar))` refinement and
    /// unifying it against the callee's type in a single call would, for a
    /// too-short callee, surface as a generic `TypeMismatch` partway through
    /// the nested constructor comparison rather than the `NotAFunction` the
    /// spec calls for. Peeling one arrow at a time lets us detect "ran out
    /// of arrows before running out of arguments" directly.
    fn type_apply(&mut self, apply: Apply) -> TypeResult<TypedExpr> {
        self.enter(apply.position);

        let function = self.type_reference(apply.function)?;

        let mut typed_args = vec![];
        for arg in apply.args {
            typed_args.push(self.type_expr(arg)?);
        }

        let mut current = function.ty.clone();
        for (index, arg) in typed_args.iter().enumerate() {
            match subst::prune(&self.subst, &current) {
                Type::TypeConstructor { name, args } if name == FUNCTION_CONSTRUCTOR && args.len() == 2 => {
                    let mut arrow = args.into_iter();
                    let from = arrow.next().expect("checked len == 2");
                    let to = arrow.next().expect("checked len == 2");
                    unify(&mut self.subst, &from, arg.ty(), apply.position)?;
                    current = to;
                }
                Type::TypeVariable(id) => {
                    let result_var = self.var_gen.fresh();
                    let candidate = Type::function(arg.ty().clone(), result_var.clone());
                    unify(&mut self.subst, &Type::TypeVariable(id), &candidate, apply.position)?;
                    current = result_var;
                }
                _ => {
                    debug!("apply at {} ran out of arrows at argument {index}", apply.position);
                    self.leave();
                    return Err(TypeCheckError::NotAFunction(
                        NotAFunction { callee_type: function.ty.clone(), argument_index: index },
                        apply.position,
                    ));
                }
            }
        }

        let result_ty = subst::prune(&self.subst, &current);

        self.leave();
        Ok(TypedExpr::Apply(TypedApply {
            function,
            args: typed_args,
            ty: result_ty,
            position: apply.position,
        }))
    }

    // -- Lambda (spec.md §4.5 "Lambda") ------------------------------------

    fn type_lambda(&mut self, lambda: Lambda) -> TypeResult<TypedExpr> {
        self.enter(lambda.position);

        let mut param_symbols = vec![];
        for name in &lambda.params {
            let var = self.var_gen.fresh();
            param_symbols.push(Symbol { name: name.clone(), ty: var, location: SymbolLocation::Argument });
        }

        self.scope.push(param_symbols.clone());
        let typed_body = self.type_expr(*lambda.body)?;
        self.pop_scope(lambda.position)?;

        let pruned_params: Vec<TypedLambdaParameter> = param_symbols
            .iter()
            .map(|s| TypedLambdaParameter {
                name: s.name.clone(),
                ty: subst::recursive_prune(&self.subst, &s.ty),
            })
            .collect();
        let pruned_body_ty = subst::recursive_prune(&self.subst, typed_body.ty());

        let lambda_ty = Type::function_n(pruned_body_ty, pruned_params.iter().map(|p| p.ty.clone()).collect());

        self.leave();
        Ok(TypedExpr::Lambda(TypedLambda {
            params: pruned_params,
            body: Box::new(typed_body),
            ty: lambda_ty,
            position: lambda.position,
        }))
    }

    // -- dispatch -----------------------------------------------------------

    /// Types a bare expression tree outside of any module. Spec.md §3's
    /// "Lifetimes" note names this entry point `typeTree`. Exposed for
    /// callers that only need to check a single expression against a
    /// prelude, without a module's sibling-clearing semantics.
    pub fn type_standalone_expr(&mut self, expr: RawExpr) -> TypeResult<TypedExpr> {
        self.type_expr(expr)
    }

    fn type_expr(&mut self, expr: RawExpr) -> TypeResult<TypedExpr> {
        match expr {
            RawExpr::IntLiteral(lit) => Ok(self.type_int_literal(lit)),
            RawExpr::BoolLiteral(lit) => Ok(self.type_bool_literal(lit)),
            RawExpr::StringLiteral(lit) => Ok(self.type_string_literal(lit)),
            RawExpr::IdReference(reference) => Ok(TypedExpr::IdReference(self.type_reference(reference)?)),
            RawExpr::Apply(apply) => self.type_apply(apply),
            RawExpr::Lambda(lambda) => self.type_lambda(lambda),
        }
    }

    // -- Let (spec.md §4.5 "Let") --------------------------------------------

    fn type_let(&mut self, the_let: RawLet) -> TypeResult<TypedLet> {
        self.enter(the_let.position);

        let (declared_arg_types, declared_result_ty) = match &the_let.declared_type {
            Some(declared) => {
                let (args, result) = declared.deconstruct_args_bounded(the_let.params.len());
                (Some(args), Some(result))
            }
            None => (None, None),
        };

        let mut param_symbols = vec![];
        for (i, name) in the_let.params.iter().enumerate() {
            let ty = match &declared_arg_types {
                Some(declared) if i < declared.len() => declared[i].clone(),
                _ => self.var_gen.fresh(),
            };
            param_symbols.push(Symbol { name: name.clone(), ty, location: SymbolLocation::Argument });
        }

        self.scope.push(param_symbols.clone());
        let typed_body = self.type_expr(the_let.body)?;
        self.pop_scope(the_let.position)?;

        let result_ty = match declared_result_ty {
            Some(declared) => unify(&mut self.subst, typed_body.ty(), &declared, the_let.position)?,
            None => typed_body.ty().clone(),
        };

        let pruned_params: Vec<TypedLambdaParameter> = param_symbols
            .iter()
            .map(|s| TypedLambdaParameter {
                name: s.name.clone(),
                ty: subst::recursive_prune(&self.subst, &s.ty),
            })
            .collect();
        let pruned_result_ty = subst::recursive_prune(&self.subst, &result_ty);

        let let_ty = Type::function_n(pruned_result_ty, pruned_params.iter().map(|p| p.ty.clone()).collect());

        self.leave();
        Ok(TypedLet {
            name: the_let.name,
            params: pruned_params,
            body: typed_body,
            ty: let_ty,
            position: the_let.position,
        })
    }

    // -- Module (spec.md §4.5 "Module") --------------------------------------

    /// Type every let in declaration order, pruning each one and clearing
    /// the substitution store between siblings (spec.md §3, §8 invariant
    /// 5) so a sibling's inference never leaks into the next.
    pub fn type_module(&mut self, module: RawModule) -> TypeResult<TypedModule> {
        let mut typed_lets = vec![];

        for raw_let in module.lets {
            let name = raw_let.name.clone();
            let typed = self.type_let(raw_let)?;
            let pruned = prune_typed_let(&self.subst, typed);

            self.subst.clear();

            self.scope.define(Symbol {
                name: name.clone(),
                ty: pruned.ty.clone(),
                location: SymbolLocation::StaticMethod {
                    owning_module: module.name.clone(),
                    method_name: name,
                    arg_types: pruned.params.iter().map(|p| p.ty.clone()).collect(),
                    return_type: recursive_return_type(&pruned),
                },
            });

            typed_lets.push(pruned);
        }

        Ok(TypedModule { name: module.name, lets: typed_lets, position: module.position })
    }
}

fn recursive_return_type(the_let: &TypedLet) -> Type {
    the_let.ty.deconstruct_args_bounded(the_let.params.len()).1
}

/// Build a prelude [`Scope`] from a list of built-in bindings, the shape
/// every scenario in spec.md §8 starts from.
pub fn prelude(builtins: impl IntoIterator<Item = (String, Type)>) -> Scope {
    Scope::with_prelude(builtins.into_iter().map(|(name, ty)| Symbol {
        name,
        ty,
        location: SymbolLocation::BuiltIn,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Apply, IdReference, IntLiteral, Lambda, RawExpr, RawLet, RawModule};

    fn pos() -> Position {
        Position::default()
    }

    fn id(name: &str) -> IdReference {
        IdReference { name: name.to_string(), position: pos() }
    }

    #[test]
    fn literal_gets_primitive_type() {
        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let typed = typer.type_expr(RawExpr::IntLiteral(IntLiteral { value: 1, position: pos() })).unwrap();
        assert_eq!(typed.ty(), &Type::int());
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let err = typer.type_expr(RawExpr::IdReference(id("missing"))).unwrap_err();
        assert!(matches!(err, TypeCheckError::UnknownSymbol(..)));
    }

    #[test]
    fn monomorphic_identity_application() {
        // let id x = x; let y = id 1
        let identity = RawLet {
            name: "id".into(),
            params: vec!["x".into()],
            declared_type: None,
            body: RawExpr::IdReference(id("x")),
            position: pos(),
        };
        let y = RawLet {
            name: "y".into(),
            params: vec![],
            declared_type: None,
            body: RawExpr::Apply(Apply {
                function: id("id"),
                args: vec![RawExpr::IntLiteral(IntLiteral { value: 1, position: pos() })],
                position: pos(),
            }),
            position: pos(),
        };
        let module = RawModule { name: "main".into(), lets: vec![identity, y], position: pos() };

        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let typed = typer.type_module(module).unwrap();

        assert_eq!(typed.lets[1].ty, Type::int());
    }

    #[test]
    fn arity_mismatch_is_not_a_function() {
        // let f x y = x; f 1 2 3
        let f = RawLet {
            name: "f".into(),
            params: vec!["x".into(), "y".into()],
            declared_type: None,
            body: RawExpr::IdReference(id("x")),
            position: pos(),
        };
        let apply_f = RawLet {
            name: "main".into(),
            params: vec![],
            declared_type: None,
            body: RawExpr::Apply(Apply {
                function: id("f"),
                args: vec![
                    RawExpr::IntLiteral(IntLiteral { value: 1, position: pos() }),
                    RawExpr::IntLiteral(IntLiteral { value: 2, position: pos() }),
                    RawExpr::IntLiteral(IntLiteral { value: 3, position: pos() }),
                ],
                position: pos(),
            }),
            position: pos(),
        };
        let module = RawModule { name: "m".into(), lets: vec![f, apply_f], position: pos() };

        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let err = typer.type_module(module).unwrap_err();
        assert!(matches!(err, TypeCheckError::NotAFunction(..)));
    }

    #[test]
    fn occurs_check_rejects_self_application() {
        // Apply(f, [f]) where f : 't0, `f` applied to itself.
        let f = RawLet {
            name: "apply_self".into(),
            params: vec!["f".into()],
            declared_type: None,
            body: RawExpr::Apply(Apply { function: id("f"), args: vec![RawExpr::IdReference(id("f"))], position: pos() }),
            position: pos(),
        };
        let module = RawModule { name: "m".into(), lets: vec![f], position: pos() };

        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let err = typer.type_module(module).unwrap_err();
        assert!(matches!(err, TypeCheckError::RecursiveUnification(..)));
    }

    #[test]
    fn substitutions_do_not_leak_between_sibling_lets() {
        // let f x = x; let g = f  -- g must not see f's argument variable.
        let f = RawLet {
            name: "f".into(),
            params: vec!["x".into()],
            declared_type: None,
            body: RawExpr::IdReference(id("x")),
            position: pos(),
        };
        let g = RawLet {
            name: "g".into(),
            params: vec![],
            declared_type: None,
            body: RawExpr::IdReference(id("f")),
            position: pos(),
        };
        let module = RawModule { name: "m".into(), lets: vec![f, g], position: pos() };

        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let typed = typer.type_module(module).unwrap();

        // g's type should be exactly f's function type, not further refined
        // by anything that would only be true if state leaked across lets.
        assert_eq!(typed.lets[1].ty, typed.lets[0].ty);
    }

    #[test]
    fn module_cross_reference_sees_function_symbol() {
        // let f x = x; let g x = f x
        let f = RawLet {
            name: "f".into(),
            params: vec!["x".into()],
            declared_type: None,
            body: RawExpr::IdReference(id("x")),
            position: pos(),
        };
        let g = RawLet {
            name: "g".into(),
            params: vec!["x".into()],
            declared_type: None,
            body: RawExpr::Apply(Apply { function: id("f"), args: vec![RawExpr::IdReference(id("x"))], position: pos() }),
            position: pos(),
        };
        let module = RawModule { name: "m".into(), lets: vec![f, g], position: pos() };

        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let typed = typer.type_module(module).unwrap();

        assert_eq!(typed.lets.len(), 2);
    }

    #[test]
    fn lambda_infers_argument_and_body_type() {
        let lambda = Lambda {
            params: vec!["x".into()],
            body: Box::new(RawExpr::IdReference(id("x"))),
            position: pos(),
        };
        let mut typer = Typer::new(prelude([]), InferenceConfig::default());
        let typed = typer.type_expr(RawExpr::Lambda(lambda)).unwrap();
        assert!(typed.ty().is_function());
    }
}
