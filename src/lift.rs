//! Closure lifting (spec.md §4.7).
//!
//! Rewrites partial applications of a typed module's lets into full
//! applications of synthesised top-level helpers, so a downstream code
//! generator (out of scope here, spec.md §1) never has to materialise a
//! closure object. Grounded in the teacher's own closure-capture analysis
//! in `why_lib`'s `typechecker::typed_ast::expression::lambda`; that code
//! walks a lambda body collecting free variables to build a capture list;
//! this lifter performs a structurally similar single recursive walk, but
//! rewrites `Apply` nodes instead of collecting captures, since this
//! language's partial applications are lifted to top-level helpers rather
//! than closure values.

use crate::position::Position;
use crate::typechecker::scope::{Symbol, SymbolLocation};
use crate::typechecker::typed_ast::{TypedApply, TypedExpr, TypedIdReference, TypedLambdaParameter, TypedLet, TypedModule};
use crate::types::Type;

/// Per-source-let lifting state: the helpers discovered so far (prepended
/// as encountered, per spec.md §4.7 "Ordering & determinism") and the two
/// independent monotonic counters.
struct LiftState {
    helpers: Vec<TypedLet>,
    lambda_counter: usize,
    curied_counter: usize,
}

impl LiftState {
    fn new() -> Self {
        LiftState { helpers: vec![], lambda_counter: 0, curied_counter: 0 }
    }

    fn next_lambda_name(&mut self, enclosing: &str) -> String {
        let name = format!("{enclosing}$lambda${}", self.lambda_counter);
        self.lambda_counter += 1;
        name
    }

    fn next_curied_name(&mut self, enclosing: &str) -> String {
        let name = format!("{enclosing}$curied${}", self.curied_counter);
        self.curied_counter += 1;
        name
    }
}

/// Lift every let in `module`, in declaration order. Helpers synthesised
/// for a given let are inserted immediately after it, in reverse-discovery
/// order (spec.md §4.7 "Ordering & determinism").
pub fn lift_module(module: TypedModule) -> TypedModule {
    let mut lets = vec![];
    for the_let in module.lets {
        let mut state = LiftState::new();
        let lifted_body = lift_expr(the_let.body, &the_let.name, &module.name, &mut state);
        lets.push(TypedLet { body: lifted_body, ..the_let });
        state.helpers.reverse();
        lets.extend(state.helpers);
    }
    TypedModule { name: module.name, lets, position: module.position }
}

fn lift_expr(expr: TypedExpr, enclosing_let: &str, enclosing_module: &str, state: &mut LiftState) -> TypedExpr {
    match expr {
        TypedExpr::Apply(apply) => lift_apply(apply, enclosing_let, enclosing_module, state),
        TypedExpr::Lambda(mut lambda) => {
            lambda.body = Box::new(lift_expr(*lambda.body, enclosing_let, enclosing_module, state));
            TypedExpr::Lambda(lambda)
        }
        other => other,
    }
}

fn lift_apply(apply: TypedApply, enclosing_let: &str, enclosing_module: &str, state: &mut LiftState) -> TypedExpr {
    let arity = apply.function.ty.arity();
    let supplied = apply.args.len();

    if supplied >= arity {
        return TypedExpr::Apply(recurse_into_args(apply, enclosing_let, enclosing_module, state));
    }

    let missing = arity - supplied;
    let is_builtin = matches!(apply.function.symbol.location, SymbolLocation::BuiltIn);

    if is_builtin {
        lift_builtin_partial_application(apply, enclosing_let, enclosing_module, state)
    } else if missing > 1 {
        lift_curried_partial_application(apply, enclosing_let, enclosing_module, state)
    } else {
        // Exactly one argument missing on a non-built-in: nothing left to
        // lift, the callee already accepts this shape as a direct partial
        // call (spec.md §8 invariant 8 only forbids *more than one* missing
        // argument on non-built-ins).
        TypedExpr::Apply(recurse_into_args(apply, enclosing_let, enclosing_module, state))
    }
}

fn recurse_into_args(apply: TypedApply, enclosing_let: &str, enclosing_module: &str, state: &mut LiftState) -> TypedApply {
    TypedApply {
        args: apply
            .args
            .into_iter()
            .map(|a| lift_expr(a, enclosing_let, enclosing_module, state))
            .collect(),
        ..apply
    }
}

/// Spec.md §4.7 step 1: a partial application of a built-in.
fn lift_builtin_partial_application(
    apply: TypedApply,
    enclosing_let: &str,
    enclosing_module: &str,
    state: &mut LiftState,
) -> TypedExpr {
    let (all_arg_types, return_type) = apply.function.ty.deconstruct_args();
    let helper_name = state.next_lambda_name(enclosing_let);

    let helper = build_full_application_helper(
        &helper_name,
        &all_arg_types,
        &return_type,
        apply.function.clone(),
        apply.position,
    );
    state.helpers.push(helper);

    rewrite_to_helper_call(apply, helper_name, all_arg_types, return_type, enclosing_module, enclosing_let, state)
}

/// Spec.md §4.7 step 2: a partial application missing more than one
/// argument on a non-built-in callee.
fn lift_curried_partial_application(
    apply: TypedApply,
    enclosing_let: &str,
    enclosing_module: &str,
    state: &mut LiftState,
) -> TypedExpr {
    let new_len = apply.args.len() + 1;
    let (arg_types, residual_ty) = apply.function.ty.deconstruct_args_bounded(new_len);
    let helper_name = state.next_curied_name(enclosing_let);

    let params: Vec<TypedLambdaParameter> = arg_types
        .iter()
        .enumerate()
        .map(|(i, ty)| TypedLambdaParameter { name: format!("arg{i}"), ty: ty.clone() })
        .collect();

    let param_refs: Vec<TypedExpr> = params
        .iter()
        .map(|p| {
            TypedExpr::IdReference(TypedIdReference {
                symbol: Symbol { name: p.name.clone(), ty: p.ty.clone(), location: SymbolLocation::Argument },
                ty: p.ty.clone(),
                position: apply.position,
            })
        })
        .collect();

    let helper_original_ty = Type::function_n(residual_ty.clone(), arg_types.clone());
    let body = TypedExpr::Apply(TypedApply {
        function: apply.function.clone(),
        args: param_refs,
        ty: residual_ty.clone(),
        position: apply.position,
    });
    let lifted_body = lift_expr(body, &helper_name, enclosing_module, state);

    let helper = TypedLet {
        name: helper_name.clone(),
        params,
        body: lifted_body,
        ty: helper_original_ty,
        position: apply.position,
    };
    state.helpers.push(helper);

    rewrite_to_helper_call(apply, helper_name, arg_types, residual_ty, enclosing_module, enclosing_let, state)
}

fn build_full_application_helper(
    helper_name: &str,
    all_arg_types: &[Type],
    return_type: &Type,
    original_function: TypedIdReference,
    position: Position,
) -> TypedLet {
    let params: Vec<TypedLambdaParameter> = all_arg_types
        .iter()
        .enumerate()
        .map(|(i, ty)| TypedLambdaParameter { name: format!("arg{i}"), ty: ty.clone() })
        .collect();

    let args: Vec<TypedExpr> = params
        .iter()
        .map(|p| {
            TypedExpr::IdReference(TypedIdReference {
                symbol: Symbol { name: p.name.clone(), ty: p.ty.clone(), location: SymbolLocation::Argument },
                ty: p.ty.clone(),
                position,
            })
        })
        .collect();

    let body = TypedExpr::Apply(TypedApply {
        function: original_function,
        args,
        ty: return_type.clone(),
        position,
    });

    TypedLet {
        name: helper_name.to_string(),
        params,
        ty: Type::function_n(return_type.clone(), all_arg_types.to_vec()),
        body,
        position,
    }
}

/// Rewrites the original partial `apply` node into a call to the just
/// synthesised helper, recursively lifting the partial argument list it
/// still carries (spec.md §4.7 step 1/2: "carried with the same partial
/// argument list (each recursively lifted)").
fn rewrite_to_helper_call(
    apply: TypedApply,
    helper_name: String,
    all_arg_types: Vec<Type>,
    return_type: Type,
    enclosing_module: &str,
    enclosing_let: &str,
    state: &mut LiftState,
) -> TypedExpr {
    let helper_ty = Type::function_n(return_type.clone(), all_arg_types.clone());
    let helper_ref = TypedIdReference {
        symbol: Symbol {
            name: helper_name.clone(),
            ty: helper_ty.clone(),
            location: SymbolLocation::StaticMethod {
                owning_module: enclosing_module.to_string(),
                method_name: helper_name,
                arg_types: all_arg_types,
                return_type,
            },
        },
        ty: helper_ty,
        position: apply.position,
    };

    let lifted_args: Vec<TypedExpr> = apply
        .args
        .into_iter()
        .map(|a| lift_expr(a, enclosing_let, enclosing_module, state))
        .collect();

    TypedExpr::Apply(TypedApply { function: helper_ref, args: lifted_args, ty: apply.ty, position: apply.position })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::typechecker::typed_ast::TypedIntLiteral;

    fn pos() -> Position {
        Position::default()
    }

    fn add_symbol() -> Symbol {
        Symbol {
            name: "add".into(),
            ty: Type::function_n(Type::int(), vec![Type::int(), Type::int()]),
            location: SymbolLocation::BuiltIn,
        }
    }

    fn int_lit(v: i64) -> TypedExpr {
        TypedExpr::IntLiteral(TypedIntLiteral { value: v, ty: Type::int(), position: pos() })
    }

    #[test]
    fn partial_application_of_a_builtin_is_lifted_to_a_full_call_helper() {
        // let inc = add 1
        let add = add_symbol();
        let apply = TypedApply {
            function: TypedIdReference { symbol: add.clone(), ty: add.ty.clone(), position: pos() },
            args: vec![int_lit(1)],
            ty: Type::function(Type::int(), Type::int()),
            position: pos(),
        };
        let inc = TypedLet {
            name: "inc".into(),
            params: vec![],
            body: TypedExpr::Apply(apply),
            ty: Type::function(Type::int(), Type::int()),
            position: pos(),
        };
        let module = TypedModule { name: "m".into(), lets: vec![inc], position: pos() };

        let lifted = lift_module(module);

        assert_eq!(lifted.lets.len(), 2);
        assert_eq!(lifted.lets[1].name, "inc$lambda$0");
        assert_eq!(lifted.lets[1].params.len(), 2);

        let TypedExpr::Apply(rewritten) = &lifted.lets[0].body else { panic!("expected Apply") };
        assert_eq!(rewritten.function.symbol.name, "inc$lambda$0");
        assert_eq!(rewritten.args.len(), 1);
    }

    #[test]
    fn curried_lift_of_a_ternary_missing_two_arguments() {
        // f : A -> B -> C -> D; g x = f x
        let a = Type::constructor("A", vec![]);
        let b = Type::constructor("B", vec![]);
        let c = Type::constructor("C", vec![]);
        let d = Type::constructor("D", vec![]);
        let f_ty = Type::function_n(d.clone(), vec![a.clone(), b.clone(), c.clone()]);
        let f_symbol = Symbol {
            name: "f".into(),
            ty: f_ty.clone(),
            location: SymbolLocation::StaticMethod {
                owning_module: "m".into(),
                method_name: "f".into(),
                arg_types: vec![a.clone(), b.clone(), c.clone()],
                return_type: d.clone(),
            },
        };
        let x_ref = TypedExpr::IdReference(TypedIdReference {
            symbol: Symbol { name: "x".into(), ty: a.clone(), location: SymbolLocation::Argument },
            ty: a.clone(),
            position: pos(),
        });
        let apply = TypedApply {
            function: TypedIdReference { symbol: f_symbol, ty: f_ty, position: pos() },
            args: vec![x_ref],
            ty: Type::function(b.clone(), Type::function(c.clone(), d.clone())),
            position: pos(),
        };
        let g = TypedLet {
            name: "g".into(),
            params: vec![TypedLambdaParameter { name: "x".into(), ty: a.clone() }],
            body: TypedExpr::Apply(apply),
            ty: Type::function(a, Type::function(b, Type::function(c, d))),
            position: pos(),
        };
        let module = TypedModule { name: "m".into(), lets: vec![g], position: pos() };

        let lifted = lift_module(module);

        assert_eq!(lifted.lets.len(), 2);
        assert_eq!(lifted.lets[1].name, "g$curied$0");
        assert_eq!(lifted.lets[1].params.len(), 2);

        let TypedExpr::Apply(rewritten) = &lifted.lets[0].body else { panic!("expected Apply") };
        assert_eq!(rewritten.function.symbol.name, "g$curied$0");
        assert_eq!(rewritten.args.len(), 1);
    }

    #[test]
    fn full_application_is_left_untouched() {
        let add = add_symbol();
        let apply = TypedApply {
            function: TypedIdReference { symbol: add.clone(), ty: add.ty.clone(), position: pos() },
            args: vec![int_lit(1), int_lit(2)],
            ty: Type::int(),
            position: pos(),
        };
        let sum = TypedLet {
            name: "sum".into(),
            params: vec![],
            body: TypedExpr::Apply(apply),
            ty: Type::int(),
            position: pos(),
        };
        let module = TypedModule { name: "m".into(), lets: vec![sum], position: pos() };

        let lifted = lift_module(module);

        assert_eq!(lifted.lets.len(), 1);
        let TypedExpr::Apply(unchanged) = &lifted.lets[0].body else { panic!("expected Apply") };
        assert_eq!(unchanged.function.symbol.name, "add");
    }
}
