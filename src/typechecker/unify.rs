//! Unification (spec.md §4.4).
//!
//! Grounded in the `resolve` / `occurs_in` / `unify` split shown by the
//! union-find-based HM unifiers in this corpus (e.g. `mesh-lang`'s
//! `snow-typeck::unify`), adapted to the plain [`Substitution`] map this
//! crate uses instead of an `ena` union-find table, see `DESIGN.md` for
//! why: the spec pins down a deterministic "bind larger id to smaller id"
//! direction and a hard occurs-check failure, both easier to guarantee
//! explicitly than to coax out of a black-box union-find.

use log::debug;

use crate::position::Position;
use crate::types::Type;

use super::error::{ClassUnificationUnsupported, RecursiveUnification, TypeCheckError, TypeMismatch};
use super::subst::{prune, Substitution};

/// Unify `t1` and `t2`, mutating `subst` with whatever bindings are
/// necessary, and return their (partially resolved) common type.
pub fn unify(subst: &mut Substitution, t1: &Type, t2: &Type, pos: Position) -> Result<Type, TypeCheckError> {
    let t1 = prune(subst, t1);
    let t2 = prune(subst, t2);

    match (&t1, &t2) {
        // 1. Both qualified.
        (
            Type::QualifiedType { predicate: p1, underlying: u1 },
            Type::QualifiedType { predicate: p2, underlying: u2 },
        ) => {
            if p1 != p2 {
                debug!("unify: incompatible predicates {p1:?} vs {p2:?}");
                return Err(TypeCheckError::ClassUnificationUnsupported(
                    ClassUnificationUnsupported { left: p1.clone(), right: p2.clone() },
                    pos,
                ));
            }
            let unified_underlying = unify(subst, u1, u2, pos)?;
            Ok(Type::QualifiedType {
                predicate: p1.clone(),
                underlying: Box::new(unified_underlying),
            })
        }

        // 2. Both variables.
        (Type::TypeVariable(i), Type::TypeVariable(j)) => {
            if i == j {
                Ok(t1)
            } else {
                // Canonical direction: bind the larger id to the smaller,
                // keeping chains shallow and deterministic (spec.md §4.4).
                let (larger, smaller) = if i > j { (*i, *j) } else { (*j, *i) };
                subst.bind(larger, Type::TypeVariable(smaller));
                subst.compress_through(larger);
                Ok(Type::TypeVariable(smaller))
            }
        }

        // 3. Variable vs. non-variable.
        (Type::TypeVariable(id), other) | (other, Type::TypeVariable(id)) => {
            if occurs_check(subst, *id, other) {
                debug!("unify: occurs check failed binding t{id} into {other}");
                return Err(TypeCheckError::RecursiveUnification(
                    RecursiveUnification { variable: Type::TypeVariable(*id), inside: other.clone() },
                    pos,
                ));
            }
            subst.bind(*id, other.clone());
            subst.compress_through(*id);
            Ok(other.clone())
        }

        // 5. Both constructors.
        (
            Type::TypeConstructor { name: n1, args: a1 },
            Type::TypeConstructor { name: n2, args: a2 },
        ) => {
            if n1 != n2 || a1.len() != a2.len() {
                debug!("unify: mismatched constructors {t1} vs {t2}");
                return Err(TypeCheckError::TypeMismatch(
                    TypeMismatch { expected: t1.clone(), actual: t2.clone() },
                    pos,
                ));
            }
            let mut unified_args = vec![];
            for (x, y) in a1.iter().zip(a2.iter()) {
                unified_args.push(unify(subst, x, y, pos)?);
            }
            Ok(Type::TypeConstructor { name: n1.clone(), args: unified_args })
        }

        // Constructor vs. qualified (asymmetric): only one side carries a
        // predicate, so there is no predicate equality to check (spec.md §3
        // "only the underlying participates in unification unless both
        // sides carry equal predicates"). Unify the bare constructor against
        // the qualified side's underlying and keep the predicate.
        (Type::QualifiedType { predicate, underlying }, other @ Type::TypeConstructor { .. })
        | (other @ Type::TypeConstructor { .. }, Type::QualifiedType { predicate, underlying }) => {
            let unified_underlying = unify(subst, underlying, other, pos)?;
            Ok(Type::QualifiedType { predicate: predicate.clone(), underlying: Box::new(unified_underlying) })
        }
    }
}

/// Does the type variable `id` occur anywhere inside `ty`? Descends into
/// constructor arguments and qualified underlyings; a bare variable is
/// compared structurally (spec.md §4.4).
fn occurs_check(subst: &Substitution, id: u64, ty: &Type) -> bool {
    match prune(subst, ty) {
        Type::TypeVariable(other) => other == id,
        Type::TypeConstructor { args, .. } => args.iter().any(|a| occurs_check(subst, id, a)),
        Type::QualifiedType { underlying, .. } => occurs_check(subst, id, &underlying),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::default()
    }

    #[test]
    fn unify_identical_types_adds_no_substitution() {
        let mut subst = Substitution::new();
        let result = unify(&mut subst, &Type::int(), &Type::int(), pos()).unwrap();
        assert_eq!(result, Type::int());
        assert!(subst.get(0).is_none());
    }

    #[test]
    fn unify_binds_a_variable_to_a_concrete_type() {
        let mut subst = Substitution::new();
        let v = Type::TypeVariable(0);
        let result = unify(&mut subst, &v, &Type::int(), pos()).unwrap();
        assert_eq!(result, Type::int());
        assert_eq!(subst.get(0), Some(&Type::int()));
    }

    #[test]
    fn unify_binds_larger_variable_id_to_smaller() {
        let mut subst = Substitution::new();
        unify(&mut subst, &Type::TypeVariable(5), &Type::TypeVariable(2), pos()).unwrap();
        assert_eq!(subst.get(5), Some(&Type::TypeVariable(2)));
        assert!(subst.get(2).is_none());
    }

    #[test]
    fn occurs_check_rejects_infinite_type() {
        let mut subst = Substitution::new();
        let v = Type::TypeVariable(0);
        let fun = Type::function(v.clone(), Type::int());
        let err = unify(&mut subst, &v, &fun, pos()).unwrap_err();
        assert!(matches!(err, TypeCheckError::RecursiveUnification(..)));
    }

    #[test]
    fn mismatched_constructors_fail() {
        let mut subst = Substitution::new();
        let err = unify(&mut subst, &Type::int(), &Type::bool(), pos()).unwrap_err();
        assert!(matches!(err, TypeCheckError::TypeMismatch(..)));
    }

    #[test]
    fn mismatched_arity_fails() {
        let mut subst = Substitution::new();
        let f2 = Type::function_n(Type::int(), vec![Type::int(), Type::int()]);
        let f1 = Type::function(Type::int(), Type::int());
        let err = unify(&mut subst, &f2, &f1, pos()).unwrap_err();
        assert!(matches!(err, TypeCheckError::TypeMismatch(..)));
    }

    #[test]
    fn function_args_unify_pairwise() {
        let mut subst = Substitution::new();
        let v0 = Type::TypeVariable(0);
        let v1 = Type::TypeVariable(1);
        let lhs = Type::function(v0, v1);
        let rhs = Type::function(Type::int(), Type::bool());
        let unified = unify(&mut subst, &lhs, &rhs, pos()).unwrap();
        assert_eq!(unified, Type::function(Type::int(), Type::bool()));
    }

    #[test]
    fn differing_predicates_are_unsupported() {
        let mut subst = Substitution::new();
        let left = Type::QualifiedType { predicate: Some("Eq".into()), underlying: Box::new(Type::int()) };
        let right = Type::QualifiedType { predicate: Some("Ord".into()), underlying: Box::new(Type::int()) };
        let err = unify(&mut subst, &left, &right, pos()).unwrap_err();
        assert!(matches!(err, TypeCheckError::ClassUnificationUnsupported(..)));
    }

    #[test]
    fn equal_predicates_unify_underlying() {
        let mut subst = Substitution::new();
        let left = Type::QualifiedType { predicate: Some("Eq".into()), underlying: Box::new(Type::TypeVariable(0)) };
        let right = Type::QualifiedType { predicate: Some("Eq".into()), underlying: Box::new(Type::int()) };
        let unified = unify(&mut subst, &left, &right, pos()).unwrap();
        assert_eq!(
            unified,
            Type::QualifiedType { predicate: Some("Eq".into()), underlying: Box::new(Type::int()) }
        );
    }

    #[test]
    fn qualified_unifies_against_a_bare_constructor_on_either_side() {
        let mut subst = Substitution::new();
        let qualified = Type::QualifiedType { predicate: Some("Eq".into()), underlying: Box::new(Type::TypeVariable(0)) };
        let unified = unify(&mut subst, &qualified, &Type::int(), pos()).unwrap();
        assert_eq!(
            unified,
            Type::QualifiedType { predicate: Some("Eq".into()), underlying: Box::new(Type::int()) }
        );

        let mut subst = Substitution::new();
        let qualified = Type::QualifiedType { predicate: None, underlying: Box::new(Type::TypeVariable(0)) };
        let unified = unify(&mut subst, &Type::int(), &qualified, pos()).unwrap();
        assert_eq!(unified, Type::QualifiedType { predicate: None, underlying: Box::new(Type::int()) });
    }
}
