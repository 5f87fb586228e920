//! Substitution store and pruning (spec.md §3, §4.3).
//!
//! A plain `id -> Type` map owned by the typer for the duration of one
//! module's inference and `clear()`-ed between sibling top-level lets
//! (spec.md §8 invariant 5). The teacher's slot-based design
//! (`Rc<RefCell<Option<Type>>>` embedded directly in every typed node)
//! doesn't have an equivalent of this: here the binding is independent of
//! any AST node, which is what lets [`Substitution::clear`] discard all
//! bindings wholesale without touching the AST it annotated.

use std::collections::HashMap;

use crate::types::Type;

#[derive(Debug, Clone, Default)]
pub struct Substitution {
    bindings: HashMap<u64, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    pub fn get(&self, id: u64) -> Option<&Type> {
        self.bindings.get(&id)
    }

    /// Record `id ↦ ty`. Never inserts a trivial `v ↦ v` (spec.md §3
    /// invariant); callers that might produce one should check first, but
    /// this is enforced here too as a last line of defence.
    pub fn bind(&mut self, id: u64, ty: Type) {
        if matches!(ty, Type::TypeVariable(other) if other == id) {
            return;
        }
        self.bindings.insert(id, ty);
    }

    /// Clears every binding. Called between sibling top-level lets so that
    /// inference of one does not leak into another (spec.md §3, §8
    /// invariant 5).
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Path compression (spec.md §9): after binding `id`, re-point every
    /// existing entry that chained through a bare reference to `id` so it
    /// resolves in one hop. An optimisation only: `prune`/`recursive_prune`
    /// are correct without it, just potentially re-entrant.
    pub fn compress_through(&mut self, id: u64) {
        let Some(target) = self.bindings.get(&id).cloned() else {
            return;
        };
        for (_, bound) in self.bindings.iter_mut() {
            if let Type::TypeVariable(other) = bound {
                if *other == id {
                    *bound = target.clone();
                }
            }
        }
    }
}

/// Resolve `t` through the substitution chain one step at a time,
/// non-recursively into constructor arguments (spec.md §4.3 "prune").
pub fn prune(subst: &Substitution, t: &Type) -> Type {
    match t {
        Type::TypeVariable(id) => match subst.get(*id) {
            Some(bound) => prune(subst, bound),
            None => t.clone(),
        },
        other => other.clone(),
    }
}

/// Fully resolves `t`, recursing into constructor arguments and qualified
/// underlyings, re-pruning if a chased substitution turns out to still be
/// a chain (spec.md §4.3 "recursivePrune"). Terminates because each
/// re-entrant call strictly reduces the number of unresolved variables in
/// play, or returns its input unchanged.
pub fn recursive_prune(subst: &Substitution, t: &Type) -> Type {
    match t {
        Type::TypeConstructor { name, args } => Type::TypeConstructor {
            name: name.clone(),
            args: args.iter().map(|a| recursive_prune(subst, a)).collect(),
        },
        Type::QualifiedType { predicate, underlying } => Type::QualifiedType {
            predicate: predicate.clone(),
            underlying: Box::new(recursive_prune(subst, underlying)),
        },
        Type::TypeVariable(_) => {
            let once = prune(subst, t);
            if &once == t {
                once
            } else {
                recursive_prune(subst, &once)
            }
        }
    }
}
