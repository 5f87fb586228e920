//! Type representation (spec.md §3, §4.1).
//!
//! Mirrors the teacher's `typechecker::types::Type` in spirit: a flat,
//! serializable sum type used throughout inference, unification and the
//! closure lifter, but shaped for Hindley-Milner inference rather than the
//! teacher's monomorphic, slot-based `Type`: variables are a first-class
//! variant here (`TypeVariable`) instead of being hidden behind a
//! `Rc<RefCell<Option<Type>>>` on every AST node.

use std::fmt::{self, Display, Formatter};

pub const FUNCTION_CONSTRUCTOR: &str = "Function";

/// A type. See spec.md §3 "Type is a sum of four variants".
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Type {
    /// A fresh, globally unique (within one typing run) type variable.
    TypeVariable(u64),
    /// A named constructor applied to an ordered list of argument types.
    /// The distinguished name [`FUNCTION_CONSTRUCTOR`] with exactly two
    /// arguments encodes a unary function type; curried functions are
    /// right-associated chains of these.
    TypeConstructor { name: String, args: Vec<Type> },
    /// A type qualified by an optional class predicate. Only the predicate
    /// name participates in equality beyond the underlying type; there is
    /// no class environment (spec.md §9 "Qualified types").
    QualifiedType {
        predicate: Option<String>,
        underlying: Box<Type>,
    },
}

impl Type {
    pub fn constructor(name: impl Into<String>, args: Vec<Type>) -> Type {
        Type::TypeConstructor {
            name: name.into(),
            args,
        }
    }

    pub fn int() -> Type {
        Type::constructor("Int", vec![])
    }

    pub fn bool() -> Type {
        Type::constructor("Bool", vec![])
    }

    pub fn string() -> Type {
        Type::constructor("String", vec![])
    }

    /// `from -> to`, the two-argument `Function` constructor.
    pub fn function(from: Type, to: Type) -> Type {
        Type::constructor(FUNCTION_CONSTRUCTOR, vec![from, to])
    }

    /// Folds `args` right-to-left around `result` to build a curried
    /// function type: `FunctionN(result, [a, b, c])` == `a -> b -> c -> result`.
    pub fn function_n(result: Type, args: Vec<Type>) -> Type {
        args.into_iter()
            .rev()
            .fold(result, |acc, arg| Type::function(arg, acc))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::TypeConstructor { name, args } if name == FUNCTION_CONSTRUCTOR && args.len() == 2)
    }

    /// Flattens a curried function type into its full argument list and
    /// final return type. Non-function types return an empty argument list
    /// and themselves as the "return type".
    pub fn deconstruct_args(&self) -> (Vec<Type>, Type) {
        let mut args = vec![];
        let mut current = self.clone();
        while let Type::TypeConstructor { name, mut args: fn_args } = current.clone() {
            if name != FUNCTION_CONSTRUCTOR || fn_args.len() != 2 {
                break;
            }
            let to = fn_args.pop().expect("checked len == 2");
            let from = fn_args.pop().expect("checked len == 2");
            args.push(from);
            current = to;
        }
        (args, current)
    }

    /// Bounded variant of [`Type::deconstruct_args`]: stops after peeling
    /// at most `k` arrows, treating whatever remains (possibly still a
    /// function type) as the residual "return type" (spec.md §4.1).
    pub fn deconstruct_args_bounded(&self, k: usize) -> (Vec<Type>, Type) {
        let mut args = vec![];
        let mut current = self.clone();
        for _ in 0..k {
            match current.clone() {
                Type::TypeConstructor { name, mut args: fn_args }
                    if name == FUNCTION_CONSTRUCTOR && fn_args.len() == 2 =>
                {
                    let to = fn_args.pop().expect("checked len == 2");
                    let from = fn_args.pop().expect("checked len == 2");
                    args.push(from);
                    current = to;
                }
                _ => break,
            }
        }
        (args, current)
    }

    /// Arity: how many arrows this type peels before hitting a non-function
    /// result. Used by the closure lifter to recognise partial applications.
    pub fn arity(&self) -> usize {
        self.deconstruct_args().0.len()
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::TypeVariable(id) => write!(f, "'t{id}"),
            Type::TypeConstructor { name, args } if name == FUNCTION_CONSTRUCTOR && args.len() == 2 => {
                write!(f, "({} -> {})", args[0], args[1])
            }
            Type::TypeConstructor { name, args } if args.is_empty() => write!(f, "{name}"),
            Type::TypeConstructor { name, args } => {
                let joined = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "{name}<{joined}>")
            }
            Type::QualifiedType { predicate: Some(p), underlying } => write!(f, "{p} => {underlying}"),
            Type::QualifiedType { predicate: None, underlying } => write!(f, "{underlying}"),
        }
    }
}

/// Monotonically increasing counter producing fresh type variables, owned
/// by a single typing run (spec.md §3 "Lifetimes", §9 "Global counter").
#[derive(Debug, Clone, Default)]
pub struct TypeVarGen {
    next: u64,
}

impl TypeVarGen {
    pub fn new() -> Self {
        TypeVarGen { next: 0 }
    }

    /// Start counting from `offset`. Used so tests can assert on stable,
    /// predictable variable ids regardless of how many variables an earlier
    /// part of the same test allocated.
    pub fn starting_at(offset: u64) -> Self {
        TypeVarGen { next: offset }
    }

    pub fn fresh(&mut self) -> Type {
        let id = self.next;
        self.next += 1;
        Type::TypeVariable(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_n_folds_right() {
        let t = Type::function_n(Type::int(), vec![Type::bool(), Type::string()]);
        assert_eq!(t, Type::function(Type::bool(), Type::function(Type::string(), Type::int())));
    }

    #[test]
    fn deconstruct_args_round_trips() {
        let t = Type::function_n(Type::int(), vec![Type::bool(), Type::string()]);
        let (args, ret) = t.deconstruct_args();
        assert_eq!(args, vec![Type::bool(), Type::string()]);
        assert_eq!(ret, Type::int());
    }

    #[test]
    fn deconstruct_args_bounded_stops_early() {
        let t = Type::function_n(Type::int(), vec![Type::bool(), Type::string(), Type::int()]);
        let (args, rest) = t.deconstruct_args_bounded(1);
        assert_eq!(args, vec![Type::bool()]);
        assert_eq!(
            rest,
            Type::function_n(Type::int(), vec![Type::string(), Type::int()])
        );
    }

    #[test]
    fn fresh_variables_are_unique() {
        let mut gen = TypeVarGen::new();
        let a = gen.fresh();
        let b = gen.fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn non_function_deconstructs_to_itself() {
        let (args, ret) = Type::int().deconstruct_args();
        assert!(args.is_empty());
        assert_eq!(ret, Type::int());
    }
}
