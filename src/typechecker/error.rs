//! Error kinds surfaced by the typer and unifier (spec.md §7).
//!
//! Follows the teacher's convention of one small struct per error kind with
//! the enclosing enum only dispatching `Display`/`Error`, see
//! `why_lib`'s `typechecker::error::TypeCheckError`.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use colored::Colorize;

use crate::position::Position;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCheckError {
    UnknownSymbol(UnknownSymbol, Position),
    TypeMismatch(TypeMismatch, Position),
    RecursiveUnification(RecursiveUnification, Position),
    NotAFunction(NotAFunction, Position),
    ClassUnificationUnsupported(ClassUnificationUnsupported, Position),
    ScopeUnderflow(ScopeUnderflow, Position),
}

impl TypeCheckError {
    pub fn position(&self) -> Position {
        match self {
            TypeCheckError::UnknownSymbol(_, p) => *p,
            TypeCheckError::TypeMismatch(_, p) => *p,
            TypeCheckError::RecursiveUnification(_, p) => *p,
            TypeCheckError::NotAFunction(_, p) => *p,
            TypeCheckError::ClassUnificationUnsupported(_, p) => *p,
            TypeCheckError::ScopeUnderflow(_, p) => *p,
        }
    }

    fn inner(&self) -> Box<dyn Error> {
        match self {
            TypeCheckError::UnknownSymbol(e, _) => Box::new(e.clone()),
            TypeCheckError::TypeMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::RecursiveUnification(e, _) => Box::new(e.clone()),
            TypeCheckError::NotAFunction(e, _) => Box::new(e.clone()),
            TypeCheckError::ClassUnificationUnsupported(e, _) => Box::new(e.clone()),
            TypeCheckError::ScopeUnderflow(e, _) => Box::new(e.clone()),
        }
    }
}

impl Display for TypeCheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            format!("[{}]", self.position()).dimmed(),
            self.inner()
        )
    }
}

impl Error for TypeCheckError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSymbol {
    pub name: String,
}

impl Display for UnknownSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", "unknown symbol".red(), self.name)
    }
}

impl Error for UnknownSymbol {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: Type,
    pub actual: Type,
}

impl Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected '{}' but got '{}'",
            "type mismatch".red(),
            self.expected,
            self.actual
        )
    }
}

impl Error for TypeMismatch {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursiveUnification {
    pub variable: Type,
    pub inside: Type,
}

impl Display for RecursiveUnification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' occurs in '{}'",
            "recursive type".red(),
            self.variable,
            self.inside
        )
    }
}

impl Error for RecursiveUnification {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotAFunction {
    pub callee_type: Type,
    pub argument_index: usize,
}

impl Display for NotAFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' does not accept argument {}",
            "not a function".red(),
            self.callee_type,
            self.argument_index
        )
    }
}

impl Error for NotAFunction {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnificationUnsupported {
    pub left: Option<String>,
    pub right: Option<String>,
}

impl Display for ClassUnificationUnsupported {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: predicates {:?} and {:?} are not equal",
            "unsupported class unification".red(),
            self.left,
            self.right
        )
    }
}

impl Error for ClassUnificationUnsupported {}

/// Internal invariant break: popping a scope with no predecessor frame.
/// Always a programmer error in the caller driving the typer, never a
/// consequence of the program under inference (spec.md §3, §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeUnderflow;

impl Display for ScopeUnderflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "scope stack underflow".red())
    }
}

impl Error for ScopeUnderflow {}

pub type TypeResult<T> = Result<T, TypeCheckError>;
