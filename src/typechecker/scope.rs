//! Lexical symbol table (spec.md §3 "Symbol table", §4.2).
//!
//! A stack of [`Frame`]s in strictly LIFO discipline, the innermost frame
//! last, the same shape as the teacher's `typechecker::scope::Scope`, but
//! carrying only what spec.md §3 actually asks for: named symbols, no
//! separate constants/types/methods maps (this language has no structs or
//! user types).

use std::collections::HashMap;

use log::trace;

use crate::types::Type;

/// How a resolved symbol was introduced. Distinguishing `BuiltIn` is what
/// lets the closure lifter (spec.md §4.7) single out built-ins for full
/// application rewriting.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SymbolLocation {
    /// A lambda or let parameter bound in some enclosing scope.
    Argument,
    /// Supplied by the prelude symbol table.
    BuiltIn,
    /// A top-level let of the module being typed, addressed as a static
    /// method once closure lifting has run.
    StaticMethod {
        owning_module: String,
        method_name: String,
        arg_types: Vec<Type>,
        return_type: Type,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub location: SymbolLocation,
}

#[derive(Debug, Clone, Default)]
struct Frame {
    symbols: HashMap<String, Symbol>,
}

/// A pure-invariant violation: the caller tried to pop the root frame.
/// Spec.md §3: "popping the root is a programmer error and must abort".
/// Carries no position of its own. The typer driver attaches whatever
/// node it was processing when it wraps this into a
/// [`crate::typechecker::error::TypeCheckError::ScopeUnderflow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFrameUnderflow;

#[derive(Debug, Clone, Default)]
pub struct Scope {
    frames: Vec<Frame>,
}

impl Scope {
    /// A fresh scope with a single root frame, populated from the prelude.
    pub fn with_prelude(prelude: impl IntoIterator<Item = Symbol>) -> Self {
        let mut root = Frame::default();
        for symbol in prelude {
            root.symbols.insert(symbol.name.clone(), symbol);
        }
        Scope { frames: vec![root] }
    }

    /// Innermost frame wins (spec.md §4.2).
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(name))
            .cloned()
    }

    /// Push a new frame seeded with `symbols`.
    pub fn push(&mut self, symbols: impl IntoIterator<Item = Symbol>) {
        trace!("entering new lexical frame");
        let mut frame = Frame::default();
        for symbol in symbols {
            frame.symbols.insert(symbol.name.clone(), symbol);
        }
        self.frames.push(frame);
    }

    /// Pop the innermost frame. Fails if doing so would leave the stack
    /// empty (i.e. the caller tried to pop the prelude root).
    pub fn pop(&mut self) -> Result<(), RootFrameUnderflow> {
        if self.frames.len() <= 1 {
            return Err(RootFrameUnderflow);
        }
        trace!("exiting lexical frame");
        self.frames.pop();
        Ok(())
    }

    /// Insert (or override) a symbol into the current, innermost frame,
    /// used by [`crate::typechecker::Typer::type_module`] to publish a just-typed
    /// top-level let for subsequent siblings to reference.
    pub fn define(&mut self, symbol: Symbol) {
        let frame = self.frames.last_mut().expect("root frame always present");
        frame.symbols.insert(symbol.name.clone(), symbol);
    }
}
