//! Declarations as handed over by a front-end: everything is in locally-nameless form,
//! binders are free variables with unique identifiers.

use crate::syntax::core::{Bind, Pat, Term};
use crate::syntax::{Ident, Loc, Universe, UID};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Surface patterns: constructor trees over variables and wildcards, inaccessible terms and
/// terms that evaluate to constructor forms.
pub type Pattern = Pat<UID, Term>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Equation {
    pub loc: Loc,
    pub pats: Vec<Pattern>,
    pub rhs: Term,
}

impl Equation {
    pub fn new(loc: Loc, pats: Vec<Pattern>, rhs: Term) -> Self {
        Self { loc, pats, rhs }
    }
}

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} := {}", self.pats.iter().join(" "), self.rhs)
    }
}

/// A definition by ordered equations.
///
/// `params` are fixed for the whole definition and never matched on; right-hand sides refer
/// to the definition itself through `self_var`, applied to the matched arguments only.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Definition {
    pub loc: Loc,
    pub name: Ident,
    pub params: Vec<Bind>,
    pub args: Vec<Bind>,
    /// May mention the parameters and the arguments.
    pub target: Term,
    pub self_var: UID,
    pub equations: Vec<Equation>,
}

impl Definition {
    pub fn new(name: Ident, self_var: UID, target: Term) -> Self {
        Self {
            loc: name.loc,
            name,
            params: Vec::new(),
            args: Vec::new(),
            target,
            self_var,
            equations: Vec::new(),
        }
    }

    pub fn param(mut self, name: UID, ty: Term) -> Self {
        self.params.push(Bind::from((name, ty)));
        self
    }

    pub fn arg(mut self, name: UID, ty: Term) -> Self {
        self.args.push(Bind::from((name, ty)));
        self
    }

    pub fn equation(self, pats: Vec<Pattern>, rhs: Term) -> Self {
        self.equation_at(Loc::default(), pats, rhs)
    }

    pub fn equation_at(mut self, loc: Loc, pats: Vec<Pattern>, rhs: Term) -> Self {
        self.equations.push(Equation::new(loc, pats, rhs));
        self
    }

    /// A recursive reference for right-hand sides.
    pub fn recurse(&self, args: Vec<Term>) -> Term {
        Term::free(self.self_var).apply(args)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ConsDecl {
    pub loc: Loc,
    pub name: Ident,
    /// Each type may mention the family parameters and the previous fields.
    pub fields: Vec<Bind>,
    /// Result indices, may mention the family parameters and all fields.
    pub indices: Vec<Term>,
}

impl ConsDecl {
    pub fn new(name: Ident) -> Self {
        Self {
            loc: name.loc,
            name,
            fields: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn field(mut self, name: UID, ty: Term) -> Self {
        self.fields.push(Bind::from((name, ty)));
        self
    }

    pub fn index(mut self, index: Term) -> Self {
        self.indices.push(index);
        self
    }
}

/// An inductive family. Recursive occurrences are written as `self_var` applied to the
/// parameters and indices.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataDecl {
    pub loc: Loc,
    pub name: Ident,
    pub self_var: UID,
    pub params: Vec<Bind>,
    pub indices: Vec<Bind>,
    pub universe: Universe,
    pub conses: Vec<ConsDecl>,
}

impl DataDecl {
    pub fn new(name: Ident, self_var: UID) -> Self {
        Self {
            loc: name.loc,
            name,
            self_var,
            params: Vec::new(),
            indices: Vec::new(),
            universe: Universe(0),
            conses: Vec::new(),
        }
    }

    pub fn param(mut self, name: UID, ty: Term) -> Self {
        self.params.push(Bind::from((name, ty)));
        self
    }

    pub fn index(mut self, name: UID, ty: Term) -> Self {
        self.indices.push(Bind::from((name, ty)));
        self
    }

    pub fn cons(mut self, cons: ConsDecl) -> Self {
        self.conses.push(cons);
        self
    }

    /// The family applied to its parameters and `indices`, for constructor fields.
    pub fn recurse(&self, indices: Vec<Term>) -> Term {
        let params = self.params.iter().map(|b| Term::free(b.name));
        Term::free(self.self_var).apply(params.chain(indices).collect())
    }
}
