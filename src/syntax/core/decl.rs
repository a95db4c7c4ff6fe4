use crate::syntax::core::{Tele, Term};
use crate::syntax::{Ident, Loc, Universe, GI};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FuncInfo {
    pub loc: Loc,
    pub name: Ident,
    pub signature: Term,
    /// Closed term, a lambda per parameter and argument.
    pub body: Term,
    /// Number of leading lambdas that must be supplied before the body can compute.
    pub arity: usize,
    /// Recursive helpers are unfolded only when their case tree computes.
    pub recursive: bool,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ConsInfo {
    pub loc: Loc,
    pub name: Ident,
    pub data_gi: GI,
    /// Fields, closed over the family parameters and the previous fields.
    pub params: Tele,
    /// Result indices, closed over the family parameters and all fields.
    pub indices: Vec<Term>,
    pub signature: Term,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataInfo {
    pub loc: Loc,
    pub name: Ident,
    pub params: Tele,
    /// Closed over the parameters and the previous indices.
    pub indices: Tele,
    /// References to its constructors.
    pub conses: Vec<GI>,
    pub universe: Universe,
    pub signature: Term,
}

/// Declaration.
/// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Monad.Base.html#Function).
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Decl {
    /// Inductive families.
    Data(DataInfo),
    Cons(ConsInfo),
    /// Function definitions.
    Func(FuncInfo),
}

impl Decl {
    pub fn def_name(&self) -> &Ident {
        match self {
            Decl::Data(i) => &i.name,
            Decl::Cons(i) => &i.name,
            Decl::Func(i) => &i.name,
        }
    }
}
