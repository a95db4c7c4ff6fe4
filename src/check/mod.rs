use crate::syntax::abs::Pattern;
use crate::syntax::core::Term;
use crate::syntax::{Ident, Loc, GI, UID};

pub use case::{Branch, CaseTree, Compiler, Leaf, LeafInfo, Problem, Split, Unreachable};
pub use confusion::{
    no_confusion, unify_indices, IndexConstraint, Refutation, Solution, Step, Unification,
};
pub use equations::{CompileOptions, CompiledDef, EquationLemma};
pub use matrix::{Column, Forced, PatternMatrix, Row};
pub use oracle::Oracle;
pub use state::TypeCheckState;
pub use termination::check_structural;
pub use unify::Unify;

mod block;
mod case;
mod confusion;
mod decls;
mod equations;
mod kernel;
mod lower;
mod matrix;
mod norm;
mod oracle;
mod state;
mod termination;
mod unify;

pub use lower::lower;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Wrapped(Box<Self>, Loc),
    #[error("Equation {equation} has {found} patterns, expected {expected}")]
    ArityMismatch {
        equation: usize,
        expected: usize,
        found: usize,
        loc: Loc,
    },
    #[error("Pattern `{pat}` belongs to `{found}`, expected a pattern of `{expected}`")]
    TypeMismatch {
        pat: Box<Pattern>,
        expected: Ident,
        found: Ident,
        loc: Loc,
    },
    #[error("`{0}` is not a constructor pattern")]
    NonConstructorPattern(Box<Term>, Loc),
    #[error("Pattern `{0}` does not evaluate to a constructor form")]
    NonNormalizingPattern(Box<Term>, Loc),
    #[error("Cannot prove a branch of `{0}` unreachable: {1}")]
    UnreachableBranchProofFailure(Ident, String),
    #[error("Non-exhaustive equations for `{name}`, missing case: `{missing}`")]
    IncompleteMatch { name: Ident, missing: String },
    #[error("Variable `{var}` is bound twice in equation {equation}")]
    NonLinearPattern { var: UID, equation: usize, loc: Loc },
    #[error("Equation {equation} is redundant")]
    RedundantEquation { equation: usize, loc: Loc },
    #[error("Cannot solve the index equation `{0} = {1}`")]
    DependentEliminationFailed(Box<Term>, Box<Term>),
    #[error("Cannot split on `{0}`, it is not a variable")]
    NotSplittable(Box<Term>),
    #[error("Inaccessible pattern `.({expected})` does not match `{found}`")]
    InaccessibleMismatch {
        expected: Box<Term>,
        found: Box<Term>,
        loc: Loc,
    },
    #[error("Cannot find a structurally decreasing argument for `{0}`")]
    NonStructuralRecursion(Ident),
    #[error("Equation {equation} of `{name}` does not hold definitionally")]
    NotDefinitional { name: Ident, equation: usize },
    #[error("Kernel rejected `{0}`: {1}")]
    KernelRejected(Ident, String),
    #[error("Expected an inductive type, got `{0}`")]
    NotInductive(Box<Term>),
    #[error("Unknown declaration `{0}`")]
    UnknownDecl(GI),
    #[error("Malformed inductive family `{0}`: {1}")]
    MalformedData(Ident, String),
    #[error("Expected `{0}`, got `{1}`")]
    DifferentTerm(Box<Term>, Box<Term>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn wrap(self, info: Loc) -> Self {
        Error::Wrapped(Box::new(self), info)
    }

    /// Attach `loc` unless the error already points somewhere.
    pub fn located(self, loc: Loc) -> Self {
        match self.loc() {
            Some(_) => self,
            None => self.wrap(loc),
        }
    }

    /// The error under all location wrappers.
    pub fn unwrapped(&self) -> &Self {
        match self {
            Error::Wrapped(e, _) => e.unwrapped(),
            e => e,
        }
    }

    pub fn loc(&self) -> Option<Loc> {
        use Error::*;
        match self {
            Wrapped(_, loc)
            | ArityMismatch { loc, .. }
            | TypeMismatch { loc, .. }
            | NonConstructorPattern(_, loc)
            | NonNormalizingPattern(_, loc)
            | NonLinearPattern { loc, .. }
            | RedundantEquation { loc, .. }
            | InaccessibleMismatch { loc, .. } => Some(*loc),
            NonStructuralRecursion(name)
            | NotDefinitional { name, .. }
            | KernelRejected(name, _)
            | MalformedData(name, _) => Some(name.loc),
            _ => None,
        }
    }
}
