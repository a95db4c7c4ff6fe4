mod dbi;
mod decl;
mod fold;
mod free_subst;
mod pretty;
mod redex;
mod subst;
mod term;

pub use dbi::DeBruijn;
pub use decl::{ConsInfo, DataInfo, Decl, FuncInfo};
pub use free_subst::{FreeSubst, SubstFree};
pub use pretty::display_application;
pub use redex::Subst;
pub use subst::{PrimSubst, Substitution};
pub use term::{
    Bind, Case, CasesOn, Closure, Id, Lambda, NoConfusion, Pat, Tele, Term, Transport, ValData,
    Var,
};
