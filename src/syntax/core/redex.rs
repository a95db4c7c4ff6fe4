use crate::syntax::core::subst::PrimSubst;
use crate::syntax::core::{Bind, Closure, Substitution, Term, Var};
use std::rc::Rc;

/// Type that are applicable with a de Bruijn substitution.
pub trait Subst<T: Sized = Self, A = Term>: Sized {
    /// Apply a substitution to an open term.
    fn subst(self, subst: Rc<PrimSubst<A>>) -> T;
}

impl Subst for Term {
    fn subst(self, subst: Rc<Substitution>) -> Term {
        if let PrimSubst::IdS = &*subst {
            return self;
        }
        self.map_vars(0, &mut |var, args, depth| match var {
            Var::Bound(i) => subst.clone().lift_by(depth).lookup(i).apply(args),
            v @ Var::Free(_) => Term::Var(v, args),
        })
    }
}

impl<T: Subst> Subst for Vec<T> {
    fn subst(self, subst: Rc<Substitution>) -> Self {
        self.into_iter().map(|t| t.subst(subst.clone())).collect()
    }
}

impl<T: Subst> Subst for Box<T> {
    fn subst(self, subst: Rc<Substitution>) -> Self {
        Box::new((*self).subst(subst))
    }
}

impl<T: Subst> Subst for Bind<T> {
    fn subst(self, subst: Rc<Substitution>) -> Self {
        self.map_term(|t| t.subst(subst))
    }
}

impl Subst for Closure {
    fn subst(self, subst: Rc<Substitution>) -> Self {
        let Closure::Plain(body) = self;
        Closure::Plain(body.subst(subst.lift_by(1)))
    }
}
