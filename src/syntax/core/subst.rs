use crate::syntax::core::dbi::DeBruijn;
use crate::syntax::core::redex::Subst;
use crate::syntax::core::Term;
use crate::syntax::{dbi_nat, DBI};
use itertools::Either;
use std::fmt::Display;
use std::rc::Rc;

pub type Substitution = PrimSubst<Term>;

/// Substitution type.
/// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.Syntax.Internal.html#Substitution%27).
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum PrimSubst<T> {
    /// The identity substitution.
    /// $$
    /// \Gamma \vdash \text{IdS} : \Gamma
    /// $$
    IdS,
    /// The "add one more" substitution, or "substitution extension".
    /// $$
    /// \cfrac{\Gamma \vdash u : A \rho \quad \Gamma \vdash \rho : \Delta}
    /// {\Gamma \vdash \text{Cons}(u, \rho) : \Delta, A}
    /// $$
    Cons(T, Rc<Self>),
    /// Weakening substitution, lifts to an extended context.
    /// $$
    /// \cfrac{\Gamma \vdash \rho : \Delta}
    /// {\Gamma, \Psi \vdash \text{Weak}_\Psi \rho : \Delta}
    /// $$
    Weak(DBI, Rc<Self>),
    /// Lifting substitution. Use this to go under a binder.
    /// $\text{Lift}\_1 \rho := \text{Cons}(\texttt{Term::form\\\_dbi(0)},
    /// \text{Weak}\_1 \rho)$. $$
    /// \cfrac{\Gamma \vdash \rho : \Delta}
    /// {\Gamma, \Psi \rho \vdash \text{Lift}_\Psi \rho : \Delta, \Psi}
    /// $$
    Lift(DBI, Rc<Self>),
}

impl<T: Display> Display for PrimSubst<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PrimSubst::IdS => write!(f, "ε"),
            PrimSubst::Cons(t, r) => write!(f, "Cons({}, {})", t, r),
            PrimSubst::Weak(dbi, r) => write!(f, "Weak({}, {})", dbi, r),
            PrimSubst::Lift(dbi, r) => write!(f, "Lift({}, {})", dbi, r),
        }
    }
}

impl<T> Default for PrimSubst<T> {
    fn default() -> Self {
        PrimSubst::IdS
    }
}

impl<Term: DeBruijn + Subst<Term, Term> + Clone> PrimSubst<Term> {
    pub fn lookup(&self, dbi: DBI) -> Term {
        self.lookup_impl(dbi).map_left(Clone::clone).into_inner()
    }

    /// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Substitute.Class.html#raise).
    pub fn raise_term(k: DBI, term: Term) -> Term {
        Self::raise_from(0, k, term)
    }

    /// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Substitute.Class.html#raiseFrom).
    pub fn raise_from(n: DBI, k: DBI, term: Term) -> Term {
        term.subst(Self::raise(k).lift_by(n))
    }

    /// If lookup failed, return the DBI.
    /// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Substitute.Class.html#lookupS).
    pub fn lookup_impl(&self, dbi: DBI) -> Either<&Term, Term> {
        use Either::*;
        use PrimSubst::*;
        match self {
            IdS => Right(DeBruijn::from_dbi(dbi)),
            Cons(o, rest) => match dbi_nat(dbi) {
                None => Left(o),
                Some(dbi) => rest.lookup_impl(dbi),
            },
            Weak(i, rest) => match &**rest {
                IdS => Right(Term::from_dbi(dbi + *i)),
                rho => Right(rho.lookup(dbi).subst(Self::raise(*i))),
            },
            Lift(n, _) if dbi < *n => Right(DeBruijn::from_dbi(dbi)),
            Lift(n, rest) => Right(Self::raise_term(*n, rest.lookup(dbi - *n))),
        }
    }
}

impl<T> PrimSubst<T> {
    /// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Substitute.Class.html#raiseS).
    pub fn raise(by: DBI) -> Rc<Self> {
        Self::weaken(Default::default(), by)
    }

    /// Lift a substitution under k binders.
    /// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Substitute.Class.html#liftS).
    pub fn lift_by(self: Rc<Self>, lift_by: DBI) -> Rc<Self> {
        use PrimSubst::*;
        match (lift_by, &*self) {
            (0, _) => self,
            (_, IdS) => self,
            (k, Lift(n, rho)) => Rc::new(Lift(*n + k, rho.clone())),
            (k, _) => Rc::new(Lift(k, self)),
        }
    }

    /// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Substitute.Class.html#wkS).
    pub fn weaken(self: Rc<Self>, weaken_by: DBI) -> Rc<Self> {
        use PrimSubst::*;
        match (weaken_by, &*self) {
            (0, _) => self,
            (n, Weak(m, rho)) => Rc::new(Weak(n + *m, rho.clone())),
            (n, _) => Rc::new(Weak(n, self)),
        }
    }

    pub fn one(t: T) -> Rc<Self> {
        Rc::new(PrimSubst::Cons(t, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::core::Var;

    fn var(i: DBI) -> Term {
        Term::from_dbi(i)
    }

    #[test]
    fn lookup_through_weakening() {
        // Weak(2, [a]) sends 0 to a, and a is free so raising keeps it.
        let a = Term::free(7);
        let s = Substitution::one(a.clone()).weaken(2);
        assert_eq!(s.lookup(0), a);
        assert_eq!(Substitution::raise(2).lookup(1), var(3));
    }

    #[test]
    fn lift_keeps_inner_indices() {
        let s = Substitution::one(Term::free(3)).lift_by(1);
        assert_eq!(s.lookup(0), var(0));
        assert_eq!(s.lookup(1), Term::free(3));
        assert_eq!(s.lookup(2), var(1));
    }

    #[test]
    fn parallel_puts_first_at_zero() {
        let s = Substitution::parallel(vec![Term::free(1), Term::free(2)].into_iter());
        assert_eq!(s.lookup(0), Term::free(1));
        assert_eq!(s.lookup(1), Term::free(2));
        assert_eq!(
            s.lookup(2),
            Term::Var(Var::Bound(0), Vec::new()),
            "indices past the substitution are lowered"
        );
    }
}
