use crate::syntax::core::{
    Bind, Case, CasesOn, Closure, Id, Lambda, NoConfusion, Term, Transport, ValData, Var,
};
use crate::syntax::{DBI, UID};
use std::collections::HashMap;

/// Simultaneous substitution for free variables.
/// The substituted terms are locally closed, so no index shifting is needed.
pub type FreeSubst = HashMap<UID, Term>;

pub trait SubstFree: Sized {
    fn subst_free(self, map: &FreeSubst) -> Self;
}

impl SubstFree for Term {
    fn subst_free(self, map: &FreeSubst) -> Term {
        if map.is_empty() {
            return self;
        }
        self.map_vars(0, &mut |var, args, _| match var {
            Var::Free(uid) => match map.get(&uid) {
                Some(t) => t.clone().apply(args),
                None => Term::Var(var, args),
            },
            v => Term::Var(v, args),
        })
    }
}

impl<T: SubstFree> SubstFree for Vec<T> {
    fn subst_free(self, map: &FreeSubst) -> Self {
        self.into_iter().map(|t| t.subst_free(map)).collect()
    }
}

impl<T: SubstFree> SubstFree for Box<T> {
    fn subst_free(self, map: &FreeSubst) -> Self {
        Box::new((*self).subst_free(map))
    }
}

impl<T: SubstFree> SubstFree for Bind<T> {
    fn subst_free(self, map: &FreeSubst) -> Self {
        self.map_term(|t| t.subst_free(map))
    }
}

impl<T: SubstFree> SubstFree for Option<T> {
    fn subst_free(self, map: &FreeSubst) -> Self {
        self.map(|t| t.subst_free(map))
    }
}

fn map_all<F>(ts: Vec<Term>, depth: DBI, f: &mut F) -> Vec<Term>
where
    F: FnMut(Var, Vec<Term>, DBI) -> Term,
{
    ts.into_iter().map(|t| t.map_vars(depth, f)).collect()
}

impl Term {
    /// Rebuild the term bottom-up, handing every variable occurrence (with its already
    /// rebuilt spine) to `f`, together with the number of binders above it.
    pub(crate) fn map_vars<F>(self, depth: DBI, f: &mut F) -> Term
    where
        F: FnMut(Var, Vec<Term>, DBI) -> Term,
    {
        match self {
            Term::Universe(u) => Term::Universe(u),
            Term::Data(ValData { def, args }) => {
                Term::Data(ValData::new(def, map_all(args, depth, f)))
            }
            Term::Pi(bind, Closure::Plain(body)) => {
                let bind = bind.map_term(|ty| Box::new((*ty).map_vars(depth, f)));
                let body = (*body).map_vars(depth + 1, f);
                Term::Pi(bind, Closure::Plain(Box::new(body)))
            }
            Term::Lam(Lambda(bind, Closure::Plain(body))) => {
                let bind = bind.map_term(|ty| Box::new((*ty).map_vars(depth, f)));
                let body = (*body).map_vars(depth + 1, f);
                Term::Lam(Lambda(bind, Closure::Plain(Box::new(body))))
            }
            Term::Cons(head, args) => Term::Cons(head, map_all(args, depth, f)),
            Term::Var(var, args) => {
                let args = map_all(args, depth, f);
                f(var, args, depth)
            }
            Term::Redex(gi, ident, args) => Term::Redex(gi, ident, map_all(args, depth, f)),
            Term::Id(Id { ty, a1, a2 }) => {
                let ty = (*ty).map_vars(depth, f);
                let a1 = (*a1).map_vars(depth, f);
                let a2 = (*a2).map_vars(depth, f);
                Term::Id(Id::new(ty, a1, a2))
            }
            Term::Refl(t) => Term::refl((*t).map_vars(depth, f)),
            Term::CasesOn(CasesOn {
                data,
                params,
                motive,
                major,
                cases,
                args,
            }) => {
                let params = map_all(params, depth, f);
                let motive = Box::new((*motive).map_vars(depth, f));
                let major = Box::new((*major).map_vars(depth, f));
                let cases = cases
                    .into_iter()
                    .map(|Case { cons, arity, body }| {
                        Case::new(cons, arity, body.map_vars(depth + arity, f))
                    })
                    .collect();
                let args = map_all(args, depth, f);
                Term::CasesOn(CasesOn {
                    data,
                    params,
                    motive,
                    major,
                    cases,
                    args,
                })
            }
            Term::Transport(Transport { proof, body }) => {
                let proof = (*proof).map_vars(depth, f);
                let body = (*body).map_vars(depth, f);
                Term::transport(proof, body)
            }
            Term::Injection(proof, head, field) => {
                Term::injection((*proof).map_vars(depth, f), head, field)
            }
            Term::NoConfusion(NoConfusion { data, ty, proof }) => {
                let ty = Box::new((*ty).map_vars(depth, f));
                let proof = Box::new((*proof).map_vars(depth, f));
                Term::NoConfusion(NoConfusion { data, ty, proof })
            }
        }
    }

    /// Turn the free variables `vars` into de Bruijn indices, the last one becoming `0`.
    /// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.TypeChecking.Substitute.html#abstract).
    pub fn abstract_over(self, vars: &[UID]) -> Term {
        if vars.is_empty() {
            return self;
        }
        let n = vars.len();
        self.map_vars(0, &mut |var, args, depth| match var {
            Var::Free(uid) => match vars.iter().rposition(|v| *v == uid) {
                Some(j) => Term::Var(Var::Bound(depth + n - 1 - j), args),
                None => Term::Var(var, args),
            },
            Var::Bound(i) if i >= depth => Term::Var(Var::Bound(i + n), args),
            v => Term::Var(v, args),
        })
    }

    /// Replace every application of the free variable `var` by `head` of its spine.
    pub fn replace_free_head<F>(self, var: UID, head: &mut F) -> Term
    where
        F: FnMut(Vec<Term>) -> Term,
    {
        self.map_vars(0, &mut |v, args, _| match v {
            Var::Free(uid) if uid == var => head(args),
            v => Term::Var(v, args),
        })
    }

    pub fn free_vars(&self) -> Vec<UID> {
        let mut vars = Vec::new();
        self.visit(0, &mut |t, _| {
            if let Term::Var(Var::Free(uid), _) = t {
                if !vars.contains(uid) {
                    vars.push(*uid);
                }
            }
        });
        vars
    }

    pub fn occurs(&self, uid: UID) -> bool {
        let mut found = false;
        self.visit(0, &mut |t, _| {
            found |= matches!(t, Term::Var(Var::Free(u), _) if *u == uid);
        });
        found
    }
}
