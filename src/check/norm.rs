use crate::check::block::{Blocked, Blocker};
use crate::check::state::TypeCheckState;
use crate::check::Result;
use crate::syntax::core::{
    CasesOn, Closure, Id, Lambda, NoConfusion, Term, Transport, ValData,
};
use crate::syntax::{Ident, GI};

impl TypeCheckState {
    /// Weak head normal form.
    pub fn simplify(&mut self, term: Term) -> Result<Term> {
        self.reduce(term, false)
    }

    /// Normal form, up to eliminators stuck on neutral terms.
    /// Case branches of stuck eliminators are left as they are.
    pub fn normalize(&mut self, term: Term) -> Result<Term> {
        self.reduce(term, true)
    }

    pub fn reduce(&mut self, term: Term, normalize: bool) -> Result<Term> {
        if self.trace_tc {
            trace!(target: "reduce", "{}[reduce] {}", self.tc_depth_ws(), term);
        }
        self.tc_deeper();
        let term_out = self.reduce_impl(term, normalize);
        self.tc_shallower();
        term_out
    }

    fn reduce_all(&mut self, terms: Vec<Term>, normalize: bool) -> Result<Vec<Term>> {
        if !normalize {
            return Ok(terms);
        }
        terms
            .into_iter()
            .map(|t| self.reduce(t, normalize))
            .collect()
    }

    fn reduce_impl(&mut self, term: Term, normalize: bool) -> Result<Term> {
        match term {
            Term::Redex(gi, ident, args) => match self.unfold_func(gi, ident, args)? {
                Blocked::No(term) => self.reduce(term, normalize),
                Blocked::Yes(blocker, Term::Redex(gi, ident, args)) => {
                    debug!(target: "reduce", "`{}` not unfolded, {}", ident, blocker);
                    Ok(Term::Redex(gi, ident, self.reduce_all(args, normalize)?))
                }
                Blocked::Yes(_, term) => Ok(term),
            },
            Term::CasesOn(cases_on) => self.reduce_cases_on(cases_on, normalize),
            Term::Transport(Transport { proof, body }) => match self.simplify(*proof)? {
                Term::Refl(_) => self.reduce(*body, normalize),
                proof => {
                    let body = if normalize {
                        self.reduce(*body, normalize)?
                    } else {
                        *body
                    };
                    Ok(Term::transport(proof, body))
                }
            },
            Term::Injection(proof, head, field) => {
                let proof = self.simplify(*proof)?;
                if let Term::Refl(t) = &proof {
                    if let Term::Cons(c, mut args) = self.simplify((**t).clone())? {
                        if c == head && field < args.len() {
                            let t = self.reduce(args.swap_remove(field), normalize)?;
                            return Ok(Term::refl(t));
                        }
                    }
                }
                Ok(Term::injection(proof, head, field))
            }
            Term::NoConfusion(NoConfusion { data, ty, proof }) if normalize => {
                let ty = self.normalize(*ty)?.boxed();
                let proof = self.normalize(*proof)?.boxed();
                Ok(Term::NoConfusion(NoConfusion { data, ty, proof }))
            }
            t if !normalize => Ok(t),
            Term::Var(v, args) => Ok(Term::Var(v, self.reduce_all(args, normalize)?)),
            Term::Cons(head, args) => Ok(Term::Cons(head, self.reduce_all(args, normalize)?)),
            Term::Data(ValData { def, args }) => Ok(Term::Data(ValData::new(
                def,
                self.reduce_all(args, normalize)?,
            ))),
            Term::Pi(bind, Closure::Plain(body)) => {
                let bind = bind.try_map_term(|ty| self.normalize(*ty).map(Term::boxed))?;
                let body = self.normalize(*body)?;
                Ok(Term::Pi(bind, Closure::Plain(body.boxed())))
            }
            Term::Lam(Lambda(bind, Closure::Plain(body))) => {
                let bind = bind.try_map_term(|ty| self.normalize(*ty).map(Term::boxed))?;
                let body = self.normalize(*body)?;
                Ok(Term::Lam(Lambda(bind, Closure::Plain(body.boxed()))))
            }
            Term::Id(Id { ty, a1, a2 }) => Ok(Term::id(
                self.normalize(*ty)?,
                self.normalize(*a1)?,
                self.normalize(*a2)?,
            )),
            Term::Refl(t) => Ok(Term::refl(self.normalize(*t)?)),
            t @ Term::Universe(_) | t @ Term::NoConfusion(_) => Ok(t),
        }
    }

    fn reduce_cases_on(&mut self, mut cases_on: CasesOn, normalize: bool) -> Result<Term> {
        let major = self.simplify(*cases_on.major)?;
        if let Term::Cons(head, fields) = &major {
            let matched = cases_on
                .cases
                .iter()
                .position(|case| case.cons == *head && case.arity == fields.len());
            if let Some(i) = matched {
                debug!(target: "reduce", "cases_on: matched `{}`", head);
                let case = cases_on.cases.swap_remove(i);
                let body = case.body.instantiate_tele(fields).apply(cases_on.args);
                return self.reduce(body, normalize);
            }
        }
        trace!(target: "reduce", "stuck cases_on on {}", major);
        cases_on.major = if normalize {
            self.normalize(major)?.boxed()
        } else {
            major.boxed()
        };
        cases_on.params = self.reduce_all(cases_on.params, normalize)?;
        cases_on.args = self.reduce_all(cases_on.args, normalize)?;
        Ok(Term::CasesOn(cases_on))
    }

    /// Unfold a global function. Recursive helpers are unfolded only if their body computes
    /// past every case split; otherwise the application stays as it is.
    pub(crate) fn unfold_func(
        &mut self,
        gi: GI,
        ident: Ident,
        args: Vec<Term>,
    ) -> Result<Blocked<Term>> {
        let func = self.func_info(gi)?;
        let (body, arity, recursive) = (func.body.clone(), func.arity, func.recursive);
        if !recursive {
            return Ok(Blocked::No(body.apply(args)));
        }
        if args.len() < arity {
            return Ok(Blocked::Yes(
                Blocker::UnderApplied,
                Term::Redex(gi, ident, args),
            ));
        }
        let unfolded = self.simplify(body.apply(args.clone()))?;
        if unfolded.is_stuck_elim() {
            Ok(Blocked::Yes(
                Blocker::OnElim(unfolded),
                Term::Redex(gi, ident, args),
            ))
        } else {
            Ok(Blocked::No(unfolded))
        }
    }
}
