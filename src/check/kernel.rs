use crate::check::{Error, Result, TypeCheckState};
use crate::syntax::core::{Closure, DeBruijn, Lambda, NoConfusion, Term, Transport, Var};
use crate::syntax::{Ident, DBI, GI};

type Context = Vec<Option<Term>>;

/// Structural re-check of a compiled body before it enters the signature.
///
/// This is not a type checker: it makes sure the term is closed, only refers to known
/// declarations, applies constructors and families fully, has one case per constructor
/// in every `cases_on`, and that every `no_confusion` is backed by an equation between
/// distinct constructors.
struct Kernel<'a> {
    tcs: &'a mut TypeCheckState,
    name: &'a Ident,
    /// Declarations registered together with the checked term.
    pending: &'a [GI],
}

impl TypeCheckState {
    pub fn validate(&mut self, name: &Ident, term: &Term, pending: &[GI]) -> Result<()> {
        debug!(target: "kernel", "{}validating `{}`", self.tc_depth_ws(), name);
        let mut kernel = Kernel {
            tcs: self,
            name,
            pending,
        };
        kernel.check(term, &mut Vec::new())
    }
}

impl<'a> Kernel<'a> {
    fn reject(&self, reason: String) -> Error {
        Error::KernelRejected(self.name.clone(), reason)
    }

    fn check_all(&mut self, terms: &[Term], ctx: &mut Context) -> Result<()> {
        terms.iter().try_for_each(|t| self.check(t, ctx))
    }

    fn check_under(&mut self, binder: Option<Term>, body: &Term, ctx: &mut Context) -> Result<()> {
        ctx.push(binder);
        let res = self.check(body, ctx);
        ctx.pop();
        res
    }

    fn check(&mut self, term: &Term, ctx: &mut Context) -> Result<()> {
        match term {
            Term::Universe(_) => Ok(()),
            Term::Var(Var::Free(uid), _) => {
                Err(self.reject(format!("free variable `{}`", Term::free(*uid))))
            }
            Term::Var(Var::Bound(i), args) => {
                if *i >= ctx.len() {
                    return Err(self.reject(format!("loose index `@{}`", i)));
                }
                self.check_all(args, ctx)
            }
            Term::Data(data) => {
                let info = self.tcs.data_info(data.def)?;
                let expected = info.params.len() + info.indices.len();
                if data.args.len() != expected {
                    let reason = format!("`{}` applied to {} arguments", info.name, data.args.len());
                    return Err(self.reject(reason));
                }
                self.check_all(&data.args, ctx)
            }
            Term::Cons(head, args) => {
                let info = self.tcs.cons_info(head.cons_gi)?;
                if args.len() != info.params.len() {
                    let reason = format!("`{}` applied to {} fields", head, args.len());
                    return Err(self.reject(reason));
                }
                self.check_all(args, ctx)
            }
            Term::Redex(gi, ident, args) => {
                if !self.pending.contains(gi) && self.tcs.func_info(*gi).is_err() {
                    return Err(self.reject(format!("unknown function `{}`", ident)));
                }
                self.check_all(args, ctx)
            }
            Term::Pi(bind, Closure::Plain(body)) | Term::Lam(Lambda(bind, Closure::Plain(body))) => {
                self.check(&bind.ty, ctx)?;
                self.check_under(Some((*bind.ty).clone()), body, ctx)
            }
            Term::Id(id) => {
                self.check(&id.ty, ctx)?;
                self.check(&id.a1, ctx)?;
                self.check(&id.a2, ctx)
            }
            Term::Refl(t) => self.check(t, ctx),
            Term::CasesOn(c) => {
                let info = self.tcs.data_info(c.data)?.clone();
                if c.params.len() != info.params.len() {
                    let reason = format!("`cases_on` on `{}` with wrong parameters", info.name);
                    return Err(self.reject(reason));
                }
                if c.cases.len() != info.conses.len() {
                    let reason = format!(
                        "{} cases for the {} constructors of `{}`",
                        c.cases.len(),
                        info.conses.len(),
                        info.name
                    );
                    return Err(self.reject(reason));
                }
                for (case, gi) in c.cases.iter().zip(&info.conses) {
                    let arity = self.tcs.cons_info(*gi)?.params.len();
                    if case.cons.cons_gi != *gi || case.arity != arity {
                        let reason = format!("case `{}/{}` is out of place", case.cons, case.arity);
                        return Err(self.reject(reason));
                    }
                }
                self.check_all(&c.params, ctx)?;
                self.check(&c.motive, ctx)?;
                self.check(&c.major, ctx)?;
                for case in &c.cases {
                    let depth = ctx.len();
                    ctx.extend(std::iter::repeat(None).take(case.arity));
                    let res = self.check(&case.body, ctx);
                    ctx.truncate(depth);
                    res?;
                }
                self.check_all(&c.args, ctx)
            }
            Term::Transport(t) => {
                self.check(&t.proof, ctx)?;
                self.check(&t.body, ctx)
            }
            Term::Injection(proof, ..) => self.check(proof, ctx),
            Term::NoConfusion(n) => {
                self.check(&n.ty, ctx)?;
                self.check(&n.proof, ctx)?;
                self.check_refutation(n, ctx)
            }
        }
    }

    /// The proof must be an equation between distinct constructors of `n.data`.
    fn check_refutation(&mut self, n: &NoConfusion, ctx: &Context) -> Result<()> {
        let ty = self.proof_type(&n.proof, ctx)?;
        let id = match self.tcs.simplify(ty)? {
            Term::Id(id) => id,
            t => return Err(self.reject(format!("`no_confusion` on a proof of `{}`", t))),
        };
        let left = self.tcs.simplify(*id.a1)?;
        let right = self.tcs.simplify(*id.a2)?;
        match (&left, &right) {
            (Term::Cons(c0, _), Term::Cons(c1, _)) if c0 != c1 => {
                let d0 = self.tcs.cons_info(c0.cons_gi)?.data_gi;
                let d1 = self.tcs.cons_info(c1.cons_gi)?.data_gi;
                if d0 == n.data && d1 == n.data {
                    return Ok(());
                }
                Err(self.reject(format!("`{}` and `{}` are not both in the refuted family", c0, c1)))
            }
            _ => Err(self.reject(format!("`{}` and `{}` are not distinct constructors", left, right))),
        }
    }

    /// Type of an equation proof built from hypotheses and injections.
    fn proof_type(&mut self, proof: &Term, ctx: &Context) -> Result<Term> {
        match proof {
            Term::Var(Var::Bound(i), args) if args.is_empty() => {
                let ty = (ctx.len().checked_sub(i + 1))
                    .and_then(|level| ctx[level].clone())
                    .ok_or_else(|| self.reject(format!("`@{}` is not a hypothesis", i)))?;
                Ok(ty.raised(i + 1))
            }
            Term::Injection(inner, head, field) => {
                let ty = self.proof_type(inner, ctx)?;
                let id = match self.tcs.simplify(ty)? {
                    Term::Id(id) => id,
                    t => return Err(self.reject(format!("injection of a proof of `{}`", t))),
                };
                let left = self.tcs.simplify(*id.a1)?;
                let right = self.tcs.simplify(*id.a2)?;
                match (left, right) {
                    (Term::Cons(c0, mut a0), Term::Cons(c1, mut a1))
                        if c0 == *head && c1 == *head && *field < a0.len() && *field < a1.len() =>
                    {
                        let info = self.tcs.cons_info(head.cons_gi)?.clone();
                        let data = self.tcs.simplify(*id.ty)?;
                        let ty = match data {
                            Term::Data(d) => {
                                let n_params = self.tcs.data_info(d.def)?.params.len();
                                let mut env = d.args[..n_params.min(d.args.len())].to_vec();
                                env.extend(a0.iter().take(*field).cloned());
                                info.params[*field].ty.clone().instantiate_tele(&env)
                            }
                            _ => Term::universe(0),
                        };
                        Ok(Term::id(ty, a0.swap_remove(*field), a1.swap_remove(*field)))
                    }
                    (l, r) => Err(self.reject(format!("injection `{}` of `{} = {}`", head, l, r))),
                }
            }
            // `solved : x = v` rewrites `x` to `v` in the type of `inner`.
            Term::Transport(Transport { proof: solved, body: inner }) => {
                let ty = self.proof_type(solved, ctx)?;
                let id = match self.tcs.simplify(ty)? {
                    Term::Id(id) => id,
                    t => return Err(self.reject(format!("transport along a proof of `{}`", t))),
                };
                let left = self.tcs.simplify(*id.a1)?;
                let right = self.tcs.simplify(*id.a2)?;
                let (var, value) = match (left.dbi_view(), right.dbi_view()) {
                    (Some(i), _) if !mentions(&right, i) => (i, right),
                    (_, Some(j)) if !mentions(&left, j) => (j, left),
                    _ => {
                        let reason = format!("transport along `{} = {}`", left, right);
                        return Err(self.reject(reason));
                    }
                };
                let ty = self.proof_type(inner, ctx)?;
                Ok(rewrite_bound(ty, var, &value))
            }
            t => Err(self.reject(format!("`{}` is not an equation proof", t))),
        }
    }
}

fn mentions(term: &Term, i: DBI) -> bool {
    let mut found = false;
    term.visit(0, &mut |t, depth| {
        found |= matches!(t, Term::Var(Var::Bound(j), _) if *j == i + depth);
    });
    found
}

/// Replace the bound variable `i` by `value`, both seen from the same context.
fn rewrite_bound(term: Term, i: DBI, value: &Term) -> Term {
    term.map_vars(0, &mut |var, args, depth| match var {
        Var::Bound(j) if j == i + depth => value.clone().raised(depth).apply(args),
        v => Term::Var(v, args),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Prelude;
    use crate::syntax::core::{Bind, Case, CasesOn};

    #[test]
    fn rejects_open_terms() -> eyre::Result<()> {
        let (mut tcs, _) = Prelude::new()?;
        let name = Ident::synthetic("open");
        let x = tcs.fresh();
        let res = tcs.validate(&name, &Term::free(x), &[]);
        assert!(matches!(res, Err(Error::KernelRejected(..))));
        Ok(())
    }

    #[test]
    fn rejects_missing_cases() -> eyre::Result<()> {
        let (mut tcs, p) = Prelude::new()?;
        let name = Ident::synthetic("partial");
        let x = tcs.fresh();
        let cases_on = Term::CasesOn(CasesOn {
            data: p.nat,
            params: vec![],
            motive: Box::new(Term::universe(0)),
            major: Box::new(Term::free(x)),
            cases: vec![Case::new(p.zero.clone(), 0, p.num(0))],
            args: vec![],
        });
        let term = Term::lam_over(&[Bind::from((x, p.nat_ty()))], cases_on);
        let res = tcs.validate(&name, &term, &[]);
        assert!(matches!(res, Err(Error::KernelRejected(..))));
        Ok(())
    }

    #[test]
    fn refutation_follows_transports() -> eyre::Result<()> {
        let (mut tcs, p) = Prelude::new()?;
        let name = Ident::synthetic("clash");
        let (n, h0, h1) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
        let tele = [
            Bind::from((n, p.nat_ty())),
            Bind::from((h0, Term::id(p.nat_ty(), Term::free(n), p.num(0)))),
            Bind::from((h1, Term::id(p.nat_ty(), Term::free(n), p.num(1)))),
        ];
        let refute = |proof: Term| {
            let body = Term::NoConfusion(NoConfusion {
                data: p.nat,
                ty: Box::new(p.nat_ty()),
                proof: Box::new(proof),
            });
            Term::lam_over(&tele, body)
        };
        let transported = refute(Term::transport(Term::free(h0), Term::free(h1)));
        tcs.validate(&name, &transported, &[])?;
        let res = tcs.validate(&name, &refute(Term::free(h1)), &[]);
        assert!(matches!(res, Err(Error::KernelRejected(..))));
        Ok(())
    }

    #[test]
    fn accepts_closed_functions() -> eyre::Result<()> {
        let (mut tcs, p) = Prelude::new()?;
        let x = tcs.fresh();
        let term = Term::lam_over(&[Bind::from((x, p.nat_ty()))], p.succ_of(Term::free(x)));
        tcs.validate(&Ident::synthetic("succ'"), &term, &[])?;
        Ok(())
    }
}
