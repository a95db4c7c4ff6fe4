use crate::check::{Error, Result};
use crate::syntax::core::{Closure, DeBruijn, Lambda, Term};
use crate::syntax::{Ident, GI};
use std::collections::BTreeSet;

/// What we know about the size of a bound variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Size {
    /// The `k`-th matched argument itself.
    Arg(usize),
    /// Strictly smaller than the `k`-th matched argument.
    Below(usize),
}

struct Calls {
    gi: GI,
    n_params: usize,
    n_args: usize,
    /// For each recursive call, the arguments it decreases.
    calls: Vec<BTreeSet<usize>>,
}

/// Find an argument that decreases structurally along every recursive call of the
/// closed body `λ params args. ..` registered as `gi`.
///
/// An argument decreases when the call passes a field obtained by `cases_on` on it (or on
/// one of its fields). Returns `None` if the body makes no recursive call.
pub fn check_structural(
    name: &Ident,
    gi: GI,
    body: &Term,
    n_params: usize,
    n_args: usize,
) -> Result<Option<usize>> {
    let mut ctx = Vec::new();
    let mut body = body;
    for k in 0..n_params + n_args {
        match body {
            Term::Lam(Lambda(_, Closure::Plain(inner))) => {
                ctx.push(k.checked_sub(n_params).map(Size::Arg));
                body = &**inner;
            }
            _ => return Err(Error::NonStructuralRecursion(name.clone())),
        }
    }
    let mut calls = Calls {
        gi,
        n_params,
        n_args,
        calls: Vec::new(),
    };
    calls.walk(body, &mut ctx);
    let mut calls = calls.calls.into_iter();
    let first = match calls.next() {
        Some(first) => first,
        None => return Ok(None),
    };
    let common = calls.fold(first, |acc, call| &acc & &call);
    debug!(target: "case", "`{}` decreases on {:?}", name, common);
    match common.into_iter().next() {
        Some(k) => Ok(Some(k)),
        None => Err(Error::NonStructuralRecursion(name.clone())),
    }
}

impl Calls {
    fn size(term: &Term, ctx: &[Option<Size>]) -> Option<Size> {
        let i = term.dbi_view()?;
        let level = ctx.len().checked_sub(i + 1)?;
        ctx[level]
    }

    fn walk_all(&mut self, terms: &[Term], ctx: &mut Vec<Option<Size>>) {
        terms.iter().for_each(|t| self.walk(t, ctx))
    }

    fn walk(&mut self, term: &Term, ctx: &mut Vec<Option<Size>>) {
        match term {
            Term::Universe(_) => {}
            Term::Data(data) => self.walk_all(&data.args, ctx),
            Term::Cons(_, args) | Term::Var(_, args) => self.walk_all(args, ctx),
            Term::Redex(gi, _, args) => {
                if *gi == self.gi {
                    let decreasing = (0..self.n_args)
                        .filter(|k| {
                            let arg = args.get(self.n_params + k);
                            arg.and_then(|a| Self::size(a, ctx)) == Some(Size::Below(*k))
                        })
                        .collect();
                    self.calls.push(decreasing);
                }
                self.walk_all(args, ctx)
            }
            Term::Pi(bind, Closure::Plain(body)) | Term::Lam(Lambda(bind, Closure::Plain(body))) => {
                self.walk(&bind.ty, ctx);
                ctx.push(None);
                self.walk(body, ctx);
                ctx.pop();
            }
            Term::Id(id) => {
                self.walk(&id.ty, ctx);
                self.walk(&id.a1, ctx);
                self.walk(&id.a2, ctx);
            }
            Term::Refl(t) | Term::Injection(t, ..) => self.walk(t, ctx),
            Term::CasesOn(c) => {
                self.walk_all(&c.params, ctx);
                self.walk(&c.motive, ctx);
                self.walk(&c.major, ctx);
                let below = match Self::size(&c.major, ctx) {
                    Some(Size::Arg(k)) | Some(Size::Below(k)) => Some(Size::Below(k)),
                    None => None,
                };
                for case in &c.cases {
                    let depth = ctx.len();
                    ctx.extend(std::iter::repeat(below).take(case.arity));
                    self.walk(&case.body, ctx);
                    ctx.truncate(depth);
                }
                self.walk_all(&c.args, ctx);
            }
            Term::Transport(t) => {
                self.walk(&t.proof, ctx);
                self.walk(&t.body, ctx);
            }
            Term::NoConfusion(n) => {
                self.walk(&n.ty, ctx);
                self.walk(&n.proof, ctx);
            }
        }
    }
}
