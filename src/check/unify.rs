use crate::check::state::TypeCheckState;
use crate::check::{Error, Result};
use crate::syntax::core::{CasesOn, Closure, DeBruijn, Lambda, Term};

/// Definitional equality, by comparing weak head normal forms.
pub trait Unify {
    fn unify(tcs: &mut TypeCheckState, left: &Self, right: &Self) -> Result<()>;
}

impl<T: Unify> Unify for [T] {
    fn unify(tcs: &mut TypeCheckState, left: &Self, right: &Self) -> Result<()> {
        if left.len() != right.len() {
            return Err(Error::DifferentTerm(
                Box::new(Term::universe(left.len() as u32)),
                Box::new(Term::universe(right.len() as u32)),
            ));
        }
        for (a, b) in left.iter().zip(right.iter()) {
            Unify::unify(tcs, a, b)?;
        }
        Ok(())
    }
}

impl<T: Unify> Unify for Box<T> {
    fn unify(tcs: &mut TypeCheckState, left: &Self, right: &Self) -> Result<()> {
        Unify::unify(tcs, &**left, &**right)
    }
}

impl Unify for Closure {
    fn unify(tcs: &mut TypeCheckState, left: &Self, right: &Self) -> Result<()> {
        Unify::unify(tcs, left.body(), right.body())
    }
}

impl Unify for Term {
    fn unify(tcs: &mut TypeCheckState, left: &Self, right: &Self) -> Result<()> {
        if left == right {
            return Ok(());
        }
        let left = tcs.simplify(left.clone())?;
        let right = tcs.simplify(right.clone())?;
        if tcs.trace_tc {
            trace!(target: "unify", "{}{} =? {}", tcs.tc_depth_ws(), left, right);
        }
        tcs.tc_deeper();
        let res = unify_whnf(tcs, &left, &right);
        tcs.tc_shallower();
        res
    }
}

fn is_neutral(term: &Term) -> bool {
    matches!(term, Term::Var(..) | Term::Redex(..)) || term.is_stuck_elim()
}

/// `λ. body` against `t`, by comparing `body` with `t @0`.
fn unify_eta(tcs: &mut TypeCheckState, body: &Closure, other: &Term) -> Result<()> {
    let applied = other.clone().raised(1).apply(vec![Term::from_dbi(0)]);
    Unify::unify(tcs, body.body(), &applied)
}

fn unify_whnf(tcs: &mut TypeCheckState, left: &Term, right: &Term) -> Result<()> {
    use Term::*;
    match (left, right) {
        (Universe(a), Universe(b)) if a == b => Ok(()),
        (Data(a), Data(b)) if a.def == b.def => Unify::unify(tcs, a.args.as_slice(), b.args.as_slice()),
        (Pi(a, c0), Pi(b, c1)) => {
            Unify::unify(tcs, &a.ty, &b.ty)?;
            Unify::unify(tcs, c0, c1)
        }
        (Lam(Lambda(_, c0)), Lam(Lambda(_, c1))) => Unify::unify(tcs, c0, c1),
        (Lam(Lambda(_, body)), t) | (t, Lam(Lambda(_, body))) if is_neutral(t) => {
            unify_eta(tcs, body, t)
        }
        (Cons(c0, a0), Cons(c1, a1)) if c0 == c1 => Unify::unify(tcs, a0.as_slice(), a1.as_slice()),
        (Var(v0, a0), Var(v1, a1)) if v0 == v1 => Unify::unify(tcs, a0.as_slice(), a1.as_slice()),
        (Redex(f0, _, a0), Redex(f1, _, a1)) if f0 == f1 => {
            Unify::unify(tcs, a0.as_slice(), a1.as_slice())
        }
        (Id(a), Id(b)) => {
            Unify::unify(tcs, &a.ty, &b.ty)?;
            Unify::unify(tcs, &a.a1, &b.a1)?;
            Unify::unify(tcs, &a.a2, &b.a2)
        }
        (Refl(a), Refl(b)) => Unify::unify(tcs, a, b),
        (CasesOn(a), CasesOn(b)) => unify_cases_on(tcs, a, b),
        (Transport(a), Transport(b)) => {
            Unify::unify(tcs, &a.proof, &b.proof)?;
            Unify::unify(tcs, &a.body, &b.body)
        }
        (Injection(p0, c0, l0), Injection(p1, c1, l1)) if c0 == c1 && l0 == l1 => {
            Unify::unify(tcs, p0, p1)
        }
        (NoConfusion(a), NoConfusion(b)) if a.data == b.data => {
            Unify::unify(tcs, &a.ty, &b.ty)
        }
        (a, b) => Err(Error::DifferentTerm(
            Box::new(a.clone()),
            Box::new(b.clone()),
        )),
    }
}

fn unify_cases_on(tcs: &mut TypeCheckState, a: &CasesOn, b: &CasesOn) -> Result<()> {
    let same_shape = a.data == b.data
        && a.cases.len() == b.cases.len()
        && (a.cases.iter().zip(&b.cases)).all(|(x, y)| x.cons == y.cons && x.arity == y.arity);
    if !same_shape {
        return Err(Error::DifferentTerm(
            Box::new(Term::CasesOn(a.clone())),
            Box::new(Term::CasesOn(b.clone())),
        ));
    }
    Unify::unify(tcs, &a.major, &b.major)?;
    Unify::unify(tcs, a.params.as_slice(), b.params.as_slice())?;
    for (x, y) in a.cases.iter().zip(&b.cases) {
        Unify::unify(tcs, &x.body, &y.body)?;
    }
    Unify::unify(tcs, a.args.as_slice(), b.args.as_slice())
}
