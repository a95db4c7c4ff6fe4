use crate::syntax::core::{Bind, FreeSubst, SubstFree, Term};
use crate::tests::syntax::{Closed, FREE};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn prop_abstract_then_instantiate(Closed(t): Closed) -> bool {
    let env: Vec<Term> = FREE.iter().copied().map(Term::free).collect();
    t.clone().abstract_over(&FREE).instantiate_tele(&env) == t
}

#[quickcheck]
fn prop_beta_restores_the_body(Closed(t): Closed) -> bool {
    let lam = Term::lam_over(&[Bind::from((FREE[0], Term::universe(0)))], t.clone());
    lam.apply(vec![Term::free(FREE[0])]) == t
}

#[quickcheck]
fn prop_abstract_removes_variables(Closed(t): Closed) -> bool {
    let closed = t.abstract_over(&FREE[..2]);
    !closed.occurs(FREE[0]) && !closed.occurs(FREE[1])
}

#[quickcheck]
fn prop_raising_closed_terms(Closed(t): Closed, by: u8) -> bool {
    t.clone().raised(by as usize) == t
}

#[quickcheck]
fn prop_subst_free_renaming(Closed(t): Closed) -> bool {
    let there: FreeSubst = FREE.iter().map(|&x| (x, Term::free(x + 10))).collect();
    let back: FreeSubst = FREE.iter().map(|&x| (x + 10, Term::free(x))).collect();
    t.clone().subst_free(&there).subst_free(&back) == t
}
