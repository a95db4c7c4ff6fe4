mod subst;

use crate::syntax::core::{Bind, Closure, DeBruijn, Lambda, Term};
use crate::syntax::{ConHead, Ident, Loc, UID};
use quickcheck::{Arbitrary, Gen};

/// Free variables the generated terms may mention.
pub const FREE: [UID; 3] = [0, 1, 2];

/// A term without loose de Bruijn indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closed(pub Term);

fn free(g: &mut Gen) -> Term {
    Term::free(*g.choose(&FREE).unwrap_or(&0))
}

fn gen_args(g: &mut Gen, size: usize, binders: usize) -> Vec<Term> {
    let n = usize::arbitrary(g) % 3;
    (0..n).map(|_| gen_term(g, size / 2, binders)).collect()
}

fn gen_term(g: &mut Gen, size: usize, binders: usize) -> Term {
    let choice = if size == 0 {
        u8::arbitrary(g) % 2
    } else {
        u8::arbitrary(g) % 5
    };
    match choice {
        0 => free(g),
        1 if binders > 0 => Term::from_dbi(usize::arbitrary(g) % binders),
        1 => Term::universe(0),
        2 => {
            let body = gen_term(g, size - 1, binders + 1);
            Term::Lam(Lambda(
                Bind::boxing(0, Term::universe(0), Loc::default()),
                Closure::Plain(Box::new(body)),
            ))
        }
        3 => {
            let head = ConHead::new(Ident::synthetic("c"), 1);
            Term::cons(head, gen_args(g, size, binders))
        }
        _ => free(g).apply(gen_args(g, size, binders)),
    }
}

impl Arbitrary for Closed {
    fn arbitrary(g: &mut Gen) -> Self {
        let size = g.size().min(6);
        Closed(gen_term(g, size, 0))
    }
}
