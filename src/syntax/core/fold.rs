use crate::syntax::core::{Closure, Lambda, Term};
use crate::syntax::DBI;

impl Term {
    /// Pre-order traversal of every subterm, with the number of binders above it.
    pub fn visit<'a, F>(&'a self, depth: DBI, f: &mut F)
    where
        F: FnMut(&'a Term, DBI),
    {
        f(self, depth);
        match self {
            Term::Universe(_) => {}
            Term::Data(data) => data.args.iter().for_each(|t| t.visit(depth, f)),
            Term::Pi(bind, Closure::Plain(body)) | Term::Lam(Lambda(bind, Closure::Plain(body))) => {
                bind.ty.visit(depth, f);
                body.visit(depth + 1, f);
            }
            Term::Cons(_, args) | Term::Var(_, args) | Term::Redex(_, _, args) => {
                args.iter().for_each(|t| t.visit(depth, f))
            }
            Term::Id(id) => {
                id.ty.visit(depth, f);
                id.a1.visit(depth, f);
                id.a2.visit(depth, f);
            }
            Term::Refl(t) => t.visit(depth, f),
            Term::CasesOn(c) => {
                c.params.iter().for_each(|t| t.visit(depth, f));
                c.motive.visit(depth, f);
                c.major.visit(depth, f);
                for case in &c.cases {
                    case.body.visit(depth + case.arity, f);
                }
                c.args.iter().for_each(|t| t.visit(depth, f));
            }
            Term::Transport(t) => {
                t.proof.visit(depth, f);
                t.body.visit(depth, f);
            }
            Term::Injection(proof, ..) => proof.visit(depth, f),
            Term::NoConfusion(n) => {
                n.ty.visit(depth, f);
                n.proof.visit(depth, f);
            }
        }
    }
}
