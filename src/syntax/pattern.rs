use crate::syntax::core::display_application;
use crate::syntax::ConHead;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Pat<Ix, Term> {
    /// Variable pattern, binds the matched value.
    Var(Ix),
    /// Matches anything, binds nothing.
    Wildcard,
    Cons(ConHead, Vec<Self>),
    /// Inaccessible term: determined by the other patterns, never matched on.
    Forced(Term),
    /// A term in pattern position, like `x + 1`.
    /// Must evaluate to a constructor form before matching.
    Term(Term),
}

impl<Ix, Term> Pat<Ix, Term> {
    pub fn cons(con_head: ConHead, params: Vec<Self>) -> Self {
        Pat::Cons(con_head, params)
    }

    pub fn is_cons(&self) -> bool {
        matches!(self, Self::Cons(..))
    }

    /// Matches every value without inspecting it.
    pub fn is_irrefutable(&self) -> bool {
        matches!(self, Self::Var(_) | Self::Wildcard | Self::Forced(_))
    }

    /// Number of constructor nodes in this pattern.
    pub fn cons_count(&self) -> usize {
        match self {
            Pat::Cons(_, args) => 1 + args.iter().map(Pat::cons_count).sum::<usize>(),
            _ => 0,
        }
    }

    /// Variables bound by this pattern, left to right.
    pub fn vars(&self) -> Vec<&Ix> {
        let mut vars = Vec::new();
        self.collect_vars(&mut vars);
        vars
    }

    fn collect_vars<'a>(&'a self, acc: &mut Vec<&'a Ix>) {
        match self {
            Pat::Var(ix) => acc.push(ix),
            Pat::Cons(_, args) => args.iter().for_each(|p| p.collect_vars(acc)),
            Pat::Wildcard | Pat::Forced(_) | Pat::Term(_) => {}
        }
    }

    pub fn map_term<R>(self, f: &mut impl FnMut(Term) -> R) -> Pat<Ix, R> {
        match self {
            Pat::Var(ix) => Pat::Var(ix),
            Pat::Wildcard => Pat::Wildcard,
            Pat::Cons(head, args) => {
                Pat::Cons(head, args.into_iter().map(|p| p.map_term(f)).collect())
            }
            Pat::Forced(t) => Pat::Forced(f(t)),
            Pat::Term(t) => Pat::Term(f(t)),
        }
    }
}

impl<Ix: Display, Term: Display> Display for Pat<Ix, Term> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Pat::Var(name) => {
                write!(f, "{}", name)
            }
            Pat::Wildcard => {
                write!(f, "_")
            }
            Pat::Cons(head, args) => display_application(f, head, args),
            Pat::Forced(e) => {
                write!(f, ".({})", e)
            }
            Pat::Term(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
