//! A small signature of inductive families, enough to exercise the compiler:
//! naturals, booleans, the empty type, lists, length-indexed vectors, bounded naturals and
//! the image of a function.

use crate::check::{CompiledDef, Oracle, Result, TypeCheckState};
use crate::syntax::abs::{ConsDecl, DataDecl, Definition, Pattern};
use crate::syntax::core::{Pat, Term};
use crate::syntax::{ConHead, Ident, GI};

#[derive(Debug, Clone)]
pub struct Prelude {
    pub nat: GI,
    pub zero: ConHead,
    pub succ: ConHead,
    pub bool: GI,
    pub tt: ConHead,
    pub ff: ConHead,
    pub empty: GI,
    /// `list (A : Type)`
    pub list: GI,
    pub nil: ConHead,
    pub cons: ConHead,
    /// `vector (A : Type) : nat → Type`
    pub vector: GI,
    pub vnil: ConHead,
    pub vcons: ConHead,
    /// `fin : nat → Type`
    pub fin: GI,
    pub fzero: ConHead,
    pub fsucc: ConHead,
    /// `image_of (A B : Type) (f : A → B) : B → Type`, with `imf a : image_of A B f (f a)`.
    pub image_of: GI,
    pub imf: ConHead,
    /// `add n zero = n; add n (succ m) = succ (add n m)`
    pub add: CompiledDef,
}

fn ident(text: &str) -> Ident {
    Ident::synthetic(text)
}

fn head_of(tcs: &TypeCheckState, gi: GI) -> Result<ConHead> {
    tcs.cons_head(gi)
}

impl Prelude {
    pub fn new() -> Result<(TypeCheckState, Self)> {
        let mut tcs = TypeCheckState::default();
        let prelude = Self::declare(&mut tcs)?;
        Ok((tcs, prelude))
    }

    fn declare(tcs: &mut TypeCheckState) -> Result<Self> {
        let ty = Term::universe(0);

        let this = tcs.fresh();
        let n = tcs.fresh();
        let decl = DataDecl::new(ident("nat"), this);
        let succ = ConsDecl::new(ident("succ")).field(n, decl.recurse(vec![]));
        let nat = tcs.check_data(decl.cons(ConsDecl::new(ident("zero"))).cons(succ))?;
        let nat_ty = Term::data(nat, vec![]);
        let succ_of = |t: Term| Term::cons(ConHead::new(ident("succ"), nat + 2), vec![t]);
        let zero_term = Term::cons(ConHead::new(ident("zero"), nat + 1), vec![]);

        let this = tcs.fresh();
        let bool = tcs.check_data(
            DataDecl::new(ident("bool"), this)
                .cons(ConsDecl::new(ident("tt")))
                .cons(ConsDecl::new(ident("ff"))),
        )?;
        let this = tcs.fresh();
        let empty = tcs.check_data(DataDecl::new(ident("empty"), this))?;

        let (this, a, head, tail) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
        let decl = DataDecl::new(ident("list"), this).param(a, ty.clone());
        let cons = ConsDecl::new(ident("cons"))
            .field(head, Term::free(a))
            .field(tail, decl.recurse(vec![]));
        let list = tcs.check_data(decl.cons(ConsDecl::new(ident("nil"))).cons(cons))?;

        let (this, a, ix) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
        let (n, head, tail) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
        let decl = DataDecl::new(ident("vector"), this)
            .param(a, ty.clone())
            .index(ix, nat_ty.clone());
        let vnil = ConsDecl::new(ident("vnil")).index(zero_term.clone());
        let vcons = ConsDecl::new(ident("vcons"))
            .field(n, nat_ty.clone())
            .field(head, Term::free(a))
            .field(tail, decl.recurse(vec![Term::free(n)]))
            .index(succ_of(Term::free(n)));
        let vector = tcs.check_data(decl.cons(vnil).cons(vcons))?;

        let (this, ix, n, m, i) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
        let decl = DataDecl::new(ident("fin"), this).index(ix, nat_ty.clone());
        let fzero = ConsDecl::new(ident("fzero"))
            .field(n, nat_ty.clone())
            .index(succ_of(Term::free(n)));
        let fsucc = ConsDecl::new(ident("fsucc"))
            .field(m, nat_ty.clone())
            .field(i, decl.recurse(vec![Term::free(m)]))
            .index(succ_of(Term::free(m)));
        let fin = tcs.check_data(decl.cons(fzero).cons(fsucc))?;

        let (this, a, b, f, ix, x) = (
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
        );
        let imf = ConsDecl::new(ident("imf"))
            .field(x, Term::free(a))
            .index(Term::free(f).apply(vec![Term::free(x)]));
        let image_of = tcs.check_data(
            DataDecl::new(ident("image_of"), this)
                .param(a, ty.clone())
                .param(b, ty)
                .param(f, Term::arrow(Term::free(a), Term::free(b)))
                .index(ix, Term::free(b))
                .cons(imf),
        )?;

        let (zero, succ) = (head_of(tcs, nat + 1)?, head_of(tcs, nat + 2)?);
        let add = Self::define_add(tcs, nat, zero.clone(), succ.clone())?;
        Ok(Prelude {
            nat,
            zero,
            succ,
            bool,
            tt: head_of(tcs, bool + 1)?,
            ff: head_of(tcs, bool + 2)?,
            empty,
            list,
            nil: head_of(tcs, list + 1)?,
            cons: head_of(tcs, list + 2)?,
            vector,
            vnil: head_of(tcs, vector + 1)?,
            vcons: head_of(tcs, vector + 2)?,
            fin,
            fzero: head_of(tcs, fin + 1)?,
            fsucc: head_of(tcs, fin + 2)?,
            image_of,
            imf: head_of(tcs, image_of + 1)?,
            add,
        })
    }

    fn define_add(
        tcs: &mut TypeCheckState,
        nat: GI,
        zero: ConHead,
        succ: ConHead,
    ) -> Result<CompiledDef> {
        let nat_ty = Term::data(nat, vec![]);
        let (this, a, b, n, n1, m) = (
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
            tcs.fresh(),
        );
        let def = Definition::new(ident("add"), this, nat_ty.clone())
            .arg(a, nat_ty.clone())
            .arg(b, nat_ty);
        let recursive = def.recurse(vec![Term::free(n1), Term::free(m)]);
        let def = def
            .equation(vec![Pat::Var(n), Pat::cons(zero, vec![])], Term::free(n))
            .equation(
                vec![Pat::Var(n1), Pat::cons(succ.clone(), vec![Pat::Var(m)])],
                Term::cons(succ, vec![recursive]),
            );
        tcs.define(def)
    }

    pub fn nat_ty(&self) -> Term {
        Term::data(self.nat, vec![])
    }

    pub fn succ_of(&self, t: Term) -> Term {
        Term::cons(self.succ.clone(), vec![t])
    }

    /// The numeral `n`.
    pub fn num(&self, n: usize) -> Term {
        (0..n).fold(Term::cons(self.zero.clone(), vec![]), |t, _| self.succ_of(t))
    }

    /// The pattern `succ^n p`.
    pub fn succ_pat(&self, n: usize, p: Pattern) -> Pattern {
        (0..n).fold(p, |p, _| Pat::cons(self.succ.clone(), vec![p]))
    }

    /// The pattern of the numeral `n`.
    pub fn num_pat(&self, n: usize) -> Pattern {
        self.succ_pat(n, Pat::cons(self.zero.clone(), vec![]))
    }

    pub fn add(&self, a: Term, b: Term) -> Term {
        self.add.call(vec![a, b])
    }

    pub fn bool_ty(&self) -> Term {
        Term::data(self.bool, vec![])
    }

    pub fn empty_ty(&self) -> Term {
        Term::data(self.empty, vec![])
    }

    pub fn list_ty(&self, a: Term) -> Term {
        Term::data(self.list, vec![a])
    }

    pub fn vector_ty(&self, a: Term, n: Term) -> Term {
        Term::data(self.vector, vec![a, n])
    }

    pub fn fin_ty(&self, n: Term) -> Term {
        Term::data(self.fin, vec![n])
    }

    pub fn image_ty(&self, a: Term, b: Term, f: Term, y: Term) -> Term {
        Term::data(self.image_of, vec![a, b, f, y])
    }

    /// Decode a numeral in normal form.
    pub fn as_num(&self, t: &Term) -> Option<usize> {
        match t {
            Term::Cons(c, args) if *c == self.zero && args.is_empty() => Some(0),
            Term::Cons(c, args) if *c == self.succ && args.len() == 1 => {
                self.as_num(&args[0]).map(|n| n + 1)
            }
            _ => None,
        }
    }
}
