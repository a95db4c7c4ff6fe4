use crate::syntax::core::redex::Subst;
use crate::syntax::core::subst::Substitution;
use crate::syntax::core::DeBruijn;
use crate::syntax::{pattern, ConHead, Ident, Loc, Universe, DBI, GI, UID};

pub type Pat<Ix = UID, T = Term> = pattern::Pat<Ix, T>;

pub type Bind<T = Term> = crate::syntax::Bind<T>;

/// Telescopes.
pub type Tele = Vec<Bind>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ValData {
    pub def: GI,
    /// Parameters followed by indices.
    pub args: Vec<Term>,
}

impl ValData {
    pub fn new(def: GI, args: Vec<Term>) -> Self {
        Self { def, args }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Lambda(pub Bind<Box<Term>>, pub Closure);

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Closure {
    Plain(Box<Term>),
}

impl Closure {
    pub fn instantiate(self, arg: Term) -> Term {
        let Closure::Plain(body) = self;
        *body.subst(Substitution::one(arg))
    }

    pub fn body(&self) -> &Term {
        let Closure::Plain(body) = self;
        body
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Var {
    Bound(DBI),
    Free(UID),
}

/// Homogeneous identity type `Id_A(a1, a2)`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Id {
    pub ty: Box<Term>,
    pub a1: Box<Term>,
    pub a2: Box<Term>,
}

impl Id {
    pub fn new(ty: Term, a1: Term, a2: Term) -> Self {
        Self {
            ty: Box::new(ty),
            a1: Box::new(a1),
            a2: Box::new(a2),
        }
    }
}

/// One branch of [`CasesOn`]. The body sees the constructor fields as the innermost
/// `arity` de Bruijn indices, the last field being `0`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Case {
    pub cons: ConHead,
    pub arity: usize,
    pub body: Term,
}

impl Case {
    pub fn new(cons: ConHead, arity: usize, body: Term) -> Self {
        Self { cons, arity, body }
    }
}

/// The primitive case-analysis operator of an inductive family.
///
/// ```text
/// cases_on[D ps] (motive : Π is (x : D ps is). Type) (major : D ps is')
///     | c_1 fs => b_1 : Π (h : Id(I, c_1.is, is')). motive c_1.is (c_1 fs)
///     ...
///     args
/// ```
/// The branch for the head of `major` receives `args`. The compiler always passes
/// `refl` proofs of the scrutinee indices first, so every branch starts by binding
/// one equation per index.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CasesOn {
    pub data: GI,
    pub params: Vec<Term>,
    pub motive: Box<Term>,
    pub major: Box<Term>,
    /// Exactly one case per constructor, in declaration order.
    pub cases: Vec<Case>,
    pub args: Vec<Term>,
}

/// Rewriting along an index equation (the `J` eliminator with its motive erased).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Transport {
    pub proof: Box<Term>,
    pub body: Box<Term>,
}

/// Elimination of an impossible index equation between distinct constructors.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NoConfusion {
    /// Family of the two sides of the equation.
    pub data: GI,
    /// Type of the branch being discharged.
    pub ty: Box<Term>,
    pub proof: Box<Term>,
}

/// Type for terms.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Term {
    /// Type universe.
    Universe(Universe),
    /// Inductive families, applied to parameters and indices.
    Data(ValData),
    /// Pi-like types (dependent types), with parameter explicitly typed.
    Pi(Bind<Box<Term>>, Closure),
    Lam(Lambda),
    /// Constructor invocation, fields only (family parameters are implicit).
    Cons(ConHead, Vec<Term>),
    /// Variable application, in spine-normal form.
    Var(Var, Vec<Term>),
    /// Reference to a global function, applied.
    Redex(GI, Ident, Vec<Term>),
    /// Identity (equality) type.
    Id(Id),
    Refl(Box<Term>),
    CasesOn(CasesOn),
    /// `transport p b` computes to `b` once `p` is `refl`.
    Transport(Transport),
    /// Constructor injectivity.
    ///
    /// ```text
    ///      p : Id_D(c as, c bs)
    /// ------------------------------
    ///  injection_l p : Id(as_l, bs_l)
    /// ```
    /// Computes when `p` is `refl (c as)`.
    Injection(Box<Term>, ConHead, usize),
    /// Never computes: its proof is an equation between distinct constructors.
    NoConfusion(NoConfusion),
}

impl From<Universe> for Term {
    fn from(u: Universe) -> Self {
        Term::Universe(u)
    }
}

impl From<ValData> for Term {
    fn from(d: ValData) -> Self {
        Term::Data(d)
    }
}

impl Term {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn universe(level: u32) -> Self {
        Term::Universe(Universe(level))
    }

    pub fn free(uid: UID) -> Self {
        Term::Var(Var::Free(uid), Vec::new())
    }

    pub fn data(def: GI, args: Vec<Term>) -> Self {
        Term::Data(ValData::new(def, args))
    }

    pub fn cons(head: ConHead, args: Vec<Term>) -> Self {
        Term::Cons(head, args)
    }

    pub fn def(gi: GI, ident: Ident, args: Vec<Term>) -> Self {
        Term::Redex(gi, ident, args)
    }

    pub fn id(ty: Term, a1: Term, a2: Term) -> Self {
        Term::Id(Id::new(ty, a1, a2))
    }

    pub fn refl(t: Term) -> Self {
        Term::Refl(Box::new(t))
    }

    pub fn transport(proof: Term, body: Term) -> Self {
        Term::Transport(Transport {
            proof: Box::new(proof),
            body: Box::new(body),
        })
    }

    pub fn injection(proof: Term, head: ConHead, field: usize) -> Self {
        Term::Injection(Box::new(proof), head, field)
    }

    /// Non-dependent function type.
    pub fn arrow(from: Term, to: Term) -> Self {
        Term::Pi(
            Bind::boxing(0, from, Loc::default()),
            Closure::Plain(Box::new(to.raised(1))),
        )
    }

    /// `Π tele. body`, abstracting the telescope's free variables.
    pub fn pi_over(tele: &[Bind], body: Term) -> Self {
        tele.iter().rev().fold(body, |body, bind| {
            let ty = bind.ty.clone();
            Term::Pi(
                Bind::boxing(bind.name, ty, bind.loc),
                Closure::Plain(Box::new(body.abstract_over(&[bind.name]))),
            )
        })
    }

    /// `λ tele. body`, abstracting the telescope's free variables.
    pub fn lam_over(tele: &[Bind], body: Term) -> Self {
        tele.iter().rev().fold(body, |body, bind| {
            let ty = bind.ty.clone();
            Term::Lam(Lambda(
                Bind::boxing(bind.name, ty, bind.loc),
                Closure::Plain(Box::new(body.abstract_over(&[bind.name]))),
            ))
        })
    }

    /// `Π tele. body` for a telescope already in de Bruijn form.
    pub fn pi_tele(tele: &[Bind], body: Term) -> Self {
        tele.iter().rev().fold(body, |body, bind| {
            Term::Pi(bind.clone().boxed(), Closure::Plain(Box::new(body)))
        })
    }

    /// Instantiate a term closed over a telescope, `env` in declaration order.
    pub fn instantiate_tele(self, env: &[Term]) -> Term {
        if env.is_empty() {
            return self;
        }
        self.subst(Substitution::parallel(env.iter().rev().cloned()))
    }

    pub fn raised(self, by: DBI) -> Term {
        if by == 0 {
            return self;
        }
        Substitution::raise_term(by, self)
    }

    pub fn free_view(&self) -> Option<UID> {
        match self {
            Term::Var(Var::Free(uid), args) if args.is_empty() => Some(*uid),
            _ => None,
        }
    }

    /// Eliminators whose reduction got stuck on a neutral term.
    pub fn is_stuck_elim(&self) -> bool {
        matches!(
            self,
            Term::CasesOn(_) | Term::Transport(_) | Term::Injection(..) | Term::NoConfusion(_)
        )
    }

    pub fn apply(self, args: Vec<Term>) -> Term {
        if args.is_empty() {
            return self;
        }
        match self {
            Term::Var(v, mut a) => {
                a.extend(args);
                Term::Var(v, a)
            }
            Term::Redex(gi, id, mut a) => {
                a.extend(args);
                Term::Redex(gi, id, a)
            }
            Term::Cons(c, mut a) => {
                a.extend(args);
                Term::Cons(c, a)
            }
            Term::Data(ValData { def, args: mut a }) => {
                a.extend(args);
                Term::Data(ValData::new(def, a))
            }
            Term::Lam(Lambda(bind, clos)) => {
                let mut args = args.into_iter();
                match args.next() {
                    Some(first) => clos.instantiate(first).apply(args.collect()),
                    None => Term::Lam(Lambda(bind, clos)),
                }
            }
            Term::CasesOn(mut c) => {
                c.args.extend(args);
                Term::CasesOn(c)
            }
            Term::Transport(Transport { proof, body }) => Term::Transport(Transport {
                proof,
                body: Box::new(body.apply(args)),
            }),
            // Never reduces, so the spine carries no information.
            t @ Term::NoConfusion(_) => t,
            e => panic!("Cannot eliminate `{}`.", e),
        }
    }
}

impl DeBruijn for Term {
    fn dbi_view(&self) -> Option<DBI> {
        match self {
            Term::Var(Var::Bound(i), args) if args.is_empty() => Some(*i),
            _ => None,
        }
    }

    fn from_dbi(dbi: DBI) -> Self {
        Term::Var(Var::Bound(dbi), Vec::new())
    }
}
