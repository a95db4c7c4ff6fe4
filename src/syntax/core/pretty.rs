use crate::syntax::core::term::{Bind, CasesOn, Id, Lambda, NoConfusion, Transport};
use crate::syntax::core::{Closure, Term, ValData, Var};
use std::fmt::{Display, Error, Formatter};

impl Display for Term {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        use Term::*;
        match self {
            Var(v, a) => display_application(f, v, a),
            Universe(l) => write!(f, "{}", l),
            Pi(Bind { ty, .. }, clos) => write!(f, "({} -> {})", ty, clos),
            Lam(lam) => lam.fmt(f),
            Cons(name, a) => display_application(f, name, a),
            Data(info) => info.fmt(f),
            Id(id) => id.fmt(f),
            Refl(t) => write!(f, "(refl {})", t),
            Redex(_, ident, args) => display_application(f, &ident.text, args),
            CasesOn(c) => c.fmt(f),
            Transport(t) => t.fmt(f),
            Injection(p, head, l) => write!(f, "(injection[{}.{}] {})", head, l, p),
            NoConfusion(n) => n.fmt(f),
        }
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(Id {} {} {})", self.ty, self.a1, self.a2)
    }
}

impl Display for Lambda {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Lambda(Bind { ty, .. }, clos) = self;
        write!(f, "(\\{}. {})", ty, clos)
    }
}

impl Display for CasesOn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(cases_on[data{}] {} {{", self.data, self.major)?;
        for case in &self.cases {
            write!(f, " | {}/{} => {}", case.cons, case.arity, case.body)?;
        }
        f.write_str(" }")?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        f.write_str(")")
    }
}

impl Display for Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(transport {} {})", self.proof, self.body)
    }
}

impl Display for NoConfusion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(no_confusion {})", self.proof)
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Var::Bound(i) => {
                write!(f, "@{}", i)
            }
            Var::Free(i) => {
                if *i < 26 {
                    let ci = (97 + *i) as u8 as char;
                    write!(f, "{}", ci)
                } else {
                    write!(f, "#{}", i)
                }
            }
        }
    }
}

impl Display for ValData {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        display_application(f, &format!("data{}", self.def), &self.args)
    }
}

impl Display for Closure {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let Closure::Plain(body) = self;
        body.fmt(f)
    }
}

pub fn display_application(
    f: &mut Formatter,
    fun: &impl Display,
    a: &[impl Display],
) -> Result<(), Error> {
    if a.is_empty() {
        fun.fmt(f)
    } else {
        write!(f, "({}", fun)?;
        for x in a {
            write!(f, " {}", x)?;
        }
        f.write_str(")")
    }
}
