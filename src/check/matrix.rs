use crate::check::{Error, Oracle, Result};
use crate::ensure;
use crate::syntax::abs::{Definition, Pattern};
use crate::syntax::core::{FreeSubst, Pat, SubstFree, Term, ValData, Var};
use crate::syntax::{ConHead, Loc, UID};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// A scrutinee with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub term: Term,
    pub ty: Term,
}

/// An inaccessible term waiting to be checked against what its column turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forced {
    pub scrutinee: Term,
    pub term: Term,
    pub loc: Loc,
}

/// One equation, as a row of the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub equation: usize,
    pub loc: Loc,
    /// One pattern per column, no [`Pat::Term`] left.
    pub pats: Vec<Pattern>,
    /// Pattern variables matched so far.
    pub bindings: FreeSubst,
    pub forced: Vec<Forced>,
    pub rhs: Term,
}

impl Row {
    /// Match an irrefutable pattern against a scrutinee.
    pub fn bind(&mut self, pat: Pattern, scrutinee: &Term) {
        match pat {
            Pat::Var(x) => {
                self.bindings.insert(x, scrutinee.clone());
            }
            Pat::Forced(term) => self.forced.push(Forced {
                scrutinee: scrutinee.clone(),
                term,
                loc: self.loc,
            }),
            Pat::Wildcard => {}
            Pat::Cons(..) | Pat::Term(_) => {
                debug_assert!(false, "refutable pattern `{}` bound", pat);
            }
        }
    }

    pub fn cons_count(&self) -> usize {
        self.pats.iter().map(Pat::cons_count).sum()
    }
}

/// Ordered rows over shared columns; every row has one pattern per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatrix {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl PatternMatrix {
    /// Check the equations of `def` against its argument types and lay them out as rows.
    /// Term patterns are evaluated to constructor forms here.
    pub fn build<O: Oracle>(oracle: &mut O, def: &Definition) -> Result<Self> {
        let columns = def
            .args
            .iter()
            .map(|bind| Column {
                term: Term::free(bind.name),
                ty: bind.ty.clone(),
            })
            .collect();
        let params: HashSet<UID> = def.params.iter().map(|b| b.name).collect();
        let mut rows = Vec::with_capacity(def.equations.len());
        for (equation, eq) in def.equations.iter().enumerate() {
            ensure!(
                eq.pats.len() == def.args.len(),
                Error::ArityMismatch {
                    equation,
                    expected: def.args.len(),
                    found: eq.pats.len(),
                    loc: eq.loc,
                }
            );
            let mut builder = RowBuilder {
                oracle: &mut *oracle,
                params: &params,
                loc: eq.loc,
                equation,
            };
            // Argument types may depend on the previous arguments.
            let mut earlier = FreeSubst::new();
            let mut pats = Vec::with_capacity(eq.pats.len());
            for (bind, pat) in def.args.iter().zip(&eq.pats) {
                let ty = bind.ty.clone().subst_free(&earlier);
                let pat = builder.check_pat(pat.clone(), ty)?;
                earlier.insert(bind.name, builder.pat_to_term(&pat));
                pats.push(pat);
            }
            check_linear(&pats, equation, eq.loc)?;
            trace!(target: "case", "row {}: {}", equation, pats.iter().join(" "));
            rows.push(Row {
                equation,
                loc: eq.loc,
                pats,
                bindings: Default::default(),
                forced: Vec::new(),
                rhs: eq.rhs.clone(),
            });
        }
        Ok(PatternMatrix { columns, rows })
    }

    /// Number of constructor-pattern nodes over all rows.
    pub fn cons_count(&self) -> usize {
        self.rows.iter().map(Row::cons_count).sum()
    }
}

fn check_linear(pats: &[Pattern], equation: usize, loc: Loc) -> Result<()> {
    let mut seen = HashSet::new();
    for var in pats.iter().flat_map(Pat::vars) {
        ensure!(
            seen.insert(*var),
            Error::NonLinearPattern {
                var: *var,
                equation,
                loc,
            }
        );
    }
    Ok(())
}

struct RowBuilder<'a, O> {
    oracle: &'a mut O,
    params: &'a HashSet<UID>,
    loc: Loc,
    equation: usize,
}

impl<'a, O: Oracle> RowBuilder<'a, O> {
    fn check_pat(&mut self, pat: Pattern, ty: Term) -> Result<Pattern> {
        match pat {
            Pat::Term(term) => {
                let pat = self.term_to_pat(term)?;
                self.check_pat(pat, ty)
            }
            Pat::Cons(head, args) => self.check_cons(head, args, ty),
            Pat::Forced(term) => {
                if let Term::Cons(head, _) = self.oracle.whnf(term.clone())? {
                    self.check_family(&Pat::Forced(term.clone()), &head, &ty)?;
                }
                Ok(Pat::Forced(term))
            }
            Pat::Var(x) if self.params.contains(&x) => {
                Err(Error::NonConstructorPattern(Box::new(Term::free(x)), self.loc))
            }
            pat @ Pat::Var(_) | pat @ Pat::Wildcard => Ok(pat),
        }
    }

    fn check_cons(&mut self, head: ConHead, args: Vec<Pattern>, ty: Term) -> Result<Pattern> {
        let pat = Pat::Cons(head.clone(), args.clone());
        let data = self.check_family(&pat, &head, &ty)?;
        let info = self.oracle.cons(head.cons_gi)?.clone();
        ensure!(
            args.len() == info.params.len(),
            Error::ArityMismatch {
                equation: self.equation,
                expected: info.params.len(),
                found: args.len(),
                loc: self.loc,
            }
        );
        let n_params = self.oracle.data(data.def)?.params.len();
        let mut env = data.args[..n_params].to_vec();
        let mut checked = Vec::with_capacity(args.len());
        for (bind, arg) in info.params.iter().zip(args) {
            let field_ty = bind.ty.clone().instantiate_tele(&env);
            let arg = self.check_pat(arg, field_ty)?;
            env.push(self.pat_to_term(&arg));
            checked.push(arg);
        }
        Ok(Pat::Cons(ConHead::new(info.name, head.cons_gi), checked))
    }

    /// The family of `ty`, which must be the one `head` constructs.
    fn check_family(&mut self, pat: &Pattern, head: &ConHead, ty: &Term) -> Result<ValData> {
        let data = self.oracle.as_data(ty.clone())?;
        let owner = self.oracle.cons(head.cons_gi)?.data_gi;
        if owner != data.def {
            return Err(Error::TypeMismatch {
                pat: Box::new(pat.clone()),
                expected: self.oracle.data(data.def)?.name.clone(),
                found: self.oracle.data(owner)?.name.clone(),
                loc: self.loc,
            });
        }
        Ok(data)
    }

    /// Evaluate a term in pattern position to a constructor tree.
    fn term_to_pat(&mut self, term: Term) -> Result<Pattern> {
        match self.oracle.whnf(term.clone())? {
            Term::Cons(head, args) => {
                let args = args
                    .into_iter()
                    .map(|arg| self.term_to_pat(arg))
                    .collect::<Result<_>>()?;
                Ok(Pat::Cons(head, args))
            }
            Term::Var(Var::Free(x), args) if args.is_empty() && !self.params.contains(&x) => {
                Ok(Pat::Var(x))
            }
            t if t.is_stuck_elim() || matches!(t, Term::Redex(..)) => {
                debug!(target: "case", "pattern `{}` is stuck at `{}`", term, t);
                Err(Error::NonNormalizingPattern(Box::new(term), self.loc))
            }
            _ => Err(Error::NonConstructorPattern(Box::new(term), self.loc)),
        }
    }

    /// The value a checked pattern stands for; wildcards become fresh variables.
    fn pat_to_term(&mut self, pat: &Pattern) -> Term {
        match pat {
            Pat::Var(x) => Term::free(*x),
            Pat::Wildcard => Term::free(self.oracle.fresh_uid()),
            Pat::Cons(head, args) => {
                Term::Cons(head.clone(), args.iter().map(|a| self.pat_to_term(a)).collect())
            }
            Pat::Forced(t) | Pat::Term(t) => t.clone(),
        }
    }
}

impl SubstFree for Column {
    fn subst_free(self, map: &FreeSubst) -> Self {
        Column {
            term: self.term.subst_free(map),
            ty: self.ty.subst_free(map),
        }
    }
}

impl SubstFree for Forced {
    fn subst_free(self, map: &FreeSubst) -> Self {
        Forced {
            scrutinee: self.scrutinee.subst_free(map),
            term: self.term.subst_free(map),
            loc: self.loc,
        }
    }
}

impl SubstFree for Pattern {
    fn subst_free(self, map: &FreeSubst) -> Self {
        self.map_term(&mut |t: Term| t.subst_free(map))
    }
}

impl SubstFree for Row {
    fn subst_free(self, map: &FreeSubst) -> Self {
        Row {
            equation: self.equation,
            loc: self.loc,
            pats: self.pats.subst_free(map),
            bindings: (self.bindings.into_iter())
                .map(|(x, t)| (x, t.subst_free(map)))
                .collect(),
            forced: self.forced.subst_free(map),
            rhs: self.rhs.subst_free(map),
        }
    }
}

impl SubstFree for PatternMatrix {
    fn subst_free(self, map: &FreeSubst) -> Self {
        PatternMatrix {
            columns: self.columns.subst_free(map),
            rows: self.rows.subst_free(map),
        }
    }
}

impl Display for PatternMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let columns = self.columns.iter().map(|c| format!("{} : {}", c.term, c.ty));
        writeln!(f, "[{}]", columns.format(", "))?;
        for row in &self.rows {
            writeln!(f, "  {}: {} := {}", row.equation, row.pats.iter().join(" "), row.rhs)?;
        }
        Ok(())
    }
}
