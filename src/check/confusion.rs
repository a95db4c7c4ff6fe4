use crate::check::{Error, Oracle, Result};
use crate::syntax::core::{FreeSubst, SubstFree, Term};
use crate::syntax::{ConHead, GI, UID};
use std::collections::{HashSet, VecDeque};
use std::fmt::{Display, Formatter};

/// `lhs = rhs` at type `ty`, witnessed by the hypothesis `hyp`.
///
/// During a split, `lhs` is an index of the constructor's result type and `rhs` the
/// matching index of the scrutinee's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConstraint {
    pub hyp: UID,
    pub ty: Term,
    pub lhs: Term,
    pub rhs: Term,
}

impl IndexConstraint {
    pub fn new(hyp: UID, ty: Term, lhs: Term, rhs: Term) -> Self {
        Self { hyp, ty, lhs, rhs }
    }

    pub fn hyp_type(&self) -> Term {
        Term::id(self.ty.clone(), self.lhs.clone(), self.rhs.clone())
    }
}

impl Display for IndexConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {} = {}", Term::free(self.hyp), self.lhs, self.rhs)
    }
}

/// How one equation was discharged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Both sides were already equal.
    Delete { proof: Term },
    /// `var := value`; the branch body is transported along `proof`.
    Solve { var: UID, value: Term, proof: Term },
    /// Both sides had the same head, replaced by one equation per field.
    Inject { head: ConHead, proof: Term },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub steps: Vec<Step>,
    /// Idempotent: no value mentions a solved variable.
    pub subst: FreeSubst,
}

/// Evidence that an equation between two constructor forms is impossible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refutation {
    /// The family both sides belong to.
    pub data: GI,
    pub left: Term,
    pub right: Term,
    /// Proof of `left = right`, built from the branch hypotheses and transported along
    /// the equations solved before it.
    pub proof: Term,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unification {
    Solved(Solution),
    Conflict(Refutation),
}

/// An equation still to be solved.
struct Equation {
    proof: Term,
    ty: Term,
    lhs: Term,
    rhs: Term,
}

impl Equation {
    /// Apply a solution found before this equation. The proof is transported along
    /// `solved` so that its type agrees with the rewritten sides.
    fn rewrite(self, map: &FreeSubst, solved: &Term) -> Self {
        Equation {
            proof: Term::transport(solved.clone(), self.proof),
            ty: self.ty.subst_free(map),
            lhs: self.lhs.subst_free(map),
            rhs: self.rhs.subst_free(map),
        }
    }
}

/// Solve the index equations of a split, first to last.
///
/// Variables in `rigid` are never solved. When both sides are solvable variables, those in
/// `fresh` (the fields of the constructor) are solved first.
pub fn unify_indices<O: Oracle>(
    oracle: &mut O,
    constraints: &[IndexConstraint],
    fresh: &[UID],
    rigid: &HashSet<UID>,
) -> Result<Unification> {
    let mut queue: VecDeque<Equation> = constraints
        .iter()
        .map(|c| Equation {
            proof: Term::free(c.hyp),
            ty: c.ty.clone(),
            lhs: c.lhs.clone(),
            rhs: c.rhs.clone(),
        })
        .collect();
    let mut steps = Vec::new();
    let mut subst = FreeSubst::new();
    while let Some(eq) = queue.pop_front() {
        let lhs = oracle.whnf(eq.lhs)?;
        let rhs = oracle.whnf(eq.rhs)?;
        trace!(target: "unify", "{} =? {}", lhs, rhs);
        if oracle.def_eq(&lhs, &rhs) {
            steps.push(Step::Delete { proof: eq.proof });
            continue;
        }
        if let Some((var, value)) = orient(&lhs, &rhs, fresh, rigid) {
            if value.occurs(var) {
                debug!(target: "unify", "`{}` occurs in `{}`", Term::free(var), value);
                return Err(Error::DependentEliminationFailed(Box::new(lhs), Box::new(rhs)));
            }
            debug!(target: "unify", "solved {} := {}", Term::free(var), value);
            let one = FreeSubst::from([(var, value.clone())]);
            for v in subst.values_mut() {
                *v = std::mem::replace(v, Term::universe(0)).subst_free(&one);
            }
            subst.insert(var, value.clone());
            queue = queue.into_iter().map(|e| e.rewrite(&one, &eq.proof)).collect();
            steps.push(Step::Solve {
                var,
                value,
                proof: eq.proof,
            });
            continue;
        }
        match (lhs, rhs) {
            (Term::Cons(c0, a0), Term::Cons(c1, a1)) if c0 == c1 && a0.len() == a1.len() => {
                let data = oracle.as_data(eq.ty)?;
                let n_params = oracle.data(data.def)?.params.len();
                let field_tys = oracle.field_types(c0.cons_gi, &data.args[..n_params], &a0)?;
                let fields = (a0.into_iter().zip(a1).zip(field_tys)).enumerate();
                let injected = fields
                    .map(|(l, ((lhs, rhs), ty))| Equation {
                        proof: Term::injection(eq.proof.clone(), c0.clone(), l),
                        ty,
                        lhs,
                        rhs,
                    })
                    .collect::<Vec<_>>();
                for e in injected.into_iter().rev() {
                    queue.push_front(e);
                }
                steps.push(Step::Inject {
                    head: c0,
                    proof: eq.proof,
                });
            }
            (left @ Term::Cons(..), right @ Term::Cons(..)) => {
                let data = oracle.as_data(eq.ty)?.def;
                debug!(target: "unify", "conflict: {} = {}", left, right);
                return Ok(Unification::Conflict(Refutation {
                    data,
                    left,
                    right,
                    proof: eq.proof,
                }));
            }
            (lhs, rhs) => {
                return Err(Error::DependentEliminationFailed(Box::new(lhs), Box::new(rhs)))
            }
        }
    }
    Ok(Unification::Solved(Solution { steps, subst }))
}

/// The variable to solve and its value, if either side is a solvable variable.
fn orient(lhs: &Term, rhs: &Term, fresh: &[UID], rigid: &HashSet<UID>) -> Option<(UID, Term)> {
    let flexible = |t: &Term| t.free_view().filter(|x| !rigid.contains(x));
    let mut solvable = [(flexible(lhs), rhs), (flexible(rhs), lhs)]
        .into_iter()
        .filter_map(|(var, value)| var.map(|x| (x, value)));
    let first = solvable.next()?;
    let chosen = match solvable.next() {
        Some(second) if !fresh.contains(&first.0) && fresh.contains(&second.0) => second,
        _ => first,
    };
    Some((chosen.0, chosen.1.clone()))
}

/// Check that a refutation is a genuine constructor clash within its family.
pub fn no_confusion<O: Oracle>(oracle: &mut O, refutation: &Refutation) -> Result<()> {
    let name = oracle.data(refutation.data)?.name.clone();
    let fail = |reason: String| Err(Error::UnreachableBranchProofFailure(name.clone(), reason));
    let left = oracle.whnf(refutation.left.clone())?;
    let right = oracle.whnf(refutation.right.clone())?;
    let (c0, a0, c1, a1) = match (&left, &right) {
        (Term::Cons(c0, a0), Term::Cons(c1, a1)) => (c0, a0, c1, a1),
        _ => return fail(format!("`{}` and `{}` are not both constructors", left, right)),
    };
    if c0 == c1 {
        return fail(format!("both sides are built with `{}`", c0));
    }
    for (head, args) in [(c0, a0), (c1, a1)] {
        let info = oracle.cons(head.cons_gi)?;
        if info.data_gi != refutation.data {
            return fail(format!("`{}` does not construct `{}`", head, name));
        }
        if info.params.len() != args.len() {
            return fail(format!(
                "`{}` takes {} fields, got {}",
                head,
                info.params.len(),
                args.len()
            ));
        }
    }
    Ok(())
}
