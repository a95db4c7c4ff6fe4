use crate::check::confusion::{
    no_confusion, unify_indices, IndexConstraint, Refutation, Step, Unification,
};
use crate::check::matrix::{Column, PatternMatrix};
use crate::check::{Error, Oracle, Result};
use crate::syntax::abs::Pattern;
use crate::syntax::core::{Bind, FreeSubst, Pat, SubstFree, Tele, Term, ValData};
use crate::syntax::{ConHead, Ident, UID};
use itertools::Itertools;
use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter};
use std::mem::take;

/// What is left to match in one branch of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub matrix: PatternMatrix,
    /// Result type, refined by the splits above.
    pub target: Term,
    /// The arguments as seen by this branch.
    pub shape: Vec<Term>,
}

impl Problem {
    pub fn new(matrix: PatternMatrix, target: Term) -> Self {
        let shape = matrix.columns.iter().map(|c| c.term.clone()).collect();
        Self {
            matrix,
            target,
            shape,
        }
    }

    /// Constructor patterns left, then columns left. Once simplified, every branch of a
    /// split is strictly below its parent.
    fn measure(&self) -> (usize, usize) {
        (self.matrix.cons_count(), self.matrix.columns.len())
    }
}

impl SubstFree for Problem {
    fn subst_free(self, map: &FreeSubst) -> Self {
        Problem {
            matrix: self.matrix.subst_free(map),
            target: self.target.subst_free(map),
            shape: self.shape.subst_free(map),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub equation: usize,
    pub rhs: Term,
}

/// A branch whose index equations have no solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unreachable {
    pub refutation: Refutation,
    /// Type of the discharged branch.
    pub ty: Term,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub cons: ConHead,
    pub fields: Tele,
    /// One hypothesis per index of the family.
    pub constraints: Vec<IndexConstraint>,
    pub steps: Vec<Step>,
    pub tree: CaseTree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub var: UID,
    /// Type of the scrutinee.
    pub data: ValData,
    pub target: Term,
    /// One branch per constructor, in declaration order.
    pub branches: Vec<Branch>,
}

/// Case tree.
///
/// For example, the equations
/// ```text
/// f zero     y        := 1
/// f x        zero     := 2
/// f (succ x) (succ y) := 3
/// ```
/// are compiled to
/// ```text
/// split a
///  | zero   => [0]
///  | succ c => split b
///     | zero   => [1]
///     | succ e => [2]
/// ```
/// The second equation shadows nothing, but only holds for `succ` first arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseTree {
    Leaf(Leaf),
    Unreachable(Unreachable),
    Split(Split),
}

impl CaseTree {
    /// Equations reached by some leaf.
    pub fn equations(&self) -> BTreeSet<usize> {
        let mut used = BTreeSet::new();
        self.collect_equations(&mut used);
        used
    }

    fn collect_equations(&self, used: &mut BTreeSet<usize>) {
        match self {
            CaseTree::Leaf(leaf) => {
                used.insert(leaf.equation);
            }
            CaseTree::Unreachable(_) => {}
            CaseTree::Split(split) => {
                for branch in &split.branches {
                    branch.tree.collect_equations(used);
                }
            }
        }
    }

    fn fmt_indented(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        match self {
            CaseTree::Leaf(leaf) => writeln!(f, "[{}] {}", leaf.equation, leaf.rhs),
            CaseTree::Unreachable(u) => writeln!(f, "no_confusion {}", u.refutation.proof),
            CaseTree::Split(split) => {
                writeln!(f, "split {}", Term::free(split.var))?;
                for branch in &split.branches {
                    let fields = branch.fields.iter().map(|b| Term::free(b.name)).join(" ");
                    write!(f, "{:width$} | {} {} => ", "", branch.cons, fields, width = depth)?;
                    branch.tree.fmt_indented(f, depth + 3)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for CaseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// A leaf with the arguments that lead to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafInfo {
    pub equation: usize,
    pub shape: Vec<Term>,
    pub rhs: Term,
}

/// One constructor of a split, before recursing into it.
struct Candidate {
    cons: ConHead,
    fields: Tele,
    value: Term,
    constraints: Vec<IndexConstraint>,
    unification: Unification,
}

/// Compiles a pattern matrix to a case tree, one split at a time.
///
/// The policy, on the problem of each branch:
/// 1. columns holding a constructor value are matched away in every row;
///    columns where no row inspects anything are dropped;
/// 2. if the first row inspects nothing, it wins: its right-hand side is the leaf;
/// 3. otherwise split the leftmost column where the first row has a constructor pattern,
///    and solve the index equations of each constructor; constructors whose equations
///    are contradictory become unreachable branches.
///
/// Rows keep their order throughout, so earlier equations take precedence.
pub struct Compiler<'a, O: Oracle> {
    oracle: &'a mut O,
    name: Ident,
    /// Variables that index unification must not solve.
    rigid: HashSet<UID>,
    leaves: Vec<LeafInfo>,
}

impl<'a, O: Oracle> Compiler<'a, O> {
    pub fn new(oracle: &'a mut O, name: Ident, rigid: HashSet<UID>) -> Self {
        Self {
            oracle,
            name,
            rigid,
            leaves: Vec::new(),
        }
    }

    pub fn into_leaves(self) -> Vec<LeafInfo> {
        self.leaves
    }

    pub fn compile(&mut self, problem: Problem) -> Result<CaseTree> {
        self.compile_below(problem, None)
    }

    fn compile_below(
        &mut self,
        mut problem: Problem,
        parent: Option<(usize, usize)>,
    ) -> Result<CaseTree> {
        self.simplify(&mut problem)?;
        let measure = problem.measure();
        debug!(target: "case", "{}: {:?}\n{}", self.name, measure, problem.matrix);
        if let Some(parent) = parent {
            debug_assert!(measure < parent, "{:?} is not below {:?}", measure, parent);
        }
        if problem.matrix.rows.is_empty() {
            return self.refute(problem);
        }
        match problem.matrix.rows[0].pats.iter().position(Pat::is_cons) {
            None => self.done(problem),
            Some(column) => self.split(problem, column),
        }
    }

    fn simplify(&mut self, problem: &mut Problem) -> Result<()> {
        'expand: loop {
            for j in 0..problem.matrix.columns.len() {
                let term = self.oracle.whnf(problem.matrix.columns[j].term.clone())?;
                problem.matrix.columns[j].term = term.clone();
                if let Term::Cons(head, fields) = term {
                    if fields.len() == self.oracle.cons(head.cons_gi)?.params.len() {
                        self.expand(problem, j, head, fields)?;
                        continue 'expand;
                    }
                }
            }
            break;
        }
        if !problem.matrix.rows.is_empty() {
            drop_irrefutable_columns(&mut problem.matrix);
        }
        Ok(())
    }

    /// Match column `j`, which holds `head fields`, in every row.
    fn expand(
        &mut self,
        problem: &mut Problem,
        j: usize,
        head: ConHead,
        fields: Vec<Term>,
    ) -> Result<()> {
        let column = problem.matrix.columns.remove(j);
        let data = self.oracle.as_data(column.ty)?;
        let n_params = self.oracle.data(data.def)?.params.len();
        let field_tys = self
            .oracle
            .field_types(head.cons_gi, &data.args[..n_params], &fields)?;
        let arity = fields.len();
        let scrutinee = Term::Cons(head.clone(), fields.clone());
        let mut rows = Vec::with_capacity(problem.matrix.rows.len());
        for mut row in take(&mut problem.matrix.rows) {
            let sub = match row.pats.remove(j) {
                Pat::Cons(c, sub) if c == head => sub,
                Pat::Cons(c, _) => {
                    trace!(target: "case", "row {} dropped, `{}` is not `{}`", row.equation, c, head);
                    continue;
                }
                Pat::Term(t) => return Err(Error::NonConstructorPattern(Box::new(t), row.loc)),
                pat => {
                    row.bind(pat, &scrutinee);
                    vec![Pat::Wildcard; arity]
                }
            };
            row.pats.splice(j..j, sub);
            rows.push(row);
        }
        problem.matrix.rows = rows;
        let columns = (fields.into_iter().zip(field_tys)).map(|(term, ty)| Column { term, ty });
        problem.matrix.columns.splice(j..j, columns);
        Ok(())
    }

    /// The first row inspects nothing: it is the leaf.
    fn done(&mut self, problem: Problem) -> Result<CaseTree> {
        let Problem { matrix, shape, .. } = problem;
        let mut row = match matrix.rows.into_iter().next() {
            Some(row) => row,
            None => {
                return Err(Error::IncompleteMatch {
                    name: self.name.clone(),
                    missing: shape.iter().map(shape_pattern).join(" "),
                })
            }
        };
        for (column, pat) in matrix.columns.iter().zip(take(&mut row.pats)) {
            row.bind(pat, &column.term);
        }
        let sigma = row.bindings;
        for forced in row.forced {
            let expected = forced.term.subst_free(&sigma);
            if !self.oracle.def_eq(&expected, &forced.scrutinee) {
                return Err(Error::InaccessibleMismatch {
                    expected: Box::new(expected),
                    found: Box::new(forced.scrutinee),
                    loc: forced.loc,
                });
            }
        }
        let rhs = row.rhs.subst_free(&sigma);
        debug!(target: "case", "{}: equation {} at `{}`", self.name, row.equation, shape.iter().join(" "));
        self.leaves.push(LeafInfo {
            equation: row.equation,
            shape,
            rhs: rhs.clone(),
        });
        Ok(CaseTree::Leaf(Leaf {
            equation: row.equation,
            rhs,
        }))
    }

    /// The variable in column `j`, its family, and each constructor with its index equations
    /// solved.
    fn candidates(&mut self, problem: &Problem, j: usize) -> Result<(UID, ValData, Vec<Candidate>)> {
        let column = &problem.matrix.columns[j];
        let var = column
            .term
            .free_view()
            .ok_or_else(|| Error::NotSplittable(Box::new(column.term.clone())))?;
        let data = self.oracle.as_data(column.ty.clone())?;
        let info = self.oracle.data(data.def)?.clone();
        let (params, indices) = data.args.split_at(info.params.len());
        let mut candidates = Vec::with_capacity(info.conses.len());
        for &cons_gi in &info.conses {
            let cons = self.oracle.cons_head(cons_gi)?;
            let (fields, cons_indices) = self.oracle.instantiate_cons(cons_gi, params)?;
            let index_tys = self.oracle.index_types(data.def, params, &cons_indices)?;
            let constraints = (cons_indices.into_iter().zip(indices.iter().cloned()))
                .zip(index_tys)
                .map(|((lhs, rhs), ty)| IndexConstraint::new(self.oracle.fresh_uid(), ty, lhs, rhs))
                .collect::<Vec<_>>();
            let fresh: Vec<UID> = fields.iter().map(|b| b.name).collect();
            let unification = unify_indices(self.oracle, &constraints, &fresh, &self.rigid)?;
            let value = Term::Cons(cons.clone(), fields.iter().map(|b| Term::free(b.name)).collect());
            candidates.push(Candidate {
                cons,
                fields,
                value,
                constraints,
                unification,
            });
        }
        Ok((var, data, candidates))
    }

    fn split(&mut self, problem: Problem, j: usize) -> Result<CaseTree> {
        let (var, data, candidates) = self.candidates(&problem, j)?;
        let measure = problem.measure();
        debug!(target: "case", "{}: split on `{}`", self.name, Term::free(var));
        let mut branches = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let (steps, tree) = match candidate.unification {
                Unification::Conflict(refutation) => {
                    no_confusion(self.oracle, &refutation)?;
                    debug!(target: "case", "{}: `{}` is impossible here", self.name, candidate.cons);
                    let ty = problem
                        .target
                        .clone()
                        .subst_free(&FreeSubst::from([(var, candidate.value)]));
                    (
                        Vec::new(),
                        CaseTree::Unreachable(Unreachable { refutation, ty }),
                    )
                }
                Unification::Solved(solution) => {
                    let mut sigma = solution.subst;
                    let value = candidate.value.subst_free(&sigma);
                    sigma.insert(var, value);
                    let child = problem.clone().subst_free(&sigma);
                    let tree = self.compile_below(child, Some(measure))?;
                    (solution.steps, tree)
                }
            };
            branches.push(Branch {
                cons: candidate.cons,
                fields: candidate.fields,
                constraints: candidate.constraints,
                steps,
                tree,
            });
        }
        Ok(CaseTree::Split(Split {
            var,
            data,
            target: problem.target,
            branches,
        }))
    }

    /// No row is left: the branch must be impossible. Look for a column whose type has no
    /// constructor compatible with its indices.
    fn refute(&mut self, problem: Problem) -> Result<CaseTree> {
        for j in 0..problem.matrix.columns.len() {
            let column = &problem.matrix.columns[j];
            if column.term.free_view().is_none() {
                continue;
            }
            if !matches!(self.oracle.whnf(column.ty.clone())?, Term::Data(_)) {
                continue;
            }
            let (var, data, candidates) = match self.candidates(&problem, j) {
                Ok(split) => split,
                Err(Error::DependentEliminationFailed(..)) => continue,
                Err(e) => return Err(e),
            };
            let refuted = candidates
                .iter()
                .all(|c| matches!(c.unification, Unification::Conflict(_)));
            if !refuted {
                continue;
            }
            debug!(target: "case", "{}: `{}` has no possible constructor", self.name, Term::free(var));
            let mut branches = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                if let Unification::Conflict(refutation) = candidate.unification {
                    no_confusion(self.oracle, &refutation)?;
                    let ty = problem
                        .target
                        .clone()
                        .subst_free(&FreeSubst::from([(var, candidate.value)]));
                    branches.push(Branch {
                        cons: candidate.cons,
                        fields: candidate.fields,
                        constraints: candidate.constraints,
                        steps: Vec::new(),
                        tree: CaseTree::Unreachable(Unreachable { refutation, ty }),
                    });
                }
            }
            return Ok(CaseTree::Split(Split {
                var,
                data,
                target: problem.target,
                branches,
            }));
        }
        Err(Error::IncompleteMatch {
            name: self.name.clone(),
            missing: problem.shape.iter().map(shape_pattern).join(" "),
        })
    }
}

/// Remove the columns no row inspects, binding their variables.
fn drop_irrefutable_columns(matrix: &mut PatternMatrix) {
    let mut j = matrix.columns.len();
    while j > 0 {
        j -= 1;
        if matrix.rows.iter().all(|row| row.pats[j].is_irrefutable()) {
            let column = matrix.columns.remove(j);
            for row in &mut matrix.rows {
                let pat = row.pats.remove(j);
                row.bind(pat, &column.term);
            }
        }
    }
}

/// A representative pattern for an argument shape: variables become wildcards.
fn shape_pattern(term: &Term) -> Pattern {
    match term {
        Term::Cons(head, args) => Pat::Cons(head.clone(), args.iter().map(shape_pattern).collect()),
        Term::Var(..) => Pat::Wildcard,
        t => Pat::Forced(t.clone()),
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self.fields.iter().map(Bind::to_string).join(" ");
        write!(f, "{} {}", self.cons, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_patterns_hide_variables() {
        let succ = ConHead::new(Ident::synthetic("succ"), 2);
        let t = Term::cons(succ.clone(), vec![Term::free(40)]);
        assert_eq!(
            shape_pattern(&t),
            Pat::Cons(succ, vec![Pat::Wildcard])
        );
        assert_eq!(shape_pattern(&t).to_string(), "(succ _)");
    }
}
