use crate::check::case::{Branch, CaseTree, Split};
use crate::check::confusion::Step;
use crate::check::{Oracle, Result};
use crate::syntax::core::{Bind, Case, CasesOn, FreeSubst, NoConfusion, SubstFree, Term};
use crate::syntax::UID;

/// Translate a case tree to nested `cases_on`.
///
/// The result is open over the matched arguments and the parameters; recursive references
/// are left as they are in the right-hand sides.
pub fn lower<O: Oracle>(oracle: &mut O, tree: &CaseTree) -> Result<Term> {
    match tree {
        CaseTree::Leaf(leaf) => Ok(leaf.rhs.clone()),
        CaseTree::Unreachable(u) => Ok(Term::NoConfusion(NoConfusion {
            data: u.refutation.data,
            ty: Box::new(u.ty.clone()),
            proof: Box::new(u.refutation.proof.clone()),
        })),
        CaseTree::Split(split) => lower_split(oracle, split),
    }
}

fn lower_split<O: Oracle>(oracle: &mut O, split: &Split) -> Result<Term> {
    let n_params = oracle.data(split.data.def)?.params.len();
    let (params, indices) = split.data.args.split_at(n_params);
    let motive = motive(oracle, split, params, indices)?;
    let cases = (split.branches.iter())
        .map(|branch| lower_branch(oracle, branch))
        .collect::<Result<_>>()?;
    Ok(Term::CasesOn(CasesOn {
        data: split.data.def,
        params: params.to_vec(),
        motive: Box::new(motive),
        major: Box::new(Term::free(split.var)),
        cases,
        args: indices.iter().cloned().map(Term::refl).collect(),
    }))
}

/// `λ is' (x' : D ps is'). Π (h : Id(is', is)). target[x := x']`
fn motive<O: Oracle>(
    oracle: &mut O,
    split: &Split,
    params: &[Term],
    indices: &[Term],
) -> Result<Term> {
    let generic: Vec<UID> = indices.iter().map(|_| oracle.fresh_uid()).collect();
    let generic_terms: Vec<Term> = generic.iter().copied().map(Term::free).collect();
    let index_tys = oracle.index_types(split.data.def, params, &generic_terms)?;
    let scrutinee = oracle.fresh_uid();
    let mut binders: Vec<Bind> = (generic.iter().copied().zip(index_tys.iter().cloned()))
        .map(Bind::from)
        .collect();
    let args = params.iter().cloned().chain(generic_terms.iter().cloned());
    binders.push(Bind::from((scrutinee, Term::data(split.data.def, args.collect()))));
    let hyps: Vec<Bind> = (generic_terms.into_iter().zip(indices).zip(index_tys))
        .map(|((generic, index), ty)| {
            Bind::from((oracle.fresh_uid(), Term::id(ty, generic, index.clone())))
        })
        .collect();
    let target = (split.target.clone())
        .subst_free(&FreeSubst::from([(split.var, Term::free(scrutinee))]));
    Ok(Term::lam_over(&binders, Term::pi_over(&hyps, target)))
}

/// `λ fields hyps. transport(..) body`
fn lower_branch<O: Oracle>(oracle: &mut O, branch: &Branch) -> Result<Case> {
    let mut body = lower(oracle, &branch.tree)?;
    for step in branch.steps.iter().rev() {
        if let Step::Solve { proof, .. } = step {
            body = Term::transport(proof.clone(), body);
        }
    }
    let hyps: Vec<Bind> = (branch.constraints.iter())
        .map(|c| Bind::from((c.hyp, c.hyp_type())))
        .collect();
    let fields: Vec<UID> = branch.fields.iter().map(|b| b.name).collect();
    let body = Term::lam_over(&hyps, body).abstract_over(&fields);
    Ok(Case::new(branch.cons.clone(), fields.len(), body))
}
