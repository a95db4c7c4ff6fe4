use crate::check::{Error, Result, TypeCheckState};
use crate::ensure;
use crate::syntax::abs::{ConsDecl, DataDecl};
use crate::syntax::core::{Bind, ConsInfo, DataInfo, Decl, DeBruijn, Tele, Term, Var};
use crate::syntax::{GI, UID};

/// Close a telescope given in free-variable form, each type over the binders before it.
fn close_tele(prefix: &[UID], binds: &[Bind], close: impl Fn(Term) -> Term) -> Tele {
    let mut scope = prefix.to_vec();
    let mut tele = Vec::with_capacity(binds.len());
    for bind in binds {
        let ty = close(bind.ty.clone()).abstract_over(&scope);
        tele.push(Bind::new(bind.name, ty, bind.loc));
        scope.push(bind.name);
    }
    tele
}

impl TypeCheckState {
    /// Check and register an inductive family with its constructors.
    /// The family gets the next global index, its constructors the ones right after it.
    pub fn check_data(&mut self, decl: DataDecl) -> Result<GI> {
        let gi = self.next_gi();
        debug!("{}checking data `{}`", self.tc_depth_ws(), decl.name);
        let malformed = |msg: String| Error::MalformedData(decl.name.clone(), msg);
        for cons in &decl.conses {
            ensure!(
                cons.indices.len() == decl.indices.len(),
                malformed(format!(
                    "`{}` has {} indices, expected {}",
                    cons.name,
                    cons.indices.len(),
                    decl.indices.len()
                ))
            );
            for field in &cons.fields {
                check_positive(&decl, &field.ty).map_err(&malformed)?;
            }
            for index in &cons.indices {
                ensure!(
                    !index.occurs(decl.self_var),
                    malformed(format!("`{}` mentions the family in an index", cons.name))
                );
            }
        }
        ensure!(
            decl.params.iter().chain(&decl.indices).all(|b| !b.ty.occurs(decl.self_var)),
            malformed("the family occurs in its own signature".to_owned())
        );

        let self_var = decl.self_var;
        let close = |t: Term| t.replace_free_head(self_var, &mut |args| Term::data(gi, args));
        let param_uids: Vec<UID> = decl.params.iter().map(|b| b.name).collect();
        let params = close_tele(&[], &decl.params, close);
        let indices = close_tele(&param_uids, &decl.indices, close);
        let signature = Term::pi_tele(
            &[params.clone(), indices.clone()].concat(),
            Term::Universe(decl.universe),
        );

        let conses = (0..decl.conses.len()).map(|ix| gi + ix + 1).collect();
        let info = DataInfo {
            loc: decl.loc,
            name: decl.name.clone(),
            params: params.clone(),
            indices,
            conses,
            universe: decl.universe,
            signature,
        };
        let mut decls = vec![Decl::Data(info)];
        for cons in &decl.conses {
            decls.push(Decl::Cons(check_cons(gi, &params, &param_uids, cons, close)));
        }
        self.sigma.extend(decls);
        Ok(gi)
    }
}

fn check_cons(
    data_gi: GI,
    params: &Tele,
    param_uids: &[UID],
    cons: &ConsDecl,
    close: impl Fn(Term) -> Term + Copy,
) -> ConsInfo {
    let fields = close_tele(param_uids, &cons.fields, close);
    let scope: Vec<UID> = param_uids
        .iter()
        .copied()
        .chain(cons.fields.iter().map(|b| b.name))
        .collect();
    let indices: Vec<Term> = cons
        .indices
        .iter()
        .map(|ix| close(ix.clone()).abstract_over(&scope))
        .collect();
    let depth = scope.len();
    let param_vars = (0..params.len()).map(|j| Term::from_dbi(depth - 1 - j));
    let result = Term::data(data_gi, param_vars.chain(indices.iter().cloned()).collect());
    let signature = Term::pi_tele(&[params.clone(), fields.clone()].concat(), result);
    ConsInfo {
        loc: cons.loc,
        name: cons.name.clone(),
        data_gi,
        params: fields,
        indices,
        signature,
    }
}

/// Recursive occurrences are allowed only as the whole field type or as the codomain
/// of a function field, applied to the family's own parameters.
fn check_positive(decl: &DataDecl, ty: &Term) -> std::result::Result<(), String> {
    let family = decl.self_var;
    match ty {
        Term::Pi(bind, clos) => {
            if bind.ty.occurs(family) {
                return Err(format!("non-positive occurrence in `{}`", ty));
            }
            check_positive(decl, clos.body())
        }
        Term::Var(Var::Free(head), args) if *head == family => {
            let n = decl.params.len();
            if args.len() != n + decl.indices.len() {
                return Err(format!("wrong number of arguments in `{}`", ty));
            }
            let uniform = (args[..n].iter().zip(&decl.params))
                .all(|(arg, param)| arg.free_view() == Some(param.name));
            if !uniform {
                return Err(format!("non-uniform parameters in `{}`", ty));
            }
            if args[n..].iter().any(|ix| ix.occurs(family)) {
                return Err(format!("nested occurrence in `{}`", ty));
            }
            Ok(())
        }
        t if t.occurs(family) => Err(format!("unsupported occurrence in `{}`", t)),
        _ => Ok(()),
    }
}
