use crate::check::{Error, Result, TypeCheckState, Unify};
use crate::syntax::core::{Bind, ConsInfo, DataInfo, Tele, Term, ValData};
use crate::syntax::{ConHead, GI, UID};

/// What the match compiler needs to know about the core calculus.
///
/// Everything here is answered by the trusted kernel; the compiler never inspects declarations
/// or reduces terms on its own.
pub trait Oracle {
    fn data(&self, gi: GI) -> Result<&DataInfo>;

    fn cons(&self, gi: GI) -> Result<&ConsInfo>;

    fn fresh_uid(&mut self) -> UID;

    fn whnf(&mut self, term: Term) -> Result<Term>;

    fn normalize(&mut self, term: Term) -> Result<Term>;

    /// Conversion check.
    fn def_eq(&mut self, left: &Term, right: &Term) -> bool;

    fn cons_head(&self, gi: GI) -> Result<ConHead> {
        Ok(ConHead::new(self.cons(gi)?.name.clone(), gi))
    }

    /// The family a type evaluates to.
    fn as_data(&mut self, ty: Term) -> Result<ValData> {
        match self.whnf(ty)? {
            Term::Data(data) => Ok(data),
            t => Err(Error::NotInductive(Box::new(t))),
        }
    }

    /// Fresh fields of constructor `gi` at the family parameters `params`, with the
    /// constructor's result indices over those fields.
    fn instantiate_cons(&mut self, gi: GI, params: &[Term]) -> Result<(Tele, Vec<Term>)> {
        let info = self.cons(gi)?.clone();
        let mut env = params.to_vec();
        let mut fields = Vec::with_capacity(info.params.len());
        for bind in info.params {
            let ty = bind.ty.instantiate_tele(&env);
            let name = self.fresh_uid();
            env.push(Term::free(name));
            fields.push(Bind::new(name, ty, bind.loc));
        }
        let indices = info
            .indices
            .into_iter()
            .map(|ix| ix.instantiate_tele(&env))
            .collect();
        Ok((fields, indices))
    }

    /// Types of the fields of constructor `gi` holding the values `fields`.
    fn field_types(&self, gi: GI, params: &[Term], fields: &[Term]) -> Result<Vec<Term>> {
        let info = self.cons(gi)?;
        Ok(telescope_types(&info.params, params, fields))
    }

    /// Types of the indices of family `gi` holding the values `indices`.
    fn index_types(&self, gi: GI, params: &[Term], indices: &[Term]) -> Result<Vec<Term>> {
        let info = self.data(gi)?;
        Ok(telescope_types(&info.indices, params, indices))
    }
}

fn telescope_types(tele: &[Bind], prefix: &[Term], values: &[Term]) -> Vec<Term> {
    let mut env = prefix.to_vec();
    let mut tys = Vec::with_capacity(values.len());
    for (bind, value) in tele.iter().zip(values) {
        tys.push(bind.ty.clone().instantiate_tele(&env));
        env.push(value.clone());
    }
    tys
}

impl Oracle for TypeCheckState {
    fn data(&self, gi: GI) -> Result<&DataInfo> {
        self.data_info(gi)
    }

    fn cons(&self, gi: GI) -> Result<&ConsInfo> {
        self.cons_info(gi)
    }

    fn fresh_uid(&mut self) -> UID {
        self.fresh()
    }

    fn whnf(&mut self, term: Term) -> Result<Term> {
        self.simplify(term)
    }

    fn normalize(&mut self, term: Term) -> Result<Term> {
        TypeCheckState::normalize(self, term)
    }

    fn def_eq(&mut self, left: &Term, right: &Term) -> bool {
        match Unify::unify(self, left, right) {
            Ok(()) => true,
            Err(e) => {
                trace!(target: "unify", "not convertible: {}", e);
                false
            }
        }
    }
}
