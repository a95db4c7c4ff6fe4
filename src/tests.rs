use crate::check::{TypeCheckState, Unify};
use crate::syntax::core::Term;

mod syntax;

#[track_caller]
pub(crate) fn assert_convertible(tcs: &mut TypeCheckState, t1: &Term, t2: &Term) {
    if let Err(e) = Unify::unify(tcs, t1, t2) {
        let nf1 = tcs.normalize(t1.clone());
        let nf2 = tcs.normalize(t2.clone());
        panic!(
            r#"assertion failed: `(left ≡ right)`
left: `{:?}`,
right: `{:?}`,
error: {}"#,
            nf1, nf2, e
        )
    }
}
