use eqc::assert_err;
use eqc::check::{CaseTree, CompileOptions, Error, Oracle, TypeCheckState, Unify};
use eqc::prelude::Prelude;
use eqc::syntax::abs::{ConsDecl, DataDecl, Definition};
use eqc::syntax::core::{Pat, Term};
use eqc::syntax::{ConHead, Ident, Loc, GI};

fn setup() -> eyre::Result<(TypeCheckState, Prelude)> {
    let _ = env_logger::try_init();
    Ok(Prelude::new()?)
}

#[track_caller]
fn assert_nf(tcs: &mut TypeCheckState, term: Term, expected: Term) {
    let nf = tcs.normalize(term).expect("normalization failed");
    assert_eq!(nf, expected, "got `{}`, expected `{}`", nf, expected);
}

#[test]
fn addition_computes() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    assert_eq!(p.add.decreasing, Some(1));
    assert_eq!(p.add.lemmas.len(), 2);
    assert_nf(&mut tcs, p.add(p.num(2), p.num(3)), p.num(5));
    assert_nf(&mut tcs, p.add(p.num(0), p.num(0)), p.num(0));
    Ok(())
}

#[test]
fn equations_hold_for_open_arguments() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (n, m) = (tcs.fresh(), tcs.fresh());
    // add n zero ≡ n
    Unify::unify(&mut tcs, &p.add(Term::free(n), p.num(0)), &Term::free(n))?;
    // add n (succ m) ≡ succ (add n m)
    let lhs = p.add(Term::free(n), p.succ_of(Term::free(m)));
    let rhs = p.succ_of(p.add(Term::free(n), Term::free(m)));
    Unify::unify(&mut tcs, &lhs, &rhs)?;
    // Stuck on `m`: smart unfolding keeps the application folded.
    let stuck = tcs.simplify(p.add(Term::free(n), Term::free(m)))?;
    assert!(matches!(stuck, Term::Redex(gi, ..) if gi == p.add.main), "{}", stuck);
    Ok(())
}

#[test]
fn lemmas_are_the_equations() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    for lemma in &p.add.lemmas {
        Unify::unify(&mut tcs, &lemma.lhs, &lemma.rhs)?;
    }
    let equations: Vec<_> = p.add.lemmas.iter().map(|l| l.equation).collect();
    assert_eq!(equations, vec![0, 1]);
    Ok(())
}

/// ```text
/// f zero     y        := 1
/// f x        zero     := 2
/// f (succ x) (succ y) := 3
/// ```
#[test]
fn first_match_wins() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, b, x, y, x1, y1, x2) = (
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
    );
    let def = Definition::new(Ident::synthetic("f"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .arg(b, p.nat_ty())
        .equation(vec![p.num_pat(0), Pat::Var(y)], p.num(1))
        .equation(vec![Pat::Var(x), p.num_pat(0)], p.num(2))
        .equation(
            vec![p.succ_pat(1, Pat::Var(x1)), p.succ_pat(1, Pat::Var(y1))],
            p.num(3),
        );
    let f = tcs.define(def)?;
    assert_eq!(f.decreasing, None);
    assert_eq!(f.lemmas.len(), 3);
    // `f zero zero` matches the first two equations; the first one wins.
    assert_nf(&mut tcs, f.call(vec![p.num(0), p.num(0)]), p.num(1));
    assert_nf(&mut tcs, f.call(vec![p.num(4), p.num(0)]), p.num(2));
    assert_nf(&mut tcs, f.call(vec![p.num(1), p.num(7)]), p.num(3));
    // The first equation holds for any second argument, even an unknown one.
    assert_nf(&mut tcs, f.call(vec![p.num(0), Term::free(x2)]), p.num(1));
    Ok(())
}

#[test]
fn overlapping_catch_all() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, n) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("is_zero"), this, p.bool_ty())
        .arg(a, p.nat_ty())
        .equation(vec![p.num_pat(0)], Term::cons(p.tt.clone(), vec![]))
        .equation(vec![Pat::Var(n)], Term::cons(p.ff.clone(), vec![]));
    let is_zero = tcs.define(def)?;
    assert_nf(&mut tcs, is_zero.call(vec![p.num(0)]), Term::cons(p.tt.clone(), vec![]));
    assert_nf(&mut tcs, is_zero.call(vec![p.num(3)]), Term::cons(p.ff.clone(), vec![]));
    match &is_zero.tree {
        CaseTree::Split(split) => {
            assert_eq!(split.var, a);
            assert_eq!(split.branches.len(), 2);
        }
        t => panic!("expected a split, got\n{}", t),
    }
    Ok(())
}

#[test]
fn missing_case_is_reported() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a) = (tcs.fresh(), tcs.fresh());
    let before = tcs.sigma.len();
    let def = Definition::new(Ident::synthetic("h"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .equation(vec![p.num_pat(0)], p.num(0));
    assert_err!(
        tcs.define(def),
        Error::IncompleteMatch {
            name: Ident::synthetic("h"),
            missing: "(succ _)".to_owned(),
        }
    );
    assert_eq!(tcs.sigma.len(), before);
    Ok(())
}

#[test]
fn redundant_equation() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, n) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("k"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .equation(vec![Pat::Var(n)], p.num(0))
        .equation(vec![p.num_pat(0)], p.num(1));
    assert_err!(
        tcs.define(def.clone()),
        Error::RedundantEquation {
            equation: 1,
            loc: Loc::default(),
        }
    );
    let opts = CompileOptions {
        allow_redundant: true,
        ..Default::default()
    };
    let k = tcs.define_with(def, opts)?;
    assert_eq!(k.tree.equations().into_iter().collect::<Vec<_>>(), vec![0]);
    Ok(())
}

/// `head : Π {A} n. vector A (succ n) → A`, with no `vnil` equation.
#[test]
fn impossible_constructor_is_omitted() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, ty, n, v, x) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
    let vcons = Pat::cons(p.vcons.clone(), vec![Pat::Wildcard, Pat::Var(x), Pat::Wildcard]);
    let def = Definition::new(Ident::synthetic("head"), this, Term::free(ty))
        .param(ty, Term::universe(0))
        .arg(n, p.nat_ty())
        .arg(v, p.vector_ty(Term::free(ty), p.succ_of(Term::free(n))))
        .equation(vec![Pat::Wildcard, vcons], Term::free(x));
    let head = tcs.define(def)?;
    match &head.tree {
        CaseTree::Split(split) => {
            assert!(matches!(split.branches[0].tree, CaseTree::Unreachable(_)));
            assert!(matches!(split.branches[1].tree, CaseTree::Leaf(_)));
        }
        t => panic!("expected a split, got\n{}", t),
    }
    let (a, elem) = (tcs.fresh(), tcs.fresh());
    let vector = Term::cons(
        p.vcons.clone(),
        vec![p.num(0), Term::free(elem), Term::cons(p.vnil.clone(), vec![])],
    );
    let call = head.call(vec![Term::free(a), p.num(0), vector]);
    assert_nf(&mut tcs, call, Term::free(elem));
    Ok(())
}

/// ```text
/// append : vector A n → vector A m → vector A (m + n)
/// append .zero     m vnil           ys := ys
/// append .(succ k) m (vcons k x xs) ys := vcons (m + k) x (append k m xs ys)
/// ```
#[test]
fn append_solves_indices() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, ty, n, m, xs, ys) = (
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
    );
    let (m0, ys0, m1, k, x, xs1, ys1) = (
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
    );
    let a = Term::free(ty);
    let def = Definition::new(
        Ident::synthetic("append"),
        this,
        p.vector_ty(a.clone(), p.add(Term::free(m), Term::free(n))),
    )
    .param(ty, Term::universe(0))
    .arg(n, p.nat_ty())
    .arg(m, p.nat_ty())
    .arg(xs, p.vector_ty(a.clone(), Term::free(n)))
    .arg(ys, p.vector_ty(a.clone(), Term::free(m)));
    let recursive = def.recurse(vec![
        Term::free(k),
        Term::free(m1),
        Term::free(xs1),
        Term::free(ys1),
    ]);
    let vcons_pat = Pat::cons(
        p.vcons.clone(),
        vec![Pat::Var(k), Pat::Var(x), Pat::Var(xs1)],
    );
    let def = def
        .equation(
            vec![
                Pat::Wildcard,
                Pat::Var(m0),
                Pat::cons(p.vnil.clone(), vec![]),
                Pat::Var(ys0),
            ],
            Term::free(ys0),
        )
        .equation(
            vec![Pat::Wildcard, Pat::Var(m1), vcons_pat, Pat::Var(ys1)],
            Term::cons(
                p.vcons.clone(),
                vec![
                    p.add(Term::free(m1), Term::free(k)),
                    Term::free(x),
                    recursive,
                ],
            ),
        );
    let append = tcs.define(def)?;
    assert_eq!(append.decreasing, Some(2));

    let (t, e0, e1) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    let vnil = Term::cons(p.vnil.clone(), vec![]);
    let single = |e| Term::cons(p.vcons.clone(), vec![p.num(0), Term::free(e), vnil.clone()]);
    let call = append.call(vec![Term::free(t), p.num(1), p.num(1), single(e0), single(e1)]);
    let expected = Term::cons(p.vcons.clone(), vec![p.num(1), Term::free(e0), single(e1)]);
    assert_nf(&mut tcs, call, expected);
    Ok(())
}

/// `inv A B f .(f a) (imf a) := a`
#[test]
fn inaccessible_pattern() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, ta, tb, f, y, im, a) = (
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
        tcs.fresh(),
    );
    let f_of = |t: Term| Term::free(f).apply(vec![t]);
    let image = p.image_ty(Term::free(ta), Term::free(tb), Term::free(f), Term::free(y));
    let def = Definition::new(Ident::synthetic("inv"), this, Term::free(ta))
        .param(ta, Term::universe(0))
        .param(tb, Term::universe(0))
        .param(f, Term::arrow(Term::free(ta), Term::free(tb)))
        .arg(y, Term::free(tb))
        .arg(im, image);
    let params = vec![Term::free(ta), Term::free(tb), Term::free(f)];

    let good = def.clone().equation(
        vec![
            Pat::Forced(f_of(Term::free(a))),
            Pat::cons(p.imf.clone(), vec![Pat::Var(a)]),
        ],
        Term::free(a),
    );
    let inv = tcs.define(good)?;
    match &inv.tree {
        CaseTree::Split(split) => {
            assert_eq!(split.var, im);
            assert_eq!(split.branches.len(), 1);
            let branch = &split.branches[0];
            assert_eq!(branch.fields.len(), 1);
            // `y` is solved by the index equation, never split on.
            match &branch.tree {
                CaseTree::Leaf(leaf) => assert_eq!(leaf.rhs, Term::free(branch.fields[0].name)),
                t => panic!("expected a leaf, got\n{}", t),
            }
        }
        t => panic!("expected a split, got\n{}", t),
    }
    let z = tcs.fresh();
    let mut args = params;
    args.extend(vec![f_of(Term::free(z)), Term::cons(p.imf.clone(), vec![Term::free(z)])]);
    assert_nf(&mut tcs, inv.call(args), Term::free(z));

    let other = tcs.fresh();
    let bad = def.equation(
        vec![
            Pat::Forced(Term::free(other)),
            Pat::cons(p.imf.clone(), vec![Pat::Var(a)]),
        ],
        Term::free(a),
    );
    let err = tcs.define(bad).unwrap_err();
    assert!(
        matches!(err.unwrapped(), Error::InaccessibleMismatch { .. }),
        "{}",
        err
    );
    Ok(())
}

/// ```text
/// length nil         := zero
/// length (cons x xs) := succ (length xs)
/// ```
#[test]
fn length_recurses_on_the_tail() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, ty, l, x, xs) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("length"), this, p.nat_ty())
        .param(ty, Term::universe(0))
        .arg(l, p.list_ty(Term::free(ty)));
    let recursive = def.recurse(vec![Term::free(xs)]);
    let def = def
        .equation(vec![Pat::cons(p.nil.clone(), vec![])], p.num(0))
        .equation(
            vec![Pat::cons(p.cons.clone(), vec![Pat::Var(x), Pat::Var(xs)])],
            p.succ_of(recursive),
        );
    let length = tcs.define(def)?;
    assert_eq!(length.decreasing, Some(0));

    let (t, e0, e1) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    let nil = Term::cons(p.nil.clone(), vec![]);
    let tail = Term::cons(p.cons.clone(), vec![Term::free(e1), nil.clone()]);
    let list = Term::cons(p.cons.clone(), vec![Term::free(e0), tail]);
    assert_nf(&mut tcs, length.call(vec![Term::free(t), list]), p.num(2));
    assert_nf(&mut tcs, length.call(vec![Term::free(t), nil]), p.num(0));
    Ok(())
}

/// ```text
/// deep 3                 := 1
/// deep (succ (succ x))   := 2
/// deep _                 := 0
/// ```
#[test]
fn deep_numeral_patterns() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, x) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("deep"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .equation(vec![p.num_pat(3)], p.num(1))
        .equation(vec![p.succ_pat(2, Pat::Var(x))], p.num(2))
        .equation(vec![Pat::Wildcard], p.num(0));
    let deep = tcs.define(def)?;
    assert_eq!(deep.tree.equations().into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    for (arg, expected) in [(0, 0), (1, 0), (2, 2), (3, 1), (4, 2), (5, 2)] {
        assert_nf(&mut tcs, deep.call(vec![p.num(arg)]), p.num(expected));
    }
    Ok(())
}

/// `same : nat → nat → Type` with the single constructor `mk n : same n n`.
fn declare_same(tcs: &mut TypeCheckState, p: &Prelude) -> eyre::Result<(GI, ConHead)> {
    let (this, i, j, n) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
    let mk = ConsDecl::new(Ident::synthetic("mk"))
        .field(n, p.nat_ty())
        .index(Term::free(n))
        .index(Term::free(n));
    let same = tcs.check_data(
        DataDecl::new(Ident::synthetic("same"), this)
            .index(i, p.nat_ty())
            .index(j, p.nat_ty())
            .cons(mk),
    )?;
    Ok((same, tcs.cons_head(same + 1)?))
}

/// `same 0 1` is empty, but `mk` only clashes once `n := 0` is known.
#[test]
fn indices_clash_after_solving() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (same, _) = declare_same(&mut tcs, &p)?;
    let (this, e) = (tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("never"), this, p.nat_ty())
        .arg(e, Term::data(same, vec![p.num(0), p.num(1)]));
    let never = tcs.define(def)?;
    assert!(never.lemmas.is_empty());
    match &never.tree {
        CaseTree::Split(split) => {
            assert_eq!(split.branches.len(), 1);
            assert!(matches!(split.branches[0].tree, CaseTree::Unreachable(_)));
        }
        t => panic!("expected a split, got\n{}", t),
    }
    Ok(())
}

/// `sym : same a b → same b a`, `sym (mk n) := mk n`
#[test]
fn linked_indices_are_solved() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (same, mk) = declare_same(&mut tcs, &p)?;
    let (this, a, b, e, n) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
    let target = Term::data(same, vec![Term::free(b), Term::free(a)]);
    let def = Definition::new(Ident::synthetic("sym"), this, target)
        .arg(a, p.nat_ty())
        .arg(b, p.nat_ty())
        .arg(e, Term::data(same, vec![Term::free(a), Term::free(b)]))
        .equation(
            vec![
                Pat::Wildcard,
                Pat::Wildcard,
                Pat::cons(mk.clone(), vec![Pat::Var(n)]),
            ],
            Term::cons(mk.clone(), vec![Term::free(n)]),
        );
    let sym = tcs.define(def)?;
    assert_eq!(sym.lemmas.len(), 1);
    let call = sym.call(vec![p.num(2), p.num(2), Term::cons(mk.clone(), vec![p.num(2)])]);
    assert_nf(&mut tcs, call, Term::cons(mk, vec![p.num(2)]));
    Ok(())
}

#[test]
fn empty_type_needs_no_equation() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, e) = (tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("absurd"), this, p.nat_ty()).arg(e, p.empty_ty());
    let absurd = tcs.define(def)?;
    assert!(absurd.lemmas.is_empty());
    match &absurd.tree {
        CaseTree::Split(split) => assert!(split.branches.is_empty()),
        t => panic!("expected a split, got\n{}", t),
    }
    Ok(())
}

#[test]
fn fin_zero_is_empty() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, i) = (tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("fin_zero_elim"), this, p.nat_ty())
        .arg(i, p.fin_ty(p.num(0)));
    let elim = tcs.define(def)?;
    match &elim.tree {
        CaseTree::Split(split) => {
            assert_eq!(split.branches.len(), 2);
            let unreachable = (split.branches.iter())
                .all(|b| matches!(b.tree, CaseTree::Unreachable(_)));
            assert!(unreachable);
        }
        t => panic!("expected a split, got\n{}", t),
    }
    Ok(())
}

#[test]
fn non_structural_recursion() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, n) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    let before = tcs.sigma.len();
    let def = Definition::new(Ident::synthetic("spin"), this, p.nat_ty()).arg(a, p.nat_ty());
    let recursive = def.recurse(vec![p.succ_of(Term::free(n))]);
    let def = def
        .equation(vec![p.num_pat(0)], p.num(0))
        .equation(vec![p.succ_pat(1, Pat::Var(n))], recursive);
    assert_err!(
        tcs.define(def),
        Error::NonStructuralRecursion(Ident::synthetic("spin._main"))
    );
    assert_eq!(tcs.sigma.len(), before);
    Ok(())
}

#[test]
fn stuck_term_pattern() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, x) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    // `2 + x` is stuck: addition recurses on its second argument.
    let def = Definition::new(Ident::synthetic("g"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .equation(vec![Pat::Term(p.add(p.num(2), Term::free(x)))], Term::free(x))
        .equation(vec![Pat::Wildcard], p.num(0));
    let err = tcs.define(def).unwrap_err();
    assert!(
        matches!(err.unwrapped(), Error::NonNormalizingPattern(..)),
        "{}",
        err
    );
    Ok(())
}

#[test]
fn term_pattern_evaluates() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, x) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    // pred zero := zero; pred (x + 1) := x
    let def = Definition::new(Ident::synthetic("pred"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .equation(vec![p.num_pat(0)], p.num(0))
        .equation(vec![Pat::Term(p.add(Term::free(x), p.num(1)))], Term::free(x));
    let pred = tcs.define(def)?;
    assert_nf(&mut tcs, pred.call(vec![p.num(3)]), p.num(2));
    assert_nf(&mut tcs, pred.call(vec![p.num(0)]), p.num(0));
    Ok(())
}

#[test]
fn malformed_equations() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, a, b, x) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("m"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .arg(b, p.nat_ty());

    let short = def.clone().equation(vec![Pat::Wildcard], p.num(0));
    let err = tcs.define(short).unwrap_err();
    assert!(matches!(err.unwrapped(), Error::ArityMismatch { expected: 2, found: 1, .. }));

    let non_linear = def.clone().equation(vec![Pat::Var(x), Pat::Var(x)], p.num(0));
    let err = tcs.define(non_linear).unwrap_err();
    assert!(matches!(err.unwrapped(), Error::NonLinearPattern { .. }));

    let wrong_family = def.equation(
        vec![Pat::cons(p.tt.clone(), vec![]), Pat::Wildcard],
        p.num(0),
    );
    let err = tcs.define(wrong_family).unwrap_err();
    assert!(matches!(err.unwrapped(), Error::TypeMismatch { .. }));
    Ok(())
}

#[test]
fn index_stuck_on_a_function() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let (this, ty, n, m, v) = (tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh(), tcs.fresh());
    let index = p.add(Term::free(n), Term::free(m));
    let def = Definition::new(Ident::synthetic("len"), this, p.nat_ty())
        .param(ty, Term::universe(0))
        .arg(n, p.nat_ty())
        .arg(m, p.nat_ty())
        .arg(v, p.vector_ty(Term::free(ty), index))
        .equation(
            vec![Pat::Wildcard, Pat::Wildcard, Pat::cons(p.vnil.clone(), vec![])],
            p.num(0),
        )
        .equation(vec![Pat::Wildcard, Pat::Wildcard, Pat::Wildcard], p.num(1));
    let err = tcs.define(def).unwrap_err();
    assert!(
        matches!(err.unwrapped(), Error::DependentEliminationFailed(..)),
        "{}",
        err
    );
    Ok(())
}

#[test]
fn diagnostics_point_at_the_equation() -> eyre::Result<()> {
    let (mut tcs, p) = setup()?;
    let source = "k n    := 0\nk zero := 1\n";
    let (this, a, n) = (tcs.fresh(), tcs.fresh(), tcs.fresh());
    let def = Definition::new(Ident::synthetic("k"), this, p.nat_ty())
        .arg(a, p.nat_ty())
        .equation_at(Loc::at(0, 11, 0, 0), vec![Pat::Var(n)], p.num(0))
        .equation_at(Loc::at(12, 23, 1, 0), vec![p.num_pat(0)], p.num(1));
    let err = tcs.define(def).unwrap_err();
    let report = err.report("k.eq", source)?;
    assert!(report.contains("Equation 1 is redundant"), "{}", report);
    assert!(report.contains("k.eq:2:1"), "{}", report);
    Ok(())
}
