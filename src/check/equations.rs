use crate::check::case::{CaseTree, Compiler, Problem};
use crate::check::lower::lower;
use crate::check::matrix::PatternMatrix;
use crate::check::termination::check_structural;
use crate::check::{Error, Result, TypeCheckState, Unify};
use crate::syntax::abs::Definition;
use crate::syntax::core::{Decl, FuncInfo, Term};
use crate::syntax::{Ident, GI};
use std::collections::HashSet;

/// Knobs of [`TypeCheckState::define_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Verify every equation lemma by conversion.
    pub check_lemmas: bool,
    /// Accept equations that no input reaches.
    pub allow_redundant: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            check_lemmas: true,
            allow_redundant: false,
        }
    }
}

/// `f params shape ≡ rhs` for one leaf of the case tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationLemma {
    pub equation: usize,
    pub lhs: Term,
    pub rhs: Term,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDef {
    pub name: Ident,
    /// `f._main`, the case tree.
    pub main: GI,
    /// `f`, calls `f._main`.
    pub wrapper: GI,
    pub tree: CaseTree,
    pub lemmas: Vec<EquationLemma>,
    /// The structurally decreasing argument, if `f` is recursive.
    pub decreasing: Option<usize>,
}

impl CompiledDef {
    /// `f` applied to `args`, parameters first.
    pub fn call(&self, args: Vec<Term>) -> Term {
        Term::def(self.wrapper, self.name.clone(), args)
    }
}

impl TypeCheckState {
    pub fn define(&mut self, def: Definition) -> Result<CompiledDef> {
        self.define_with(def, CompileOptions::default())
    }

    /// Compile a definition by equations and register `f._main` and `f`.
    ///
    /// Nothing is registered unless the whole definition is accepted.
    pub fn define_with(&mut self, def: Definition, opts: CompileOptions) -> Result<CompiledDef> {
        debug!("{}defining `{}`", self.tc_depth_ws(), def.name);
        let matrix = PatternMatrix::build(self, &def)?;
        let rigid: HashSet<_> = def.params.iter().map(|b| b.name).collect();
        let mut compiler = Compiler::new(self, def.name.clone(), rigid);
        let tree = (compiler.compile(Problem::new(matrix, def.target.clone())))
            .map_err(|e| e.located(def.loc))?;
        let leaves = compiler.into_leaves();
        debug!(target: "case", "{}:\n{}", def.name, tree);

        if !opts.allow_redundant {
            let used = tree.equations();
            if let Some((equation, eq)) = (def.equations.iter().enumerate())
                .find(|(i, _)| !used.contains(i))
            {
                return Err(Error::RedundantEquation {
                    equation,
                    loc: eq.loc,
                });
            }
        }

        let main = self.next_gi();
        let wrapper = main + 1;
        let main_name = def.name.suffixed("_main");
        let params: Vec<Term> = def.params.iter().map(|b| Term::free(b.name)).collect();
        let tele = [def.params.clone(), def.args.clone()].concat();
        let vars: Vec<Term> = tele.iter().map(|b| Term::free(b.name)).collect();

        let body = lower(self, &tree)?.replace_free_head(def.self_var, &mut |args| {
            let args = params.iter().cloned().chain(args).collect();
            Term::def(main, main_name.clone(), args)
        });
        let body = Term::lam_over(&tele, body);
        self.validate(&main_name, &body, &[main])?;
        let decreasing =
            check_structural(&main_name, main, &body, def.params.len(), def.args.len())?;
        let signature = Term::pi_over(&tele, def.target.clone());

        self.sigma.push(Decl::Func(FuncInfo {
            loc: def.loc,
            name: main_name.clone(),
            signature: signature.clone(),
            body,
            arity: tele.len(),
            recursive: decreasing.is_some(),
        }));
        self.sigma.push(Decl::Func(FuncInfo {
            loc: def.loc,
            name: def.name.clone(),
            signature,
            body: Term::lam_over(&tele, Term::def(main, main_name, vars)),
            arity: tele.len(),
            recursive: false,
        }));

        debug!("{}registered `{}`", self.tc_depth_ws(), self.sigma[main].def_name());

        let mut lemmas = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            let lhs_args = params.iter().cloned().chain(leaf.shape).collect();
            let lhs = Term::def(wrapper, def.name.clone(), lhs_args);
            let rhs = leaf.rhs.replace_free_head(def.self_var, &mut |args| {
                let args = params.iter().cloned().chain(args).collect();
                Term::def(wrapper, def.name.clone(), args)
            });
            if opts.check_lemmas {
                if let Err(e) = Unify::unify(self, &lhs, &rhs) {
                    debug!(target: "case", "`{}` ≢ `{}`: {}", lhs, rhs, e);
                    self.sigma.truncate(main);
                    return Err(Error::NotDefinitional {
                        name: def.name,
                        equation: leaf.equation,
                    });
                }
            }
            lemmas.push(EquationLemma {
                equation: leaf.equation,
                lhs,
                rhs,
            });
        }

        Ok(CompiledDef {
            name: def.name,
            main,
            wrapper,
            tree,
            lemmas,
            decreasing,
        })
    }
}
