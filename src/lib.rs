//! Compilation of definitions by dependent pattern matching to `cases_on` terms.
//!
//! A [`syntax::abs::Definition`] is checked into a pattern matrix, compiled to a case tree
//! and lowered to an auxiliary `f._main` plus a wrapper `f`; see
//! [`check::TypeCheckState::define`].

#[macro_use]
extern crate log;

pub mod check;
pub mod error;
pub mod macros;
pub mod prelude;
pub mod syntax;

#[cfg(test)]
mod tests;
