use crate::syntax::core::Term;
use std::fmt::{Display, Error, Formatter};

/// Why a recursive definition was left folded.
/// A modified version of
/// [this](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.Syntax.Internal.html#NotBlocked)
/// thing in Agda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    /// The unfolded body is an eliminator stuck on a neutral term.
    OnElim(Term),
    /// Not enough arguments were supplied to complete the matching.
    UnderApplied,
}

impl Display for Blocker {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Blocker::OnElim(e) => write!(f, "blocked on `{}`", e),
            Blocker::UnderApplied => write!(f, "missing necessary arguments"),
        }
    }
}

/// Something whose reduction may be blocked.
/// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.Syntax.Internal.html#Blocked).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked<T> {
    /// Blocked, `T` is the term left as it was.
    Yes(Blocker, T),
    No(T),
}

impl<T: Display> Display for Blocked<T> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Blocked::Yes(b, t) => write!(f, "{}: {}", b, t),
            Blocked::No(t) => write!(f, "not blocked: {}", t),
        }
    }
}
