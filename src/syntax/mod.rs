use codespan::{ColumnIndex, LineIndex};
use derive_more::{Add, AsRef, Deref, From};
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

pub mod abs;
pub mod core;
pub mod pattern;

#[derive(Debug, Clone, Copy, Eq, Default)]
pub struct Loc {
    pub start: usize,
    pub end: usize,
    pub line: LineIndex,
    pub col: ColumnIndex,
}

impl PartialEq for Loc {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Loc {
    pub fn new(start: usize, end: usize) -> Self {
        Loc {
            start,
            end,
            line: LineIndex(0),
            col: ColumnIndex(0),
        }
    }

    /// Location with a known line and column of its start.
    pub fn at(start: usize, end: usize, line: u32, col: u32) -> Self {
        Loc {
            start,
            end,
            line: LineIndex(line),
            col: ColumnIndex(col),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Loc {
    fn from(v: Range<usize>) -> Self {
        Loc::new(v.start, v.end)
    }
}

impl Display for Loc {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Eq, Deref, AsRef)]
pub struct Ident {
    #[deref]
    #[as_ref]
    pub text: String,
    pub loc: Loc,
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Ident {
    pub fn new(text: impl Into<String>, loc: impl Into<Loc>) -> Self {
        Ident {
            loc: loc.into(),
            text: text.into(),
        }
    }

    /// A name without a source location.
    pub fn synthetic(text: impl Into<String>) -> Self {
        Self::new(text, Loc::default())
    }

    /// `f` becomes `f.suffix`.
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self::new(format!("{}.{}", self.text, suffix), self.loc)
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, From, Add)]
pub struct Universe(pub u32);

impl Display for Universe {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Type{}", self.0)
    }
}

/// De Bruijn Indices. Checkout [Wikipedia](https://en.wikipedia.org/wiki/De_Bruijn_index) if you
/// are curious but have no idea about it.
pub type DBI = usize;

pub fn dbi_nat(dbi: DBI) -> Option<DBI> {
    if dbi == 0 {
        None
    } else {
        Some(dbi - 1)
    }
}

/// Unique identifiers for variables.
pub type UID = usize;
/// Global reference indices.
pub type GI = usize;

/// A binder: variable identifier and its type.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Bind<T> {
    pub name: UID,
    pub ty: T,
    pub loc: Loc,
}

impl<T> From<(UID, T)> for Bind<T> {
    fn from((name, ty): (UID, T)) -> Self {
        Bind {
            name,
            ty,
            loc: Loc::default(),
        }
    }
}

impl<T: Display> Display for Bind<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

impl<T> Bind<T> {
    pub fn new(name: UID, ty: T, loc: Loc) -> Self {
        Self { name, ty, loc }
    }

    pub fn boxed(self) -> Bind<Box<T>> {
        Bind::boxing(self.name, self.ty, self.loc)
    }

    pub fn map_term<R>(self, f: impl FnOnce(T) -> R) -> Bind<R> {
        Bind::new(self.name, f(self.ty), self.loc)
    }

    pub fn try_map_term<R, E>(self, f: impl FnOnce(T) -> Result<R, E>) -> Result<Bind<R>, E> {
        Ok(Bind::new(self.name, f(self.ty)?, self.loc))
    }
}

impl<T> Bind<Box<T>> {
    pub fn boxing(name: UID, term: T, loc: Loc) -> Self {
        Self::new(name, Box::new(term), loc)
    }
}

/// Constructor information.
/// [Agda](https://hackage.haskell.org/package/Agda-2.6.0.1/docs/src/Agda.Syntax.Internal.html#ConHead).
#[derive(Debug, Eq, Clone)]
pub struct ConHead {
    /// Constructor name.
    pub name: Ident,
    /// Index of the constructor.
    pub cons_gi: GI,
}

impl PartialEq for ConHead {
    fn eq(&self, other: &Self) -> bool {
        self.cons_gi == other.cons_gi
    }
}

impl ConHead {
    pub fn new(name: Ident, ix: GI) -> Self {
        Self { name, cons_gi: ix }
    }
}

impl Display for ConHead {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
