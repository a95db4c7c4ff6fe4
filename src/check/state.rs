use crate::check::{Error, Result};
use crate::syntax::core::{ConsInfo, DataInfo, Decl, FuncInfo};
use crate::syntax::{GI, UID};
use std::fmt::{Display, Formatter, Write};

/// Global context.
pub type Sigma = Vec<Decl>;

/// Type-checking state.
#[derive(Debug, Clone, Default)]
pub struct TypeCheckState {
    pub(crate) indentation: Indentation,
    /// Are we tracing the type checking process?
    pub trace_tc: bool,
    /// Global context (definitions are attached with type annotations).
    pub sigma: Sigma,
    next_uid: UID,
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Indentation {
    tc_depth: usize,
    /// How many indentations should we add when enter each sub-inference-rule?
    indentation_size: usize,
}

impl Display for Indentation {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for _ in 0..self.tc_depth * self.indentation_size {
            f.write_char(' ')?;
        }
        Ok(())
    }
}

impl TypeCheckState {
    /// For debugging purpose.
    pub fn tc_depth_ws(&self) -> impl Display {
        self.indentation
    }

    /// Spaces per nesting level in trace output.
    pub fn indentation_size(&mut self, size: usize) {
        self.indentation.indentation_size = size;
    }

    pub fn tc_deeper(&mut self) {
        self.indentation.tc_depth += 1;
    }

    pub fn tc_shallower(&mut self) {
        if self.indentation.tc_depth > 0 {
            self.indentation.tc_depth -= 1;
        }
    }

    /// A variable identifier never handed out before.
    pub fn fresh(&mut self) -> UID {
        let uid = self.next_uid;
        self.next_uid += 1;
        uid
    }

    /// Index the next declaration will get.
    pub fn next_gi(&self) -> GI {
        self.sigma.len()
    }

    pub fn def(&self, ix: GI) -> Result<&Decl> {
        self.sigma.get(ix).ok_or(Error::UnknownDecl(ix))
    }

    pub fn data_info(&self, ix: GI) -> Result<&DataInfo> {
        match self.def(ix)? {
            Decl::Data(info) => Ok(info),
            _ => Err(Error::UnknownDecl(ix)),
        }
    }

    pub fn cons_info(&self, ix: GI) -> Result<&ConsInfo> {
        match self.def(ix)? {
            Decl::Cons(info) => Ok(info),
            _ => Err(Error::UnknownDecl(ix)),
        }
    }

    pub fn func_info(&self, ix: GI) -> Result<&FuncInfo> {
        match self.def(ix)? {
            Decl::Func(info) => Ok(info),
            _ => Err(Error::UnknownDecl(ix)),
        }
    }
}
