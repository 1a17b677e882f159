//! Registry model shared by the extractor, the assembler and the emitter.
//!
//! One [`PackageEntry`] per package directory; its declarations keep source order (files in
//! sorted order). Function bodies stay `syn` trees inside [`CallBody`] until emission.

use cuegen_core::lang::kinds::Kind;

use crate::frontend::const_eval::NormalizedValue;
use crate::frontend::kind_mapper::{Borrow, Fetch};

/// An exported constant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    /// Registry name (`PI` is registered as `Pi`).
    pub name: String,
    pub value: NormalizedValue,
}

/// How an argument is bound inside the generated wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgBinding {
    pub pat: syn::Pat,
    /// Position in the call context.
    pub index: usize,
    pub fetch: Fetch,
    pub borrow: Borrow,
    /// Type fetched before the borrow is applied (used by [`Fetch::Decode`]).
    pub fetch_ty: syn::Type,
    /// Declared parameter type, when it can annotate a `let` binding.
    pub annotation: Option<syn::Type>,
}

/// How the wrapped body's value is handed back to the call context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnMode {
    /// `c.set_ret(value)`
    Value,
    /// `c.set_result(result)` for `Result<T, E>`.
    Fallible,
}

/// Wrapper IR for an exported function.
#[derive(Debug, Clone, PartialEq)]
pub struct CallBody {
    pub bindings: Vec<ArgBinding>,
    pub mode: ReturnMode,
    pub ret_ty: syn::Type,
    pub block: syn::Block,
}

/// An exported function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    /// Parameter kinds, one per parameter.
    pub params: Vec<Kind>,
    pub result: Kind,
    /// All parameters and the result are ground; the wrapper skips `check_kinds`.
    pub omit_check: bool,
    pub body: CallBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Const(ConstDecl),
    Func(FunctionDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Const(c) => &c.name,
            Decl::Func(f) => &f.name,
        }
    }
}

/// Everything one package directory contributes to the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageEntry {
    /// `/`-separated path relative to the scan root (`""` for the root itself).
    pub path: String,
    pub decls: Vec<Decl>,
    /// Normalized CUE schema text.
    pub snippet: Option<String>,
}

impl PackageEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            decls: Vec::new(),
            snippet: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty() && self.snippet.is_none()
    }

    pub fn find(&self, name: &str) -> Option<&Decl> {
        self.decls.iter().find(|d| d.name() == name)
    }
}
