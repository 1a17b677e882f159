//! Frontend: from Rust package sources to registry declarations.
//!
//! ## Modules
//!
//! - `types`: lowering of `syn::Type` into [`types::TypeExpr`]
//! - `kind_mapper`: [`types::TypeExpr`] → kind, groundness and argument fetch
//! - `const_eval`: constant folding and value normalization
//! - `imports`: `use` flattening into [`imports::ImportSpec`]
//! - `extract`: per-file declaration extraction

pub mod const_eval;
pub mod extract;
pub mod imports;
pub mod kind_mapper;
pub mod types;

pub use extract::{FileContext, FileDecls, extract_file, extract_source, is_test_file};
pub use imports::ImportSpec;
pub use kind_mapper::KindMapper;
