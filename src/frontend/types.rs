//! Structured view of Rust type expressions.
//!
//! `syn::Type` is lowered once into [`TypeExpr`], which keeps only the shape the kind mapper
//! cares about: named paths, pointer-like wrappers, sequences, maps, tuples and trait objects.
//!
//! ## Notes
//! - `Vec<T>`, `VecDeque<T>` and `[T]` lower to [`TypeExpr::Slice`]; fixed arrays `[T; N]` stay
//!   distinct as [`TypeExpr::Array`] since they cannot be fetched like a growable sequence.
//! - `Box<T>` lowers to a pointer, like references and raw pointers.
//! - Parenthesized and invisible-group types are transparent.

use syn::{GenericArgument, PathArguments, Type, TypeParamBound};

/// How a pointer-like type refers to its pointee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerForm {
    Ref,
    RefMut,
    Boxed,
    Raw,
}

/// Lowered type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named {
        /// Path segments before the name (`["std", "io"]` for `std::io::Error`).
        qualifier: Vec<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    Pointer {
        form: PointerForm,
        inner: Box<TypeExpr>,
    },
    Slice(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Tuple(Vec<TypeExpr>),
    /// `dyn A + B` or `impl A + B`; only the last segment of each trait bound is kept.
    TraitObject {
        bounds: Vec<String>,
    },
    Other,
}

const SEQUENCE_NAMES: &[&str] = &["Vec", "VecDeque"];
const MAP_NAMES: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

impl TypeExpr {
    /// Lower a `syn` type.
    pub fn lower(ty: &Type) -> TypeExpr {
        match ty {
            Type::Paren(p) => TypeExpr::lower(&p.elem),
            Type::Group(g) => TypeExpr::lower(&g.elem),
            Type::Reference(r) => TypeExpr::Pointer {
                form: if r.mutability.is_some() {
                    PointerForm::RefMut
                } else {
                    PointerForm::Ref
                },
                inner: Box::new(TypeExpr::lower(&r.elem)),
            },
            Type::Ptr(p) => TypeExpr::Pointer {
                form: PointerForm::Raw,
                inner: Box::new(TypeExpr::lower(&p.elem)),
            },
            Type::Slice(s) => TypeExpr::Slice(Box::new(TypeExpr::lower(&s.elem))),
            Type::Array(a) => TypeExpr::Array(Box::new(TypeExpr::lower(&a.elem))),
            Type::Tuple(t) => TypeExpr::Tuple(t.elems.iter().map(TypeExpr::lower).collect()),
            Type::TraitObject(t) => TypeExpr::TraitObject {
                bounds: trait_bound_names(t.bounds.iter()),
            },
            Type::ImplTrait(t) => TypeExpr::TraitObject {
                bounds: trait_bound_names(t.bounds.iter()),
            },
            Type::Path(p) if p.qself.is_none() => lower_path(&p.path),
            _ => TypeExpr::Other,
        }
    }

    /// Strip every pointer layer.
    pub fn pointee(&self) -> &TypeExpr {
        match self {
            TypeExpr::Pointer { inner, .. } => inner.pointee(),
            other => other,
        }
    }
}

fn lower_path(path: &syn::Path) -> TypeExpr {
    let Some(last) = path.segments.last() else {
        return TypeExpr::Other;
    };
    let name = last.ident.to_string();
    let args = type_args(&last.arguments);

    if SEQUENCE_NAMES.contains(&name.as_str()) && args.len() == 1 {
        return TypeExpr::Slice(Box::new(TypeExpr::lower(args[0])));
    }
    if name == "Box" && args.len() == 1 {
        return TypeExpr::Pointer {
            form: PointerForm::Boxed,
            inner: Box::new(TypeExpr::lower(args[0])),
        };
    }
    if MAP_NAMES.contains(&name.as_str()) && args.len() >= 2 {
        return TypeExpr::Map {
            key: Box::new(TypeExpr::lower(args[0])),
            value: Box::new(TypeExpr::lower(args[1])),
        };
    }

    let qualifier = path
        .segments
        .iter()
        .take(path.segments.len() - 1)
        .map(|s| s.ident.to_string())
        .collect();
    TypeExpr::Named {
        qualifier,
        name,
        args: args.into_iter().map(TypeExpr::lower).collect(),
    }
}

/// Generic type arguments of a path segment (lifetimes and consts are skipped).
pub fn type_args(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(a) => a
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn trait_bound_names<'a>(bounds: impl Iterator<Item = &'a TypeParamBound>) -> Vec<String> {
    bounds
        .filter_map(|b| match b {
            TypeParamBound::Trait(t) => t.path.segments.last().map(|s| s.ident.to_string()),
            _ => None,
        })
        .collect()
}
