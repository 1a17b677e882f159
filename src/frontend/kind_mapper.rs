//! Map host types onto builtin kinds.
//!
//! The mapper is total: every [`TypeExpr`] resolves to exactly one [`Kind`], a groundness flag and
//! a fetch strategy for binding an argument of that type from the call context.
//!
//! ## Notes
//! - Pointers (`&T`, `&mut T`, `Box<T>`, raw pointers) map by their pointee.
//! - A *ground* kind is fully determined by the signature, so the generated wrapper needs no
//!   runtime kind check for it.
//! - Types the mapper does not recognize map to a non-ground `Top` and are decoded generically.
//!
//! ## See also
//! - [`cuegen_core::lang::host_types`] for the named-type table.

use cuegen_core::lang::host_types::{self, HostTypeId, HostTypeInfo};
use cuegen_core::lang::kinds::Kind;
use syn::Type;

use super::types::{TypeExpr, type_args};

/// How an argument value is fetched from the call context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// `c.<accessor>(i)`.
    Accessor(&'static str),
    /// `c.decode::<T>(i)`.
    Decode,
}

/// How the fetched value is wrapped to match the declared parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Borrow {
    Owned,
    /// `&fetch`
    Shared,
    /// `&mut fetch`
    Exclusive,
    /// `Box::new(fetch)`
    Boxed,
}

/// Result of mapping one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub kind: Kind,
    pub ground: bool,
    pub fetch: Fetch,
}

impl Mapping {
    const fn new(kind: Kind, ground: bool, fetch: Fetch) -> Self {
        Self { kind, ground, fetch }
    }

    const fn unknown() -> Self {
        Self::new(Kind::Top, false, Fetch::Decode)
    }

    fn from_host(info: &HostTypeInfo) -> Self {
        Self::new(info.kind, info.ground, Fetch::Accessor(info.accessor))
    }
}

/// Kind mapper bound to one interpreter crate name.
#[derive(Debug, Clone, Copy)]
pub struct KindMapper<'a> {
    runtime_crate: &'a str,
}

impl<'a> KindMapper<'a> {
    pub fn new(runtime_crate: &'a str) -> Self {
        Self { runtime_crate }
    }

    /// Map a `syn` type.
    pub fn map_type(&self, ty: &Type) -> Mapping {
        self.map(&TypeExpr::lower(ty))
    }

    /// Map a lowered type.
    pub fn map(&self, ty: &TypeExpr) -> Mapping {
        match ty.pointee() {
            TypeExpr::Named { qualifier, name, .. } => {
                if let Some(info) = host_types::lookup(qualifier, name, self.runtime_crate) {
                    Mapping::from_host(info)
                } else if host_types::is_error_name(name) {
                    Mapping::new(Kind::Bottom, true, Fetch::Decode)
                } else {
                    Mapping::unknown()
                }
            }
            TypeExpr::Slice(elem) => self.map_sequence(elem),
            TypeExpr::Array(elem) => Mapping {
                fetch: Fetch::Decode,
                ..self.map_sequence(elem)
            },
            TypeExpr::Map { .. } => Mapping::new(Kind::Struct, false, Fetch::Decode),
            TypeExpr::TraitObject { bounds } => {
                if bounds.iter().any(|b| host_types::is_reader_trait(b)) {
                    Mapping::new(Kind::Reader, true, Fetch::Accessor("reader"))
                } else if bounds.iter().any(|b| host_types::is_error_name(b)) {
                    Mapping::new(Kind::Bottom, true, Fetch::Decode)
                } else {
                    Mapping::unknown()
                }
            }
            _ => Mapping::unknown(),
        }
    }

    fn map_sequence(&self, elem: &TypeExpr) -> Mapping {
        let id = match elem.pointee() {
            TypeExpr::Named { qualifier, name, .. } => {
                host_types::lookup(qualifier, name, self.runtime_crate).map(|t| t.id)
            }
            _ => None,
        };
        match id {
            Some(HostTypeId::U8) => Mapping::new(Kind::Bytes, true, Fetch::Accessor("bytes")),
            Some(HostTypeId::String | HostTypeId::Str) => {
                Mapping::new(Kind::List, false, Fetch::Accessor("str_list"))
            }
            Some(HostTypeId::Value) => Mapping::new(Kind::List, true, Fetch::Accessor("list")),
            _ => Mapping::new(Kind::List, false, Fetch::Decode),
        }
    }
}

/// Split a parameter type into its outermost borrow form and the type to fetch.
///
/// Only one pointer layer is unwrapped; raw pointers are fetched as-is.
pub fn binding_target(ty: &Type) -> (Borrow, &Type) {
    match ty {
        Type::Paren(p) => binding_target(&p.elem),
        Type::Group(g) => binding_target(&g.elem),
        Type::Reference(r) if r.mutability.is_some() => (Borrow::Exclusive, &*r.elem),
        Type::Reference(r) => (Borrow::Shared, &*r.elem),
        Type::Path(p) if p.qself.is_none() => match p.path.segments.last() {
            Some(last) if last.ident == "Box" => match type_args(&last.arguments).as_slice() {
                [inner] => (Borrow::Boxed, *inner),
                _ => (Borrow::Owned, ty),
            },
            _ => (Borrow::Owned, ty),
        },
        _ => (Borrow::Owned, ty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(src: &str) -> Mapping {
        let ty: Type = syn::parse_str(src).unwrap();
        KindMapper::new("cue").map_type(&ty)
    }

    #[test]
    fn test_scalars_are_ground() {
        assert_eq!(map("i64"), Mapping::new(Kind::Int, true, Fetch::Accessor("i64")));
        assert_eq!(map("&str"), Mapping::new(Kind::String, true, Fetch::Accessor("string")));
        assert_eq!(map("f64").kind, Kind::Number);
        assert_eq!(map("char").kind, Kind::String);
        assert_eq!(map("bool").fetch, Fetch::Accessor("bool"));
    }

    #[test]
    fn test_big_numbers_keep_their_accessor() {
        assert_eq!(map("num::BigInt"), Mapping::new(Kind::Int, true, Fetch::Accessor("big_int")));
        assert_eq!(map("&BigRational").fetch, Fetch::Accessor("big_rat"));
        assert_eq!(map("BigUint"), Mapping::new(Kind::Int, true, Fetch::Accessor("big_uint")));
        assert_eq!(map("Decimal").kind, Kind::Number);
    }

    #[test]
    fn test_sequences() {
        assert_eq!(map("Vec<u8>"), Mapping::new(Kind::Bytes, true, Fetch::Accessor("bytes")));
        assert_eq!(map("&[u8]").kind, Kind::Bytes);
        assert_eq!(map("&[&str]"), Mapping::new(Kind::List, false, Fetch::Accessor("str_list")));
        assert_eq!(map("Vec<String>").fetch, Fetch::Accessor("str_list"));
        assert_eq!(map("Vec<Value>"), Mapping::new(Kind::List, true, Fetch::Accessor("list")));
        assert_eq!(map("Vec<i64>"), Mapping::new(Kind::List, false, Fetch::Decode));
    }

    #[test]
    fn test_fixed_arrays_are_decoded() {
        assert_eq!(map("[u8; 4]"), Mapping::new(Kind::Bytes, true, Fetch::Decode));
        assert_eq!(map("&[u8; 32]").fetch, Fetch::Decode);
        assert_eq!(map("[String; 2]"), Mapping::new(Kind::List, false, Fetch::Decode));
    }

    #[test]
    fn test_interpreter_wrappers() {
        assert_eq!(map("Value"), Mapping::new(Kind::Top, true, Fetch::Accessor("value")));
        assert_eq!(map("&cue::Struct").kind, Kind::Struct);
        assert_eq!(map("serde_json::Value"), Mapping::new(Kind::Top, false, Fetch::Decode));
    }

    #[test]
    fn test_readers_maps_and_errors() {
        assert_eq!(map("Box<dyn Read>"), Mapping::new(Kind::Reader, true, Fetch::Accessor("reader")));
        assert_eq!(map("impl std::io::BufRead").kind, Kind::Reader);
        assert_eq!(map("HashMap<String, i64>"), Mapping::new(Kind::Struct, false, Fetch::Decode));
        assert_eq!(map("std::io::Error").kind, Kind::Bottom);
        assert_eq!(map("Box<dyn std::error::Error>").kind, Kind::Bottom);
        assert_eq!(map("ParseIntError").kind, Kind::Bottom);
    }

    #[test]
    fn test_unknown_types_are_top() {
        assert_eq!(map("Regex"), Mapping::unknown());
        assert_eq!(map("(i64, i64)"), Mapping::unknown());
    }

    #[test]
    fn test_binding_target() {
        let ty: Type = syn::parse_str("&mut Vec<u8>").unwrap();
        let (borrow, inner) = binding_target(&ty);
        assert_eq!(borrow, Borrow::Exclusive);
        assert_eq!(quote::quote!(#inner).to_string(), "Vec < u8 >");

        let ty: Type = syn::parse_str("Box<Regex>").unwrap();
        let (borrow, inner) = binding_target(&ty);
        assert_eq!(borrow, Borrow::Boxed);
        assert_eq!(quote::quote!(#inner).to_string(), "Regex");

        let ty: Type = syn::parse_str("i64").unwrap();
        assert_eq!(binding_target(&ty).0, Borrow::Owned);
    }
}
