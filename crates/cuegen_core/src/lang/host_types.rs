//! Host (Rust) type vocabulary recognized by the kind mapper.
//!
//! Each entry ties a named Rust type to the kind it maps to, the call-context accessor used to
//! fetch an argument of that type, and whether the kind is *ground* (fully determined, so no
//! runtime check is needed).
//!
//! ## Notes
//! - Lookup is by the last path segment; the qualifier only matters for interpreter wrappers,
//!   which must be unqualified or qualified by the interpreter crate itself.
//! - Structural shapes (slices, maps, readers, error types) are not in this table; the kind mapper
//!   handles them from the type's structure.
//!
//! ## Examples
//! ```rust
//! use cuegen_core::lang::host_types::{self, HostTypeId};
//! use cuegen_core::lang::kinds::Kind;
//!
//! let info = host_types::lookup(&["num".to_string()], "BigInt", "cue").unwrap();
//! assert_eq!(info.id, HostTypeId::BigInt);
//! assert_eq!(info.kind, Kind::Int);
//! assert_eq!(info.accessor, "big_int");
//! ```

use super::kinds::Kind;

/// Stable identifier for recognized host types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostTypeId {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
    Str,
    Char,
    BigInt,
    BigUint,
    BigFloat,
    BigRat,
    Decimal,
    Value,
    Struct,
    List,
}

/// Which qualifiers a spelling may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualify {
    /// Any module path (`std::string::String`, `num::BigInt`, ...).
    Any,
    /// Unqualified, or qualified by the interpreter crate only.
    Runtime,
}

/// Metadata for a recognized host type.
#[derive(Debug, Clone, Copy)]
pub struct HostTypeInfo {
    pub id: HostTypeId,
    pub spellings: &'static [&'static str],
    pub qualify: Qualify,
    pub kind: Kind,
    /// Call-context method that yields an owned value of this type.
    pub accessor: &'static str,
    pub ground: bool,
}

/// Registry of recognized host types.
pub const HOST_TYPES: &[HostTypeInfo] = &[
    prim(HostTypeId::Bool, &["bool"], Kind::Bool, "bool"),
    prim(HostTypeId::I8, &["i8"], Kind::Int, "i8"),
    prim(HostTypeId::I16, &["i16"], Kind::Int, "i16"),
    prim(HostTypeId::I32, &["i32"], Kind::Int, "i32"),
    prim(HostTypeId::I64, &["i64"], Kind::Int, "i64"),
    prim(HostTypeId::I128, &["i128"], Kind::Int, "i128"),
    prim(HostTypeId::Isize, &["isize"], Kind::Int, "isize"),
    prim(HostTypeId::U8, &["u8"], Kind::Int, "u8"),
    prim(HostTypeId::U16, &["u16"], Kind::Int, "u16"),
    prim(HostTypeId::U32, &["u32"], Kind::Int, "u32"),
    prim(HostTypeId::U64, &["u64"], Kind::Int, "u64"),
    prim(HostTypeId::U128, &["u128"], Kind::Int, "u128"),
    prim(HostTypeId::Usize, &["usize"], Kind::Int, "usize"),
    prim(HostTypeId::F32, &["f32"], Kind::Number, "f32"),
    prim(HostTypeId::F64, &["f64"], Kind::Number, "f64"),
    prim(HostTypeId::String, &["String"], Kind::String, "string"),
    prim(HostTypeId::Str, &["str"], Kind::String, "string"),
    prim(HostTypeId::Char, &["char"], Kind::String, "char"),
    prim(HostTypeId::BigInt, &["BigInt"], Kind::Int, "big_int"),
    prim(HostTypeId::BigUint, &["BigUint"], Kind::Int, "big_uint"),
    prim(HostTypeId::BigFloat, &["BigFloat"], Kind::Number, "big_float"),
    prim(HostTypeId::BigRat, &["BigRational", "BigRat"], Kind::Number, "big_rat"),
    prim(HostTypeId::Decimal, &["Decimal"], Kind::Number, "decimal"),
    wrapper(HostTypeId::Value, &["Value"], Kind::Top, "value"),
    wrapper(HostTypeId::Struct, &["Struct"], Kind::Struct, "struct_val"),
    wrapper(HostTypeId::List, &["List"], Kind::List, "list"),
];

/// Trait names whose `impl`/`dyn` forms are treated as readable streams.
pub const READER_TRAITS: &[&str] = &["Read", "BufRead"];

/// Resolve a named host type.
///
/// ## Parameters
/// - `qualifier`: path segments before the name (empty for a bare name).
/// - `name`: last path segment.
/// - `runtime_crate`: name of the interpreter crate.
///
/// ## Returns
/// - `Some(&HostTypeInfo)` if the spelling (and its qualifier) is recognized.
/// - `None` otherwise.
pub fn lookup(qualifier: &[String], name: &str, runtime_crate: &str) -> Option<&'static HostTypeInfo> {
    HOST_TYPES.iter().find(|t| {
        t.spellings.contains(&name)
            && match t.qualify {
                Qualify::Any => true,
                Qualify::Runtime => {
                    qualifier.is_empty() || (qualifier.len() == 1 && qualifier[0] == runtime_crate)
                }
            }
    })
}

/// Check whether a type name denotes an error type (`Error`, `io::Error`, `ParseIntError`, ...).
pub fn is_error_name(name: &str) -> bool {
    name.ends_with("Error")
}

/// Check whether a trait name denotes a readable stream.
pub fn is_reader_trait(name: &str) -> bool {
    READER_TRAITS.contains(&name)
}

const fn prim(id: HostTypeId, spellings: &'static [&'static str], kind: Kind, accessor: &'static str) -> HostTypeInfo {
    HostTypeInfo {
        id,
        spellings,
        qualify: Qualify::Any,
        kind,
        accessor,
        ground: true,
    }
}

const fn wrapper(
    id: HostTypeId,
    spellings: &'static [&'static str],
    kind: Kind,
    accessor: &'static str,
) -> HostTypeInfo {
    HostTypeInfo {
        id,
        spellings,
        qualify: Qualify::Runtime,
        kind,
        accessor,
        ground: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_primitives_accept_any_qualifier() {
        assert_eq!(lookup(&[], "i64", "cue").map(|t| t.id), Some(HostTypeId::I64));
        assert_eq!(
            lookup(&q(&["std", "string"]), "String", "cue").map(|t| t.id),
            Some(HostTypeId::String)
        );
    }

    #[test]
    fn test_wrappers_require_runtime_qualifier() {
        assert_eq!(lookup(&[], "Value", "cue").map(|t| t.id), Some(HostTypeId::Value));
        assert_eq!(lookup(&q(&["cue"]), "Struct", "cue").map(|t| t.id), Some(HostTypeId::Struct));
        assert!(lookup(&q(&["serde_json"]), "Value", "cue").is_none());
    }

    #[test]
    fn test_big_numbers_use_dedicated_accessors() {
        let big = lookup(&[], "BigInt", "cue").unwrap();
        assert_eq!(big.kind, Kind::Int);
        assert_eq!(big.accessor, "big_int");
        let unsigned = lookup(&q(&["num_bigint"]), "BigUint", "cue").unwrap();
        assert_eq!(unsigned.kind, Kind::Int);
        assert_eq!(unsigned.accessor, "big_uint");
        let dec = lookup(&q(&["rust_decimal"]), "Decimal", "cue").unwrap();
        assert_eq!(dec.kind, Kind::Number);
        assert_eq!(dec.accessor, "decimal");
    }

    #[test]
    fn test_error_and_reader_names() {
        assert!(is_error_name("Error"));
        assert!(is_error_name("ParseIntError"));
        assert!(!is_error_name("Errors"));
        assert!(is_reader_trait("BufRead"));
        assert!(!is_reader_trait("Write"));
    }
}
