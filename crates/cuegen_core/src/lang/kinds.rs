//! Builtin kind vocabulary.
//!
//! A kind is the coarse category a builtin parameter or result belongs to. The set is closed: the
//! kind mapper must resolve every host type to exactly one entry of [`KINDS`].
//!
//! ## Notes
//! - `Bytes` and `Reader` are members of the `String` family. The generated registry only ever
//!   mentions family kinds (see [`family`]).
//! - `Top` is the unconstrained kind, `Bottom` marks errors.
//!
//! ## Examples
//! ```rust
//! use cuegen_core::lang::kinds::{self, Kind};
//!
//! assert_eq!(kinds::family(Kind::Bytes), Kind::String);
//! assert_eq!(kinds::variant_name(Kind::Number), "Number");
//! ```

/// Stable identifier for builtin kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    String,
    /// Float/decimal family.
    Number,
    List,
    Struct,
    Bytes,
    Reader,
    /// Unconstrained or unresolved.
    Top,
    /// Error/failure marker.
    Bottom,
}

/// Metadata for a builtin kind.
#[derive(Debug, Clone, Copy)]
pub struct KindInfo {
    pub id: Kind,
    /// Lowercase spelling used in diagnostics.
    pub canonical: &'static str,
    /// Variant name of the interpreter's `Kind` enum.
    pub variant: &'static str,
    /// Family kind emitted into the registry.
    pub family: Kind,
}

/// Registry of builtin kinds.
pub const KINDS: &[KindInfo] = &[
    info(Kind::Bool, "bool", "Bool", Kind::Bool),
    info(Kind::Int, "int", "Int", Kind::Int),
    info(Kind::String, "string", "String", Kind::String),
    info(Kind::Number, "number", "Number", Kind::Number),
    info(Kind::List, "list", "List", Kind::List),
    info(Kind::Struct, "struct", "Struct", Kind::Struct),
    info(Kind::Bytes, "bytes", "Bytes", Kind::String),
    info(Kind::Reader, "reader", "Reader", Kind::String),
    info(Kind::Top, "top", "Top", Kind::Top),
    info(Kind::Bottom, "bottom", "Bottom", Kind::Bottom),
];

/// Return the canonical spelling for a kind.
pub fn as_str(id: Kind) -> &'static str {
    info_for(id).canonical
}

/// Return the interpreter enum variant used when emitting a kind.
pub fn variant_name(id: Kind) -> &'static str {
    info_for(id).variant
}

/// Return the family a kind is emitted as.
///
/// ## Notes
/// - Only `Bytes` and `Reader` differ from their family; both collapse to `String`.
pub fn family(id: Kind) -> Kind {
    info_for(id).family
}

/// Return the full metadata entry for a kind.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: Kind) -> &'static KindInfo {
    KINDS.iter().find(|k| k.id == id).expect("kind info missing")
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

const fn info(id: Kind, canonical: &'static str, variant: &'static str, family: Kind) -> KindInfo {
    KindInfo {
        id,
        canonical,
        variant,
        family,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_one_entry() {
        let all = [
            Kind::Bool,
            Kind::Int,
            Kind::String,
            Kind::Number,
            Kind::List,
            Kind::Struct,
            Kind::Bytes,
            Kind::Reader,
            Kind::Top,
            Kind::Bottom,
        ];
        for kind in all {
            assert_eq!(KINDS.iter().filter(|k| k.id == kind).count(), 1, "{kind:?}");
        }
        assert_eq!(KINDS.len(), all.len());
    }

    #[test]
    fn test_spellings_are_unique() {
        for k in KINDS {
            assert_eq!(KINDS.iter().filter(|o| o.canonical == k.canonical).count(), 1);
            assert_eq!(k.id.to_string(), k.canonical);
        }
    }

    #[test]
    fn test_string_family() {
        assert_eq!(family(Kind::Bytes), Kind::String);
        assert_eq!(family(Kind::Reader), Kind::String);
        assert_eq!(family(Kind::Struct), Kind::Struct);
        assert_eq!(family(Kind::Bottom), Kind::Bottom);
    }

    #[test]
    fn test_display_uses_canonical_spelling() {
        assert_eq!(Kind::Number.to_string(), "number");
        assert_eq!(Kind::Top.to_string(), "top");
    }
}
