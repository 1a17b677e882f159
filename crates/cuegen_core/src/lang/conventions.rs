//! Shared generator conventions (well-known names and naming rules).

/// Directory name excluded from the scan by default (held-out fixtures).
pub const TESTDATA_DIR: &str = "testdata";

/// Extension of host-language source files.
pub const RUST_EXTENSION: &str = "rs";

/// Extension of declarative-language source files.
pub const CUE_EXTENSION: &str = "cue";

/// File stems whose role is test-only.
pub const TEST_FILE_STEMS: &[&str] = &["tests"];

/// File stem suffixes whose role is test-only.
pub const TEST_FILE_SUFFIXES: &[&str] = &["_test", "_tests"];

/// Package names that differ from their helper tag.
///
/// The `structs` package prefixes its helpers with `struct`.
const TAG_RENAMES: &[(&str, &str)] = &[("structs", "struct")];

/// Check whether a source file stem names a test-only file.
///
/// ## Examples
/// ```rust
/// use cuegen_core::lang::conventions::is_test_file_stem;
///
/// assert!(is_test_file_stem("tests"));
/// assert!(is_test_file_stem("strings_test"));
/// assert!(!is_test_file_stem("strings"));
/// ```
pub fn is_test_file_stem(stem: &str) -> bool {
    TEST_FILE_STEMS.contains(&stem) || TEST_FILE_SUFFIXES.iter().any(|s| stem.ends_with(s))
}

/// Derive the helper tag for a package path.
///
/// The tag is the last `/`-separated component, with [`TAG_RENAMES`] applied. Private helpers are
/// only kept when their name starts with the tag.
///
/// ## Examples
/// ```rust
/// use cuegen_core::lang::conventions::helper_tag;
///
/// assert_eq!(helper_tag("encoding/json"), "json");
/// assert_eq!(helper_tag("structs"), "struct");
/// ```
pub fn helper_tag(package_path: &str) -> String {
    let last = package_path.rsplit('/').next().unwrap_or(package_path);
    TAG_RENAMES
        .iter()
        .find(|(from, _)| *from == last)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| last.to_string())
}

/// Convert a Rust identifier into the registry name of a builtin.
///
/// Parts are split on `_`. An all-uppercase part is capitalized (`PI` → `Pi`); any other part only
/// gets its first letter uppercased (`toUpper` → `ToUpper`). Raw identifier prefixes are dropped.
///
/// ## Examples
/// ```rust
/// use cuegen_core::lang::conventions::registry_name;
///
/// assert_eq!(registry_name("to_upper"), "ToUpper");
/// assert_eq!(registry_name("MAX_BASE"), "MaxBase");
/// assert_eq!(registry_name("Pi"), "Pi");
/// ```
pub fn registry_name(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    for part in ident.split('_').filter(|p| !p.is_empty()) {
        let shouting = part.chars().all(|c| !c.is_lowercase());
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            if shouting {
                out.extend(chars.flat_map(char::to_lowercase));
            } else {
                out.extend(chars);
            }
        }
    }
    out
}
