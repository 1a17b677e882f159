//! Registry module emission.
//!
//! The generated module is built as a token stream with `quote!`, stripped of interpreter-crate
//! qualifiers, parsed back as a `syn::File` and printed with `prettyplease`:
//!
//! ```text
//! PackageEntry* + ImportSpec* + helpers → quote! → strip `cue::` → syn::File → prettyplease
//! ```
//!
//! ## Layout
//! 1. header comment
//! 2. `#![allow(..)]` and `use super::*;`
//! 3. consolidated imports
//! 4. `pub(crate) fn init()`
//! 5. retained helpers
//! 6. `fn builtin_packages()` with one `BuiltinPkg` per package
//!
//! ## Notes
//! - The module lives inside the interpreter crate, so `cue::X` paths are rewritten to `X`. String
//!   literals are never touched.
//! - If the token stream does not parse as a file, the unformatted text is written and a warning
//!   is logged.

use cuegen_core::lang::kinds::{self, Kind};
use cuegen_core::strings::raw_string_literal;
use proc_macro2::{Group, Literal, Spacing, TokenStream, TokenTree};
use quote::{format_ident, quote};

use crate::errors::{GenError, GenResult};
use crate::frontend::imports::ImportSpec;
use crate::frontend::kind_mapper::{Borrow, Fetch};
use crate::registry::{ArgBinding, ConstDecl, Decl, FunctionDecl, PackageEntry, ReturnMode};

/// First line of every generated module.
pub const HEADER: &str = "// Code generated by cuegen. DO NOT EDIT.\n\n";

/// Rendered module text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub source: String,
    /// `false` when `prettyplease` could not be applied.
    pub formatted: bool,
}

/// Emitter for one interpreter crate.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    runtime_crate: &'a str,
}

impl<'a> Emitter<'a> {
    pub fn new(runtime_crate: &'a str) -> Self {
        Self { runtime_crate }
    }

    /// Render the complete module.
    #[tracing::instrument(skip_all, fields(packages = packages.len(), imports = imports.len(), helpers = helpers.len()))]
    pub fn render(
        &self,
        packages: &[PackageEntry],
        imports: &[ImportSpec],
        helpers: &[syn::Item],
    ) -> GenResult<Rendered> {
        let tokens = self.module_tokens(packages, imports, helpers)?;
        let tokens = strip_qualifier(tokens, self.runtime_crate);
        let (body, formatted) = format_module(tokens);
        Ok(Rendered {
            source: format!("{HEADER}{body}"),
            formatted,
        })
    }

    /// Emit the module as tokens (unformatted, qualifiers intact).
    pub fn module_tokens(
        &self,
        packages: &[PackageEntry],
        imports: &[ImportSpec],
        helpers: &[syn::Item],
    ) -> GenResult<TokenStream> {
        let imports = imports
            .iter()
            .map(|spec| {
                spec.to_item().map_err(|err| GenError::Emit {
                    message: format!("invalid import `{spec}`: {err}"),
                })
            })
            .collect::<GenResult<Vec<_>>>()?;
        let packages = packages
            .iter()
            .map(|entry| self.emit_package(entry))
            .collect::<GenResult<Vec<_>>>()?;

        Ok(quote! {
            #![allow(unused_imports, dead_code, unused_variables)]

            use super::*;
            #(#imports)*

            pub(crate) fn init() {
                static INIT: std::sync::Once = std::sync::Once::new();
                INIT.call_once(|| init_builtins(builtin_packages()));
            }

            #(#helpers)*

            fn builtin_packages() -> Vec<(&'static str, BuiltinPkg)> {
                vec![#(#packages),*]
            }
        })
    }

    fn emit_package(&self, entry: &PackageEntry) -> GenResult<TokenStream> {
        let path = &entry.path;
        let natives = entry.decls.iter().map(|decl| match decl {
            Decl::Const(c) => emit_const(c),
            Decl::Func(f) => emit_func(f),
        });
        let cue = match &entry.snippet {
            Some(text) => {
                let lit: Literal = raw_string_literal(text).parse().map_err(|err| GenError::Emit {
                    message: format!("cannot embed CUE snippet of `{path}`: {err:?}"),
                })?;
                quote!(cue: #lit,)
            }
            None => quote!(..BuiltinPkg::default()),
        };
        Ok(quote! {
            (#path, BuiltinPkg {
                native: vec![#(#natives),*],
                #cue
            })
        })
    }
}

// ============================================================================
// Declarations
// ============================================================================

fn emit_const(decl: &ConstDecl) -> TokenStream {
    let name = &decl.name;
    let value = decl.value.text();
    quote! {
        Builtin {
            name: #name,
            konst: Some(#value),
            ..Builtin::default()
        }
    }
}

fn emit_func(decl: &FunctionDecl) -> TokenStream {
    let name = &decl.name;
    let params = decl.params.iter().map(|k| kind_tokens(*k));
    let result = kind_tokens(decl.result);
    let bindings = decl.body.bindings.iter().map(emit_binding);

    let ret_ty = &decl.body.ret_ty;
    let block = &decl.body.block;
    let call = match decl.body.mode {
        ReturnMode::Value => quote!(c.set_ret((|| -> #ret_ty #block)());),
        ReturnMode::Fallible => quote!(c.set_result((|| -> #ret_ty #block)());),
    };
    let call = if decl.omit_check {
        call
    } else {
        quote! {
            if c.check_kinds() {
                #call
            }
        }
    };

    quote! {
        Builtin {
            name: #name,
            params: vec![#(#params),*],
            result: #result,
            func: Some(|c: &mut CallCtxt| {
                #(#bindings)*
                #call
            }),
            ..Builtin::default()
        }
    }
}

fn emit_binding(binding: &ArgBinding) -> TokenStream {
    let pat = &binding.pat;
    let index = Literal::usize_unsuffixed(binding.index);
    let fetch = match binding.fetch {
        Fetch::Accessor(accessor) => {
            let accessor = format_ident!("{}", accessor);
            quote!(c.#accessor(#index))
        }
        Fetch::Decode => {
            let ty = &binding.fetch_ty;
            quote!(c.decode::<#ty>(#index))
        }
    };
    let value = match binding.borrow {
        Borrow::Owned => fetch,
        Borrow::Shared => quote!(&#fetch),
        Borrow::Exclusive => quote!(&mut #fetch),
        Borrow::Boxed => quote!(Box::new(#fetch)),
    };
    match &binding.annotation {
        Some(ty) => quote!(let #pat: #ty = #value;),
        None => quote!(let #pat = #value;),
    }
}

fn kind_tokens(kind: Kind) -> TokenStream {
    let variant = format_ident!("{}", kinds::variant_name(kinds::family(kind)));
    quote!(Kind::#variant)
}

// ============================================================================
// Post-processing
// ============================================================================

/// Remove `<qualifier> ::` path prefixes that are not themselves preceded by `::`.
///
/// Recurses into groups; literals (including string literals mentioning the qualifier) are kept.
pub fn strip_qualifier(tokens: TokenStream, qualifier: &str) -> TokenStream {
    let trees: Vec<TokenTree> = tokens.into_iter().collect();
    let mut out: Vec<TokenTree> = Vec::with_capacity(trees.len());
    let mut i = 0;
    while i < trees.len() {
        match &trees[i] {
            TokenTree::Group(g) => {
                let mut group = Group::new(g.delimiter(), strip_qualifier(g.stream(), qualifier));
                group.set_span(g.span());
                out.push(TokenTree::Group(group));
            }
            TokenTree::Ident(ident) if *ident == qualifier && is_path_sep(&trees, i + 1) && !ends_with_path_sep(&out) => {
                i += 3;
                continue;
            }
            other => out.push(other.clone()),
        }
        i += 1;
    }
    out.into_iter().collect()
}

fn is_path_sep(trees: &[TokenTree], at: usize) -> bool {
    matches!(
        (trees.get(at), trees.get(at + 1)),
        (Some(TokenTree::Punct(a)), Some(TokenTree::Punct(b)))
            if a.as_char() == ':' && a.spacing() == Spacing::Joint && b.as_char() == ':'
    )
}

fn ends_with_path_sep(out: &[TokenTree]) -> bool {
    out.len() >= 2 && is_path_sep(out, out.len() - 2)
}

/// Pretty-print a module, falling back to the raw token text.
pub fn format_module(tokens: TokenStream) -> (String, bool) {
    match syn::parse2::<syn::File>(tokens.clone()) {
        Ok(file) => (prettyplease::unparse(&file), true),
        Err(err) => {
            tracing::warn!(error = %err, "generated module does not parse; writing unformatted source");
            (tokens.to_string(), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::extract_source;
    use std::path::Path;

    fn squash(text: &str) -> String {
        text.split_whitespace().collect()
    }

    fn entry(package: &str, source: &str) -> (PackageEntry, Vec<syn::Item>) {
        let decls = extract_source(source, Path::new("lib.rs"), package, "cue").unwrap();
        let mut entry = PackageEntry::new(package);
        entry.decls = decls.decls;
        (entry, decls.helpers)
    }

    #[test]
    fn test_module_layout() {
        let (entry, helpers) = entry(
            "math",
            "pub const PI: i64 = 3;\n\
             pub fn double(n: i64) -> i64 { math_twice(n) }\n\
             fn math_twice(n: i64) -> i64 { n * 2 }\n",
        );
        let imports = vec![ImportSpec::new("std::io::Read", None)];
        let rendered = Emitter::new("cue").render(&[entry], &imports, &helpers).unwrap();
        assert!(rendered.formatted);
        assert!(
            rendered
                .source
                .starts_with("// Code generated by cuegen. DO NOT EDIT.\n\n#![allow(unused_imports, dead_code, unused_variables)]")
        );

        let body = squash(&rendered.source);
        let order = [
            "usesuper::*;",
            "usestd::io::Read;",
            "pub(crate)fninit()",
            "fnmath_twice(",
            "fnbuiltin_packages()->Vec<(&'staticstr,BuiltinPkg)>",
        ];
        let positions: Vec<usize> = order.iter().map(|s| body.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

        assert!(body.contains(r#"("math",BuiltinPkg{native:vec![Builtin{name:"Pi",konst:Some("3"),..Builtin::default()}"#));
        assert!(body.contains(r#"Builtin{name:"Double",params:vec![Kind::Int],result:Kind::Int,"#));
        assert!(body.contains("letn:i64=c.i64(0);c.set_ret((||->i64{math_twice(n)})());"));
        assert!(body.contains("..BuiltinPkg::default()"));
        syn::parse_file(&rendered.source).unwrap();
    }

    #[test]
    fn test_guarded_and_fallible_bodies() {
        let (entry, _) = entry(
            "regexp",
            "pub fn find(re: &Regex, s: &str) -> Result<String, Error> { Ok(s.to_string()) }",
        );
        let rendered = Emitter::new("cue").render(&[entry], &[], &[]).unwrap();
        let body = squash(&rendered.source);
        assert!(body.contains("letre:&Regex=&c.decode::<Regex>(0);"));
        assert!(body.contains("lets:&str=&c.string(1);"));
        assert!(body.contains("ifc.check_kinds(){c.set_result((||->Result<String,Error>{Ok(s.to_string())})());}"));
        assert!(body.contains("params:vec![Kind::Top,Kind::String],result:Kind::String"));
    }

    #[test]
    fn test_bindings_follow_concrete_types() {
        let (entry, _) = entry("math/big", "pub fn id(n: BigUint, b: [u8; 4]) -> i64 { 0 }");
        let rendered = Emitter::new("cue").render(&[entry], &[], &[]).unwrap();
        let body = squash(&rendered.source);
        assert!(body.contains("letn:BigUint=c.big_uint(0);"));
        assert!(body.contains("letb:[u8;4]=c.decode::<[u8;4]>(1);"));
        assert!(body.contains("params:vec![Kind::Int,Kind::String]"));
    }

    #[test]
    fn test_snippet_is_embedded_raw() {
        let mut entry = PackageEntry::new("list");
        entry.snippet = Some("#Ref: \"#x\"\n".to_string());
        let rendered = Emitter::new("cue").render(&[entry], &[], &[]).unwrap();
        assert!(rendered.source.contains("cue: r##\"#Ref: \"#x\"\n\"##"));
        assert!(!rendered.source.contains("BuiltinPkg::default()"));
    }

    #[test]
    fn test_strip_qualifier() {
        let tokens = quote! {
            fn f(v: cue::Value) -> Vec<cue::Struct> {
                let s = "cue::kept";
                other::cue::Kept::new();
                ::cue::Abs;
                cue(v)
            }
        };
        let stripped = strip_qualifier(tokens, "cue").to_string();
        insta::assert_snapshot!(
            stripped,
            @r#"fn f (v : Value) -> Vec < Struct > { let s = "cue::kept" ; other :: cue :: Kept :: new () ; :: cue :: Abs ; cue (v) }"#
        );
    }

    #[test]
    fn test_unparsable_module_falls_back() {
        let (text, formatted) = format_module(quote!(fn 1 () {}));
        assert!(!formatted);
        assert_eq!(text, "fn 1 () { }");
    }
}
