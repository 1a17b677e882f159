//! Declaration extraction for one Rust source file.
//!
//! A package file may contain:
//!
//! - `pub const` items, folded into registry constants;
//! - `pub fn` items, wrapped as registry functions;
//! - private helpers (functions, methods, macros, statics) copied into the generated module;
//! - `use` items, forwarded to the import consolidator.
//!
//! Exported types and statics, nested modules and other item kinds are rejected.
//!
//! ## Notes
//! - Test-only code is invisible to the extractor: `tests.rs`, `*_test.rs`, `*_tests.rs` files and
//!   items marked `#[test]` or `#[cfg(test)]`.
//! - Private functions are only kept when their name starts with the package's helper tag.
//! - Declarations that cannot be registered (unsupported constant kinds, return shapes, generic or
//!   async functions) are dropped and reported, not fatal.

use std::fs;
use std::path::Path;

use cuegen_core::lang::conventions::{helper_tag, is_test_file_stem, registry_name};
use cuegen_core::lang::kinds::{self, Kind};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, FnArg, ImplItem, Item, ItemConst, ItemFn, ItemImpl, Meta, ReturnType, Token, Type, Visibility};

use super::const_eval::{self, IntWidth, normalize};
use super::imports::{ImportSpec, flatten_use};
use super::kind_mapper::{Fetch, KindMapper, Mapping, binding_target};
use super::types::{PointerForm, TypeExpr, type_args};
use crate::errors::{DropReason, DroppedDecl, GenError, GenResult, Location};
use crate::registry::{ArgBinding, CallBody, ConstDecl, Decl, FunctionDecl, ReturnMode};

// ============================================================================
// File context
// ============================================================================

/// Immutable per-file extraction context.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    pub file: &'a Path,
    /// Package key of the directory holding the file.
    pub package: &'a str,
    /// Prefix that private helpers must carry to be retained.
    pub tag: String,
    /// Effective name of the file's first import, used in diagnostics.
    pub default_pkg: Option<String>,
    pub runtime_crate: &'a str,
}

impl<'a> FileContext<'a> {
    /// Build the context for a parsed file.
    pub fn new(file: &'a Path, package: &'a str, runtime_crate: &'a str, parsed: &syn::File) -> Self {
        let default_pkg = parsed.items.iter().find_map(|item| match item {
            Item::Use(u) if !is_test_only(&u.attrs) => {
                flatten_use(u).first().map(|spec| spec.effective_name().to_string())
            }
            _ => None,
        });
        Self {
            file,
            package,
            tag: helper_tag(package),
            default_pkg,
            runtime_crate,
        }
    }

    fn at(&self, node: &impl Spanned) -> Location {
        Location::new(self.file, node.span().start().line)
    }

    fn is_helper_name(&self, name: &str) -> bool {
        name.starts_with(self.tag.as_str())
    }

    fn mapper(&self) -> KindMapper<'a> {
        KindMapper::new(self.runtime_crate)
    }

    fn drop_decl(&self, out: &mut FileDecls, name: String, reason: DropReason) {
        let dropped = DroppedDecl {
            package: self.package.to_string(),
            default_pkg: self.default_pkg.clone(),
            name,
            reason,
        };
        tracing::warn!(
            package = %dropped.package,
            name = %dropped.name,
            reason = %dropped.reason,
            "dropped declaration"
        );
        out.dropped.push(dropped);
    }
}

/// Everything one file contributes.
#[derive(Debug, Clone, Default)]
pub struct FileDecls {
    pub decls: Vec<Decl>,
    pub imports: Vec<ImportSpec>,
    pub helpers: Vec<Item>,
    pub dropped: Vec<DroppedDecl>,
}

// ============================================================================
// Entry points
// ============================================================================

/// Check whether a file is test-only by its name.
pub fn is_test_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(is_test_file_stem)
}

/// Read, parse and extract one file.
#[tracing::instrument(skip_all, fields(file = %path.display(), package = package))]
pub fn extract_file(path: &Path, package: &str, runtime_crate: &str) -> GenResult<FileDecls> {
    let source = fs::read_to_string(path).map_err(|source| GenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    extract_source(&source, path, package, runtime_crate)
}

/// Parse and extract source text; `path` is only used for locations.
pub fn extract_source(source: &str, path: &Path, package: &str, runtime_crate: &str) -> GenResult<FileDecls> {
    let parsed = syn::parse_file(source).map_err(|err| GenError::Parse {
        at: Location::new(path, err.span().start().line),
        message: err.to_string(),
    })?;

    let mut out = FileDecls::default();
    if is_test_only(&parsed.attrs) {
        tracing::debug!(file = %path.display(), "skipping test-only file");
        return Ok(out);
    }

    let ctx = FileContext::new(path, package, runtime_crate, &parsed);
    for item in &parsed.items {
        if is_test_only(item_attrs(item)) {
            continue;
        }
        extract_item(&ctx, item, &mut out)?;
    }
    Ok(out)
}

// ============================================================================
// Items
// ============================================================================

fn extract_item(ctx: &FileContext<'_>, item: &Item, out: &mut FileDecls) -> GenResult<()> {
    match item {
        Item::Use(u) => out.imports.extend(flatten_use(u)),
        Item::Const(c) if is_pub(&c.vis) => extract_const(ctx, c, out)?,
        Item::Const(_) => {}
        Item::Fn(f) if is_pub(&f.vis) => extract_fn(ctx, f, out)?,
        Item::Fn(f) => {
            if ctx.is_helper_name(&f.sig.ident.to_string()) {
                out.helpers.push(item.clone());
            }
        }
        Item::Impl(i) => extract_impl(ctx, i, out),
        Item::Static(s) if is_pub(&s.vis) => {
            return Err(GenError::ExportedStatic {
                at: ctx.at(item),
                package: ctx.package.to_string(),
                name: s.ident.to_string(),
            });
        }
        Item::Static(_) => out.helpers.push(item.clone()),
        Item::Struct(s) => check_private_type(ctx, item, &s.vis, "struct", &s.ident)?,
        Item::Enum(e) => check_private_type(ctx, item, &e.vis, "enum", &e.ident)?,
        Item::Union(u) => check_private_type(ctx, item, &u.vis, "union", &u.ident)?,
        Item::Type(t) => check_private_type(ctx, item, &t.vis, "type alias", &t.ident)?,
        Item::Trait(t) => check_private_type(ctx, item, &t.vis, "trait", &t.ident)?,
        Item::TraitAlias(t) => check_private_type(ctx, item, &t.vis, "trait alias", &t.ident)?,
        Item::Macro(m) => match &m.ident {
            Some(name) if ctx.is_helper_name(&name.to_string()) => out.helpers.push(item.clone()),
            Some(_) => {}
            None => return Err(unsupported(ctx, item, "macro invocation")),
        },
        Item::Mod(_) => return Err(unsupported(ctx, item, "mod")),
        Item::ExternCrate(_) => return Err(unsupported(ctx, item, "extern crate")),
        Item::ForeignMod(_) => return Err(unsupported(ctx, item, "extern block")),
        _ => return Err(unsupported(ctx, item, "item")),
    }
    Ok(())
}

fn unsupported(ctx: &FileContext<'_>, item: &Item, kind: &'static str) -> GenError {
    GenError::UnsupportedItem {
        at: ctx.at(item),
        package: ctx.package.to_string(),
        item: kind,
    }
}

fn check_private_type(
    ctx: &FileContext<'_>,
    item: &Item,
    vis: &Visibility,
    kind: &'static str,
    ident: &syn::Ident,
) -> GenResult<()> {
    if is_pub(vis) {
        return Err(GenError::ExportedType {
            at: ctx.at(item),
            package: ctx.package.to_string(),
            item: kind,
            name: ident.to_string(),
        });
    }
    tracing::debug!(package = ctx.package, name = %ident, "dropping private {kind}");
    Ok(())
}

fn extract_const(ctx: &FileContext<'_>, item: &ItemConst, out: &mut FileDecls) -> GenResult<()> {
    let ident = item.ident.to_string();
    let width = IntWidth::of_type(&item.ty);
    let folded = const_eval::fold_as(&item.expr, width).map_err(|source| GenError::ConstEval {
        at: ctx.at(item),
        package: ctx.package.to_string(),
        name: ident.clone(),
        source,
    })?;
    match normalize(folded) {
        Ok(value) => out.decls.push(Decl::Const(ConstDecl {
            name: registry_name(&ident),
            value,
        })),
        Err(unrepresentable) => ctx.drop_decl(
            out,
            ident,
            DropReason::UnsupportedConstKind {
                kind: unrepresentable.kind,
                value: unrepresentable.value,
            },
        ),
    }
    Ok(())
}

/// Keep the tag-prefixed methods of an inherent impl, or a trait impl whose methods all are.
fn extract_impl(ctx: &FileContext<'_>, item: &ItemImpl, out: &mut FileDecls) {
    let keeps = |member: &ImplItem| match member {
        ImplItem::Fn(m) => ctx.is_helper_name(&m.sig.ident.to_string()),
        _ => true,
    };
    let members: Vec<ImplItem> = item
        .items
        .iter()
        .filter(|member| !matches!(member, ImplItem::Fn(m) if is_test_only(&m.attrs)))
        .cloned()
        .collect();

    if item.trait_.is_some() {
        if members.iter().all(keeps) {
            let mut kept = item.clone();
            kept.items = members;
            out.helpers.push(Item::Impl(kept));
        }
        return;
    }

    let members: Vec<ImplItem> = members.into_iter().filter(|m| keeps(m)).collect();
    if members.iter().any(|m| matches!(m, ImplItem::Fn(_))) {
        let mut kept = item.clone();
        kept.items = members;
        out.helpers.push(Item::Impl(kept));
    }
}

// ============================================================================
// Functions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeSource {
    Plain,
    Tuple,
    Result,
}

/// Result kinds of a function signature.
#[derive(Debug, Clone)]
struct ReturnShape {
    mappings: Vec<Mapping>,
    source: ShapeSource,
}

impl ReturnShape {
    fn of(output: &ReturnType, mapper: &KindMapper<'_>) -> Self {
        let ty = match output {
            ReturnType::Default => {
                return Self {
                    mappings: Vec::new(),
                    source: ShapeSource::Tuple,
                };
            }
            ReturnType::Type(_, ty) => strip_parens(ty),
        };
        match ty {
            Type::Tuple(t) => Self {
                mappings: t.elems.iter().map(|e| mapper.map_type(e)).collect(),
                source: ShapeSource::Tuple,
            },
            Type::Path(p) if p.qself.is_none() && p.path.segments.last().is_some_and(|s| s.ident == "Result") => {
                let args = p
                    .path
                    .segments
                    .last()
                    .map(|s| type_args(&s.arguments))
                    .unwrap_or_default();
                let error = Mapping {
                    kind: Kind::Bottom,
                    ground: true,
                    fetch: Fetch::Decode,
                };
                let mappings = match args.as_slice() {
                    [value, err] => vec![mapper.map_type(value), mapper.map_type(err)],
                    [value] => vec![mapper.map_type(value), error],
                    _ => vec![mapper.map(&TypeExpr::Other), error],
                };
                Self {
                    mappings,
                    source: ShapeSource::Result,
                }
            }
            other => Self {
                mappings: vec![mapper.map_type(other)],
                source: ShapeSource::Plain,
            },
        }
    }

    fn accepted(&self) -> bool {
        match self.source {
            ShapeSource::Plain => self.mappings.len() == 1,
            ShapeSource::Result => self.mappings.len() == 2 && self.mappings[1].kind == Kind::Bottom,
            ShapeSource::Tuple => false,
        }
    }

    fn kinds(&self) -> Vec<Kind> {
        self.mappings.iter().map(|m| m.kind).collect()
    }
}

fn extract_fn(ctx: &FileContext<'_>, item: &ItemFn, out: &mut FileDecls) -> GenResult<()> {
    let sig = &item.sig;
    let ident = sig.ident.to_string();

    if !sig.generics.params.is_empty() {
        ctx.drop_decl(out, ident, DropReason::Generic);
        return Ok(());
    }
    if sig.asyncness.is_some() {
        ctx.drop_decl(out, ident, DropReason::Async);
        return Ok(());
    }

    let mapper = ctx.mapper();
    let shape = ReturnShape::of(&sig.output, &mapper);
    if !shape.accepted() {
        let kinds = shape.kinds();
        ctx.drop_decl(out, ident, DropReason::ReturnShape { kinds });
        return Ok(());
    }
    let ReturnType::Type(_, ret_ty) = &sig.output else {
        return Ok(());
    };
    let result = shape.mappings[0];
    let mode = match shape.source {
        ShapeSource::Result => ReturnMode::Fallible,
        _ => ReturnMode::Value,
    };

    let mut params = Vec::with_capacity(sig.inputs.len());
    let mut bindings = Vec::with_capacity(sig.inputs.len());
    let mut omit_check = result.ground;
    for (index, input) in sig.inputs.iter().enumerate() {
        let FnArg::Typed(arg) = input else {
            return Err(GenError::UnsupportedItem {
                at: ctx.at(input),
                package: ctx.package.to_string(),
                item: "free function with a receiver",
            });
        };
        let mapping = mapper.map_type(&arg.ty);
        omit_check &= mapping.ground;
        params.push(kinds::family(mapping.kind));

        let (borrow, fetch_ty) = binding_target(&arg.ty);
        let fetch = match TypeExpr::lower(&arg.ty) {
            TypeExpr::Pointer {
                form: PointerForm::Raw,
                ..
            } => Fetch::Decode,
            _ => mapping.fetch,
        };
        bindings.push(ArgBinding {
            pat: (*arg.pat).clone(),
            index,
            fetch,
            borrow,
            fetch_ty: fetch_ty.clone(),
            annotation: (!mentions_impl_trait(&arg.ty)).then(|| (*arg.ty).clone()),
        });
    }

    out.decls.push(Decl::Func(FunctionDecl {
        name: registry_name(&ident),
        params,
        result: kinds::family(result.kind),
        omit_check,
        body: CallBody {
            bindings,
            mode,
            ret_ty: (**ret_ty).clone(),
            block: (*item.block).clone(),
        },
    }));
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn is_pub(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

/// `#[test]`, or a `#[cfg(..)]` whose predicate can only hold under `test`.
fn is_test_only(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("test")
            || (attr.path().is_ident("cfg") && attr.parse_args::<Meta>().is_ok_and(|meta| requires_test(&meta)))
    })
}

/// `test`, `all(.., test, ..)`, or `any(..)` whose every branch requires `test`.
fn requires_test(meta: &Meta) -> bool {
    match meta {
        Meta::Path(path) => path.is_ident("test"),
        Meta::List(list) => {
            let Ok(nested) = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated) else {
                return false;
            };
            if list.path.is_ident("all") {
                nested.iter().any(requires_test)
            } else if list.path.is_ident("any") {
                !nested.is_empty() && nested.iter().all(requires_test)
            } else {
                false
            }
        }
        Meta::NameValue(_) => false,
    }
}

fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Const(i) => &i.attrs,
        Item::Enum(i) => &i.attrs,
        Item::ExternCrate(i) => &i.attrs,
        Item::Fn(i) => &i.attrs,
        Item::ForeignMod(i) => &i.attrs,
        Item::Impl(i) => &i.attrs,
        Item::Macro(i) => &i.attrs,
        Item::Mod(i) => &i.attrs,
        Item::Static(i) => &i.attrs,
        Item::Struct(i) => &i.attrs,
        Item::Trait(i) => &i.attrs,
        Item::TraitAlias(i) => &i.attrs,
        Item::Type(i) => &i.attrs,
        Item::Union(i) => &i.attrs,
        Item::Use(i) => &i.attrs,
        _ => &[],
    }
}

fn strip_parens(ty: &Type) -> &Type {
    match ty {
        Type::Paren(p) => strip_parens(&p.elem),
        Type::Group(g) => strip_parens(&g.elem),
        other => other,
    }
}

/// `impl Trait` cannot annotate a `let` binding.
fn mentions_impl_trait(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(_) => true,
        Type::Paren(p) => mentions_impl_trait(&p.elem),
        Type::Group(g) => mentions_impl_trait(&g.elem),
        Type::Reference(r) => mentions_impl_trait(&r.elem),
        Type::Ptr(p) => mentions_impl_trait(&p.elem),
        Type::Slice(s) => mentions_impl_trait(&s.elem),
        Type::Array(a) => mentions_impl_trait(&a.elem),
        Type::Tuple(t) => t.elems.iter().any(mentions_impl_trait),
        Type::Path(p) => p
            .path
            .segments
            .iter()
            .any(|s| type_args(&s.arguments).into_iter().any(mentions_impl_trait)),
        _ => false,
    }
}
