//! Flatten `use` items into individual import specs.
//!
//! `use a::{b, c::d as e, f::*};` becomes `a::b`, `a::c::d as e` and `a::f::*`. A `self` leaf
//! imports its parent path (`use a::{self}` is `a`).

use std::fmt;

use syn::{ItemUse, UseTree};

/// One imported path with its optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportSpec {
    /// `::`-joined path; globs end in `*`; a leading `::` is kept.
    pub path: String,
    pub alias: Option<String>,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            path: path.into(),
            alias,
        }
    }

    /// Name the import binds in the importing module: the alias, else the last path segment.
    pub fn effective_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias.as_str(),
            None => self.path.rsplit("::").next().unwrap_or(&self.path),
        }
    }

    /// First path segment (the crate or module the path is rooted at).
    pub fn root(&self) -> &str {
        let path = self.path.strip_prefix("::").unwrap_or(&self.path);
        path.split("::").next().unwrap_or(path)
    }

    /// Render as a `use` item.
    pub fn to_item(&self) -> syn::Result<ItemUse> {
        syn::parse_str(&format!("use {self};"))
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.path, alias),
            None => f.write_str(&self.path),
        }
    }
}

/// Flatten one `use` item into its specs, in source order.
pub fn flatten_use(item: &ItemUse) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    let prefix = if item.leading_colon.is_some() { "::" } else { "" };
    flatten_tree(&item.tree, prefix.to_string(), &mut specs);
    specs
}

fn flatten_tree(tree: &UseTree, prefix: String, out: &mut Vec<ImportSpec>) {
    match tree {
        UseTree::Path(p) => {
            let prefix = join(&prefix, &p.ident.to_string());
            flatten_tree(&p.tree, prefix, out);
        }
        UseTree::Name(n) if n.ident == "self" => out.push(ImportSpec::new(prefix, None)),
        UseTree::Name(n) => out.push(ImportSpec::new(join(&prefix, &n.ident.to_string()), None)),
        UseTree::Rename(r) => {
            let path = if r.ident == "self" {
                prefix
            } else {
                join(&prefix, &r.ident.to_string())
            };
            out.push(ImportSpec::new(path, Some(r.rename.to_string())));
        }
        UseTree::Glob(_) => out.push(ImportSpec::new(join(&prefix, "*"), None)),
        UseTree::Group(g) => {
            for item in &g.items {
                flatten_tree(item, prefix.clone(), out);
            }
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() || prefix == "::" {
        format!("{prefix}{segment}")
    } else {
        format!("{prefix}::{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(src: &str) -> Vec<String> {
        let item: ItemUse = syn::parse_str(src).unwrap();
        flatten_use(&item).iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flatten_groups_and_renames() {
        assert_eq!(
            flatten("use std::{io::{self, Read}, fmt::Write as _, collections::*};"),
            vec!["std::io", "std::io::Read", "std::fmt::Write as _", "std::collections::*"]
        );
        assert_eq!(flatten("use ::regex::Regex;"), vec!["::regex::Regex"]);
        assert_eq!(flatten("use num::{self as numeric};"), vec!["num as numeric"]);
    }

    #[test]
    fn test_effective_name_and_root() {
        let spec = ImportSpec::new("std::io::Read", None);
        assert_eq!(spec.effective_name(), "Read");
        assert_eq!(spec.root(), "std");
        let aliased = ImportSpec::new("::cue::Value", Some("V".to_string()));
        assert_eq!(aliased.effective_name(), "V");
        assert_eq!(aliased.root(), "cue");
    }

    #[test]
    fn test_to_item_round_trips() {
        let spec = ImportSpec::new("std::fmt::Write", Some("_".to_string()));
        let item = spec.to_item().unwrap();
        assert_eq!(flatten_use(&item), vec![spec]);
    }
}
