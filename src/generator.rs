//! Generator pipeline.
//!
//! ```text
//! walk → (per package) extract files + embed CUE → PackageEntry
//!      → consolidate imports/helpers → emit → write
//! ```
//!
//! Everything is accumulated in memory; the output file is only written after the whole tree
//! was processed without a fatal error.

use std::collections::HashSet;
use std::fs;

use crate::backend::emit::{Emitter, Rendered};
use crate::backend::imports::ImportSet;
use crate::config::GenConfig;
use crate::declarative::{self, DeclarativeFrontend};
use crate::errors::{DroppedDecl, GenError, GenResult};
use crate::frontend::extract::{extract_file, is_test_file};
use crate::registry::PackageEntry;
use crate::walker::{self, PackageDir};

/// Result of one generator run.
#[derive(Debug, Clone)]
pub struct GenOutput {
    /// Complete module text, header included.
    pub source: String,
    pub packages: Vec<PackageEntry>,
    pub dropped: Vec<DroppedDecl>,
    pub formatted: bool,
}

impl GenOutput {
    pub fn package(&self, path: &str) -> Option<&PackageEntry> {
        self.packages.iter().find(|p| p.path == path)
    }
}

/// Run-wide accumulators.
#[derive(Debug)]
struct Registry {
    packages: Vec<PackageEntry>,
    imports: ImportSet,
    helpers: Vec<syn::Item>,
    dropped: Vec<DroppedDecl>,
}

/// Drives one generation run.
pub struct Generator<'a> {
    config: &'a GenConfig,
    frontend: &'a dyn DeclarativeFrontend,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GenConfig, frontend: &'a dyn DeclarativeFrontend) -> Self {
        Self { config, frontend }
    }

    /// Build the registry module without writing it.
    #[tracing::instrument(skip_all, fields(root = %self.config.root.display()))]
    pub fn generate(&self) -> GenResult<GenOutput> {
        let mut registry = Registry {
            packages: Vec::new(),
            imports: ImportSet::new(self.config.runtime_crate.as_str()),
            helpers: Vec::new(),
            dropped: Vec::new(),
        };
        walker::walk(&self.config.root, &self.config.skip_dirs, |dir| {
            self.assemble(dir, &mut registry)
        })?;

        let imports = registry.imports.finish();
        let Rendered { source, formatted } =
            Emitter::new(&self.config.runtime_crate).render(&registry.packages, &imports, &registry.helpers)?;

        tracing::info!(
            packages = registry.packages.len(),
            imports = imports.len(),
            dropped = registry.dropped.len(),
            "generated builtin registry"
        );
        Ok(GenOutput {
            source,
            packages: registry.packages,
            dropped: registry.dropped,
            formatted,
        })
    }

    /// Build the registry module and write it to the configured output.
    pub fn run(&self) -> GenResult<GenOutput> {
        let output = self.generate()?;
        fs::write(&self.config.output, &output.source).map_err(|source| GenError::Write {
            path: self.config.output.clone(),
            source,
        })?;
        tracing::info!(output = %self.config.output.display(), "wrote registry");
        Ok(output)
    }

    /// Turn one package directory into a registry entry.
    fn assemble(&self, dir: &PackageDir, registry: &mut Registry) -> GenResult<()> {
        let mut entry = PackageEntry::new(dir.key.as_str());

        for file in &dir.rust_files {
            if is_test_file(file) {
                tracing::debug!(file = %file.display(), "skipping test file");
                continue;
            }
            let decls = extract_file(file, &dir.key, &self.config.runtime_crate)?;
            for spec in decls.imports {
                registry.imports.add(spec)?;
            }
            registry.helpers.extend(decls.helpers);
            registry.dropped.extend(decls.dropped);
            entry.decls.extend(decls.decls);
        }

        check_unique_names(&entry)?;

        if !dir.cue_files.is_empty() {
            entry.snippet =
                declarative::embed(self.frontend, &dir.path).map_err(|source| GenError::Declarative {
                    dir: dir.path.clone(),
                    source,
                })?;
        }

        if entry.is_empty() {
            tracing::debug!(package = %dir.key, "package contributes nothing");
        } else {
            registry.packages.push(entry);
        }
        Ok(())
    }
}

/// Two declarations of one package must not share a registry name.
fn check_unique_names(entry: &PackageEntry) -> GenResult<()> {
    let mut seen = HashSet::new();
    match entry.decls.iter().map(|d| d.name()).find(|name| !seen.insert(*name)) {
        Some(name) => Err(GenError::DuplicateBuiltin {
            package: entry.path.clone(),
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}
