//! Run-wide import consolidation.
//!
//! Every package file contributes its `use` specs. The generated module has a single namespace,
//! so one path must bind one name across the whole tree; a second alias for a known path is a
//! fatal conflict.

use std::collections::BTreeMap;

use crate::errors::{GenError, GenResult};
use crate::frontend::imports::ImportSpec;

/// Deduplicated imports, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    runtime_crate: String,
    by_path: BTreeMap<String, ImportSpec>,
}

impl ImportSet {
    pub fn new(runtime_crate: impl Into<String>) -> Self {
        Self {
            runtime_crate: runtime_crate.into(),
            by_path: BTreeMap::new(),
        }
    }

    /// Add a spec; paths rooted at the interpreter crate are ignored.
    pub fn add(&mut self, spec: ImportSpec) -> GenResult<()> {
        if spec.root() == self.runtime_crate {
            tracing::trace!(path = %spec.path, "skipping interpreter import");
            return Ok(());
        }
        match self.by_path.get(&spec.path) {
            Some(prev) if prev.effective_name() != spec.effective_name() => Err(GenError::ImportConflict {
                path: spec.path.clone(),
                first: prev.effective_name().to_string(),
                second: spec.effective_name().to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.by_path.insert(spec.path.clone(), spec);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Specs sorted by path.
    pub fn finish(self) -> Vec<ImportSpec> {
        self.by_path.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(path: &str, alias: Option<&str>) -> ImportSpec {
        ImportSpec::new(path, alias.map(str::to_string))
    }

    #[test]
    fn test_dedup_and_sort() {
        let mut set = ImportSet::new("cue");
        set.add(spec("std::io::Read", None)).unwrap();
        set.add(spec("regex::Regex", None)).unwrap();
        set.add(spec("std::io::Read", None)).unwrap();
        set.add(spec("cue::Value", None)).unwrap();
        set.add(spec("::cue::ast", None)).unwrap();
        assert_eq!(set.len(), 2);
        let paths: Vec<String> = set.finish().into_iter().map(|s| s.path).collect();
        assert_eq!(paths, vec!["regex::Regex", "std::io::Read"]);
    }

    #[test]
    fn test_same_alias_is_not_a_conflict() {
        let mut set = ImportSet::new("cue");
        set.add(spec("std::fmt::Write", Some("FmtWrite"))).unwrap();
        set.add(spec("std::fmt::Write", Some("FmtWrite"))).unwrap();
        // An explicit alias equal to the last segment binds the same name.
        set.add(spec("std::io::Read", None)).unwrap();
        set.add(spec("std::io::Read", Some("Read"))).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_alias_conflict_is_fatal() {
        let mut set = ImportSet::new("cue");
        set.add(spec("num::BigInt", None)).unwrap();
        let err = set.add(spec("num::BigInt", Some("Big"))).unwrap_err();
        assert!(matches!(
            err,
            GenError::ImportConflict { ref first, ref second, .. } if first == "BigInt" && second == "Big"
        ));
    }
}
