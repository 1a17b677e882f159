//! Error and diagnostic types for the generator.
//!
//! Two severities exist:
//!
//! - [`GenError`]: fatal. The run stops and no artifact is written.
//! - [`DroppedDecl`]: recoverable. A declaration is left out of the registry, the drop is logged
//!   with `tracing::warn!` and collected into the run output.
//!
//! Fatal extraction errors carry a [`Location`] (`file:line`).

use std::fmt;
use std::path::PathBuf;

use cuegen_core::lang::kinds::Kind;
use miette::Diagnostic;
use thiserror::Error;

use crate::declarative::DeclarativeError;
use crate::frontend::const_eval::ConstEvalError;

/// Result alias for generator operations.
pub type GenResult<T> = Result<T, GenError>;

/// Source position of an extracted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Fatal generator errors.
#[derive(Debug, Error, Diagnostic)]
pub enum GenError {
    #[error("failed to walk `{}`", path.display())]
    #[diagnostic(code(cuegen::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(cuegen::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{at}: failed to parse Rust source: {message}")]
    #[diagnostic(code(cuegen::parse))]
    Parse { at: Location, message: String },

    #[error("{at}: exported static `{name}` in package `{package}`")]
    #[diagnostic(
        code(cuegen::exported_static),
        help("builtins cannot export mutable state; make the static private")
    )]
    ExportedStatic {
        at: Location,
        package: String,
        name: String,
    },

    #[error("{at}: exported {item} `{name}` in package `{package}`")]
    #[diagnostic(
        code(cuegen::exported_type),
        help("builtin packages may only export constants and functions")
    )]
    ExportedType {
        at: Location,
        package: String,
        item: &'static str,
        name: String,
    },

    #[error("{at}: unsupported item kind `{item}` in package `{package}`")]
    #[diagnostic(code(cuegen::unsupported_item))]
    UnsupportedItem {
        at: Location,
        package: String,
        item: &'static str,
    },

    #[error("{at}: cannot fold constant `{name}` in package `{package}`")]
    #[diagnostic(code(cuegen::const_eval))]
    ConstEval {
        at: Location,
        package: String,
        name: String,
        #[source]
        source: ConstEvalError,
    },

    #[error("import `{path}` is used as both `{first}` and `{second}`")]
    #[diagnostic(
        code(cuegen::import_conflict),
        help("use the same alias for a path in every builtin package")
    )]
    ImportConflict {
        path: String,
        first: String,
        second: String,
    },

    #[error("package `{package}` registers `{name}` more than once")]
    #[diagnostic(
        code(cuegen::duplicate_builtin),
        help("exported Rust names that differ only in case or underscores map to one builtin; rename one")
    )]
    DuplicateBuiltin { package: String, name: String },

    #[error("failed to build CUE sources in `{}`", dir.display())]
    #[diagnostic(code(cuegen::declarative))]
    Declarative {
        dir: PathBuf,
        #[source]
        source: DeclarativeError,
    },

    #[error("failed to emit registry: {message}")]
    #[diagnostic(code(cuegen::emit))]
    Emit { message: String },

    #[error("failed to write `{}`", path.display())]
    #[diagnostic(code(cuegen::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a declaration was left out of the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// The constant folded to a value outside the registry's value set.
    UnsupportedConstKind { kind: &'static str, value: String },
    /// The function does not return one value or a `Result` with an error type.
    ReturnShape { kinds: Vec<Kind> },
    Generic,
    Async,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::UnsupportedConstKind { kind, value } => {
                write!(f, "unsupported constant kind {kind} ({value})")
            }
            DropReason::ReturnShape { kinds } => {
                let kinds: Vec<&str> = kinds.iter().map(|k| cuegen_core::lang::kinds::as_str(*k)).collect();
                write!(f, "unsupported return shape [{}]", kinds.join(", "))
            }
            DropReason::Generic => f.write_str("generic functions cannot be registered"),
            DropReason::Async => f.write_str("async functions cannot be registered"),
        }
    }
}

/// A declaration dropped from the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedDecl {
    pub package: String,
    /// Effective name of the file's first import, for context.
    pub default_pkg: Option<String>,
    pub name: String,
    pub reason: DropReason,
}

impl fmt::Display for DroppedDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: dropped `{}`: {}", self.package, self.name, self.reason)?;
        if let Some(pkg) = &self.default_pkg {
            write!(f, " (default package `{pkg}`)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new("pkg/math/lib.rs", 12).to_string(), "pkg/math/lib.rs:12");
    }

    #[test]
    fn test_dropped_decl_display() {
        let dropped = DroppedDecl {
            package: "math".to_string(),
            default_pkg: None,
            name: "split".to_string(),
            reason: DropReason::ReturnShape {
                kinds: vec![Kind::Int, Kind::Int],
            },
        };
        assert_eq!(dropped.to_string(), "math: dropped `split`: unsupported return shape [int, int]");
    }

    #[test]
    fn test_fatal_messages_name_location_and_package() {
        let err = GenError::ExportedStatic {
            at: Location::new("lib.rs", 3),
            package: "strings".to_string(),
            name: "COUNTER".to_string(),
        };
        assert_eq!(err.to_string(), "lib.rs:3: exported static `COUNTER` in package `strings`");
    }
}
