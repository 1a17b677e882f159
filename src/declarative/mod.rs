//! Declarative (CUE) snippet embedding.
//!
//! Each package directory holding `*.cue` files is compiled by a [`DeclarativeFrontend`]. The
//! resulting schema text is normalized and later embedded verbatim in the registry entry.
//!
//! ## Notes
//! - [`CueCommand`] runs the external `cue` tool (`cue def .`) inside the package directory, so
//!   only that directory's package is compiled.
//! - A tool report of "no CUE files" is not an error: the package simply has no snippet.
//! - Tests substitute their own frontend so the tool is not needed.

use std::path::Path;
use std::process::Command;

use cuegen_core::strings::collapse_blank_lines;
use thiserror::Error;

/// Stderr text the `cue` tool prints when a directory holds no CUE package.
pub const NO_SOURCES_MARKER: &str = "no CUE files";

/// Outcome of compiling one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Formatted schema text.
    Schema(String),
    NoSources,
}

/// Errors raised by a declarative frontend.
#[derive(Debug, Error)]
pub enum DeclarativeError {
    #[error("failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("`{program}` produced non-UTF-8 output")]
    Encoding { program: String },
}

/// Compiles the declarative sources of one directory.
pub trait DeclarativeFrontend {
    fn build(&self, dir: &Path) -> Result<BuildOutcome, DeclarativeError>;
}

/// Production frontend: the external `cue` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueCommand {
    pub program: String,
    /// Arguments placed before the package argument.
    pub args: Vec<String>,
}

impl CueCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for CueCommand {
    fn default() -> Self {
        Self::new("cue", vec!["def".to_string()])
    }
}

impl DeclarativeFrontend for CueCommand {
    #[tracing::instrument(skip_all, fields(program = %self.program, dir = %dir.display()))]
    fn build(&self, dir: &Path) -> Result<BuildOutcome, DeclarativeError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(".")
            .current_dir(dir)
            .output()
            .map_err(|source| DeclarativeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains(NO_SOURCES_MARKER) {
                tracing::debug!("no CUE package in directory");
                return Ok(BuildOutcome::NoSources);
            }
            return Err(DeclarativeError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        String::from_utf8(output.stdout)
            .map(BuildOutcome::Schema)
            .map_err(|_| DeclarativeError::Encoding {
                program: self.program.clone(),
            })
    }
}

/// Compile `dir` and return its normalized snippet, if any.
pub fn embed(frontend: &dyn DeclarativeFrontend, dir: &Path) -> Result<Option<String>, DeclarativeError> {
    match frontend.build(dir)? {
        BuildOutcome::Schema(text) => Ok(Some(normalize_snippet(&text))),
        BuildOutcome::NoSources => Ok(None),
    }
}

/// Collapse blank-line runs so the embedded text stays compact.
pub fn normalize_snippet(text: &str) -> String {
    collapse_blank_lines(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(BuildOutcome);

    impl DeclarativeFrontend for Fixed {
        fn build(&self, _dir: &Path) -> Result<BuildOutcome, DeclarativeError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_embed_normalizes_schema() {
        let frontend = Fixed(BuildOutcome::Schema("#A: int\n\n\n\n#B: string\n".to_string()));
        let snippet = embed(&frontend, Path::new(".")).unwrap().unwrap();
        insta::assert_snapshot!(snippet, @r"
        #A: int

        #B: string
        ");
    }

    #[test]
    fn test_no_sources_is_not_an_error() {
        let frontend = Fixed(BuildOutcome::NoSources);
        assert_eq!(embed(&frontend, Path::new(".")).unwrap(), None);
    }

    fn shell(script: &str) -> CueCommand {
        CueCommand::new("sh", vec!["-c".to_string(), script.to_string(), "sh".to_string()])
    }

    #[cfg(unix)]
    #[test]
    fn test_command_stdout_is_the_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = shell("printf 'a: int\\n'").build(tmp.path()).unwrap();
        assert_eq!(outcome, BuildOutcome::Schema("a: int\n".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_no_cue_files_stderr_means_no_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let command = shell("echo 'build constraints exclude all CUE files: no CUE files in .' >&2; exit 1");
        assert_eq!(command.build(tmp.path()).unwrap(), BuildOutcome::NoSources);
    }

    #[cfg(unix)]
    #[test]
    fn test_other_failures_are_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = shell("echo 'a: reference \"b\" not found' >&2; exit 1")
            .build(tmp.path())
            .unwrap_err();
        match err {
            DeclarativeError::Failed { program, stderr, .. } => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "a: reference \"b\" not found");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_fatal() {
        let command = CueCommand::new("cuegen-test-no-such-program", vec![]);
        let err = command.build(Path::new(".")).unwrap_err();
        assert!(matches!(err, DeclarativeError::Spawn { .. }));
    }
}
