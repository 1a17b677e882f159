//! CLI module for the registry generator
//!
//! A bare `cuegen` invocation regenerates `builtins.rs` from `../pkg` with the defaults of
//! [`GenConfig`]; every flag overrides one setting.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! `execute` returns `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::{self, GenConfig};
use crate::declarative::CueCommand;
use crate::errors::GenError;
use crate::generator::Generator;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<GenError> for CliError {
    fn from(err: GenError) -> Self {
        CliError::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate the builtin package registry of the CUE interpreter
#[derive(Parser, Debug)]
#[command(name = "cuegen")]
#[command(version)]
#[command(about = "Generate the builtin package registry from Rust and CUE sources", long_about = None)]
pub struct Cli {
    /// Package tree to scan
    #[arg(long, value_name = "DIR", default_value = config::DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Generated module path
    #[arg(long = "out", value_name = "FILE", default_value = config::DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Interpreter crate whose paths are stripped from the output
    #[arg(long, value_name = "NAME", default_value = config::DEFAULT_RUNTIME_CRATE)]
    pub runtime_crate: String,

    /// Directory name to exclude (repeatable; default: testdata)
    #[arg(long = "skip", value_name = "DIR")]
    pub skip: Vec<String>,

    /// CUE executable
    #[arg(long = "cue", value_name = "PROGRAM", default_value = config::DEFAULT_CUE_PROGRAM)]
    pub cue_program: String,

    /// Argument passed to the CUE executable before the package (repeatable; default: def)
    #[arg(long = "cue-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub cue_args: Vec<String>,
}

impl Cli {
    /// Resolve flags into a generator configuration.
    pub fn into_config(self) -> GenConfig {
        let mut config = GenConfig::default()
            .with_root(self.root)
            .with_output(self.output)
            .with_runtime_crate(self.runtime_crate);
        if !self.skip.is_empty() {
            config = config.with_skip_dirs(self.skip);
        }
        let cue_args = if self.cue_args.is_empty() {
            config.cue_args.clone()
        } else {
            self.cue_args
        };
        config.with_cue_command(self.cue_program, cue_args)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute one generator run.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.into_config();
    let frontend = CueCommand::new(config.cue_program.clone(), config.cue_args.clone());
    let output = Generator::new(&config, &frontend).run()?;
    for dropped in &output.dropped {
        eprintln!("{dropped}");
    }
    if !output.formatted {
        eprintln!("warning: {} was written unformatted", config.output.display());
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_uses_defaults() {
        let cli = Cli::try_parse_from(["cuegen"]).unwrap();
        assert_eq!(cli.into_config(), GenConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "cuegen",
            "--root",
            "pkg",
            "--out",
            "gen.rs",
            "--skip",
            "fixtures",
            "--skip",
            "testdata",
            "--cue-arg",
            "def",
            "--cue-arg",
            "--inline-imports",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.root, PathBuf::from("pkg"));
        assert_eq!(config.output, PathBuf::from("gen.rs"));
        assert_eq!(config.skip_dirs, vec!["fixtures".to_string(), "testdata".to_string()]);
        assert_eq!(config.cue_args, vec!["def".to_string(), "--inline-imports".to_string()]);
    }

    #[test]
    fn test_generator_errors_keep_their_message() {
        let err = CliError::from(GenError::Emit {
            message: "boom".to_string(),
        });
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("boom"));
    }
}
