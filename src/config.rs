//! Generator configuration.
//!
//! The defaults reproduce the layout the generator was built for: it runs from the interpreter
//! crate's directory, scans the sibling `pkg` tree and writes `builtins.rs` next to it.

use std::path::PathBuf;

use cuegen_core::lang::conventions::TESTDATA_DIR;

/// Default package tree root.
pub const DEFAULT_ROOT: &str = "../pkg";
/// Default output file.
pub const DEFAULT_OUTPUT: &str = "builtins.rs";
/// Default interpreter crate name.
pub const DEFAULT_RUNTIME_CRATE: &str = "cue";
/// Default declarative tool.
pub const DEFAULT_CUE_PROGRAM: &str = "cue";
/// Default declarative tool arguments (the directory is appended).
pub const DEFAULT_CUE_ARGS: &[&str] = &["def"];

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    pub root: PathBuf,
    pub output: PathBuf,
    /// Crate name whose paths are stripped from the emitted module.
    pub runtime_crate: String,
    /// Directory names skipped together with their subtree.
    pub skip_dirs: Vec<String>,
    pub cue_program: String,
    pub cue_args: Vec<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            skip_dirs: vec![TESTDATA_DIR.to_string()],
            cue_program: DEFAULT_CUE_PROGRAM.to_string(),
            cue_args: DEFAULT_CUE_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GenConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_runtime_crate(mut self, name: impl Into<String>) -> Self {
        self.runtime_crate = name.into();
        self
    }

    /// Replace the skip list.
    pub fn with_skip_dirs(mut self, dirs: Vec<String>) -> Self {
        self.skip_dirs = dirs;
        self
    }

    /// Set the declarative tool and its arguments.
    pub fn with_cue_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.cue_program = program.into();
        self.cue_args = args;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenConfig::default();
        assert_eq!(config.root, PathBuf::from("../pkg"));
        assert_eq!(config.output, PathBuf::from("builtins.rs"));
        assert_eq!(config.runtime_crate, "cue");
        assert_eq!(config.skip_dirs, vec!["testdata".to_string()]);
        assert_eq!(config.cue_args, vec!["def".to_string()]);
    }

    #[test]
    fn test_builder_overrides() {
        let config = GenConfig::default()
            .with_root("/tmp/pkg")
            .with_skip_dirs(vec!["fixtures".to_string()])
            .with_cue_command("cue-dev", vec!["def".to_string(), "--strict".to_string()]);
        assert_eq!(config.root, PathBuf::from("/tmp/pkg"));
        assert_eq!(config.skip_dirs, vec!["fixtures".to_string()]);
        assert_eq!(config.cue_program, "cue-dev");
    }
}
