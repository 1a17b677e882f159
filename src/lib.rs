#![forbid(unsafe_code)]
//! Builtin registry generator for the CUE interpreter
//!
//! Scans a tree of builtin packages written in Rust (plus optional CUE declarations) and writes a
//! single Rust module registering every exported constant and function with the interpreter.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: The emitter produces `.unwrap()`-free code; runtime failures of builtins flow through the
//!   interpreter's call context.

pub mod backend;
pub mod cli;
pub mod config;
pub mod declarative;
pub mod errors;
pub mod frontend;
pub mod generator;
pub mod registry;
pub mod walker;

pub use config::GenConfig;
pub use declarative::{BuildOutcome, CueCommand, DeclarativeFrontend};
pub use errors::{DroppedDecl, GenError, GenResult};
pub use generator::{GenOutput, Generator};
