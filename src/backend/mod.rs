//! Registry backend
//!
//! Turns the collected package entries into the generated Rust module.
//!
//! ## Module Organization
//!
//! - `imports.rs` - Run-wide import consolidation
//! - `emit.rs` - Token generation and formatting of the registry module

#![deny(clippy::unwrap_used)]

pub mod emit;
pub mod imports;

pub use emit::{Emitter, Rendered};
pub use imports::ImportSet;
