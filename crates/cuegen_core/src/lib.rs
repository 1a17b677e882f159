//! Provide the shared vocabulary and pure helpers for the cuegen builtin registry generator.
//!
//! The generator crate does the IO and the syntax work; this crate holds the deterministic pieces
//! both the generator and its tests need to agree on:
//! - the closed [`lang::kinds::Kind`] vocabulary,
//! - the registry of recognized host (Rust) type spellings,
//! - naming conventions for registry entries,
//! - text normalization for numbers and CUE snippets.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no `syn` types.

pub mod lang;
pub mod numbers;
pub mod strings;
