//! Cuegen vocabulary registries.
//!
//! This module is the “front door” for generator vocabulary: the kinds a builtin parameter or
//! result can have, the host type spellings the kind mapper recognizes, and naming conventions.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - Callers work with stable ids (e.g. [`kinds::Kind`], [`host_types::HostTypeId`]) and look up
//!   spellings/metadata via registry tables.
//!
//! ## Examples
//! ```rust
//! use cuegen_core::lang::kinds::{self, Kind};
//!
//! assert_eq!(kinds::as_str(Kind::Int), "int");
//! assert_eq!(kinds::family(Kind::Reader), Kind::String);
//! ```

pub mod conventions;
pub mod host_types;
pub mod kinds;
