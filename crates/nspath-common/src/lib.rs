//! # nspath-common
//!
//! Shared error definitions, device identifiers, and constants used
//! across the nspath workspace.
//!
//! This crate is the leaf of the dependency graph — it depends on no
//! other internal crate and provides the foundational primitives that
//! the translation core builds upon.

pub mod constants;
pub mod error;
pub mod types;
