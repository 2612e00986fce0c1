//! Tillside Core - Shared types library.
//!
//! This crate provides common types used across all Tillside components:
//! - `terminal` - POS terminal web front-end
//! - `cli` - Command-line tools for seeding and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
