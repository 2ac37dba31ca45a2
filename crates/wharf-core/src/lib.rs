//! Core utilities for Wharf.
//!
//! This crate holds the pieces shared by the `wharf` binary and any future
//! tooling: the error type, canonical package-name handling, and path
//! discovery for projects and the wharf home directory.

pub mod core;

pub use core::error::{WharfError, WharfResult};
pub use core::error_help::format_error_with_help;
pub use core::name::canonical_name;
