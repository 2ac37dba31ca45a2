//! Wharf: manifest and lockfile management for Python virtualenvs.
//!
//! This crate keeps three artifacts mutually consistent: the human-edited
//! manifest of declared dependencies (`wharf.yaml`), the generated lockfile
//! recording the resolved graph (`wharf.lock`), and the packages installed
//! in the project's virtualenv. The reconciliation routines live in
//! [`routines`]; resolution and environment access sit behind the traits
//! in [`di`].

pub use wharf_core::{canonical_name, format_error_with_help, WharfError, WharfResult};

/// Core module re-exported for convenience.
pub mod core {
    pub use wharf_core::core::*;
    pub use wharf_core::*;

    /// Path module re-exported from wharf-core.
    pub mod path {
        pub use wharf_core::core::path::*;
    }
}

/// Configuration management.
pub mod config;

/// Project context, manifest and lockfile stores.
pub mod project;

/// Virtualenv environment driver.
pub mod venv;

/// Resolver gateway.
pub mod resolver;

/// Reconciliation routines (uninstall, purge, lock).
pub mod routines;

/// Dependency injection infrastructure.
pub mod di;
