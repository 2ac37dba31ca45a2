//! Binary-level tests for the wharf CLI

mod common;
mod lock;
mod purge;
mod uninstall;
