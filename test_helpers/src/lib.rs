//! Shared test helpers for crates in the confbind workspace.

pub mod env;
