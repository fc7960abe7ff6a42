//! Routegraph CLI library.
//!
//! Shared pieces of the `routegraph` binary: configuration, query commands
//! and terminal formatting.

pub mod colors;
pub mod commands;
pub mod config;
