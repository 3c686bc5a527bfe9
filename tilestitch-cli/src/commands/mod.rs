//! CLI subcommands.

pub mod common;
pub mod grid;
pub mod strip;
pub mod zip;
